use crate::{
    functions::{Command, Param},
    parser::Instruction,
    state::{DrawCommand, InterpreterState},
};


impl Command {
    /// Apply a complete instruction of this command to the state.
    ///
    /// This only ever appends to `draw_commands` and updates the turtle.
    pub fn perform(&self, state: &mut InterpreterState, instruction: &Instruction) {
        match self {
            Command::Forward => move_dist(state, instruction.number(Param::Distance)),
            Command::Back => move_dist(state, -instruction.number(Param::Distance)),
            Command::Left => turn(state, -instruction.number(Param::Angle)),
            Command::Right => turn(state, instruction.number(Param::Angle)),
            Command::Repeat => {
                let times = instruction.number(Param::Times) as i64;
                perform_all(
                    state,
                    repeated(instruction.block(Param::Statements), times),
                );
            }
            Command::PenUp => state.turtle.pen_down = false,
            Command::PenDown => state.turtle.pen_down = true,
        }
    }
}

pub fn perform_all<'i>(
    state: &mut InterpreterState,
    instructions: impl IntoIterator<Item = &'i Instruction>,
) {
    for instruction in instructions {
        instruction.command.perform(state, instruction);
    }
}

/// `items` concatenated `times` times, in order.
fn repeated(items: &[Instruction], times: i64) -> impl Iterator<Item = &Instruction> {
    (0..times.max(0)).flat_map(move |_| items.iter())
}

fn move_dist(state: &mut InterpreterState, dist: f64) {
    let turtle = &mut state.turtle;
    let rad = turtle.angle.to_radians();
    let (x1, y1) = (turtle.x, turtle.y);
    let (x2, y2) = (x1 + rad.cos() * dist, y1 + rad.sin() * dist);
    turtle.x = x2;
    turtle.y = y2;
    if turtle.pen_down {
        let id = state.draw_commands.len();
        state.draw_commands.push(DrawCommand::DrawLine {
            id,
            x1,
            y1,
            x2,
            y2,
        });
    }
}

fn turn(state: &mut InterpreterState, by: f64) {
    let previous_angle = state.turtle.angle;
    let new_angle = previous_angle + by;
    state.turtle.angle = new_angle;
    let id = state.draw_commands.len();
    state.draw_commands.push(DrawCommand::Rotate {
        id,
        previous_angle,
        new_angle,
    });
}
