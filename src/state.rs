use serde::{Deserialize, Serialize};

use crate::{
    parser::{Instruction, OpenBlock, parse_tokens},
    tokens::{InstructionId, ParsedToken},
};

pub const DEFAULT_NAME: &str = "Unnamed script";

/// Position, heading and pen of the turtle.
///
/// Angles are in degrees, `0` points along the positive x axis and
/// positive angles turn clockwise on a y-down canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turtle {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub pen_down: bool,
}

impl Default for Turtle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            pen_down: true,
        }
    }
}

/// Entry of the append-only drawing log read by renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "drawCommand",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum DrawCommand {
    DrawLine {
        id: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Rotate {
        id: usize,
        previous_angle: f64,
        new_angle: f64,
    },
}

impl DrawCommand {
    pub fn id(&self) -> usize {
        match self {
            DrawCommand::DrawLine { id, .. } | DrawCommand::Rotate { id, .. } => *id,
        }
    }
}

impl std::fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawCommand::DrawLine { id, x1, y1, x2, y2 } => {
                write!(f, "#{id} line {x1:.3},{y1:.3} -> {x2:.3},{y2:.3}")
            }
            DrawCommand::Rotate {
                id,
                previous_angle,
                new_angle,
            } => write!(f, "#{id} rotate {previous_angle:.1} -> {new_angle:.1}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub description: String,
}

/// Everything the parser and the execution engine know about a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpreterState {
    /// innermost instruction still collecting parameters
    pub current_instruction: Option<Instruction>,
    /// enclosing instructions whose bracketed block is being parsed, outermost first
    pub open_blocks: Vec<OpenBlock>,
    pub parsed_instructions: Vec<Instruction>,
    pub parsed_tokens: Vec<ParsedToken>,
    pub next_instruction_id: InstructionId,
    pub draw_commands: Vec<DrawCommand>,
    pub turtle: Turtle,
    pub error: Option<ErrorInfo>,
    pub name: String,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self {
            current_instruction: None,
            open_blocks: Vec::new(),
            parsed_instructions: Vec::new(),
            parsed_tokens: Vec::new(),
            next_instruction_id: 0,
            draw_commands: Vec::new(),
            turtle: Turtle::default(),
            error: None,
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl InterpreterState {
    /// Line the next submitted character will be on.
    pub fn next_line(&self) -> usize {
        self.parsed_tokens.last().map_or(1, |t| t.end_line())
    }

    /// Whether a statement is still waiting for more input.
    pub fn is_incomplete(&self) -> bool {
        self.current_instruction.is_some() || !self.open_blocks.is_empty()
    }

    /// Id of the outermost instruction currently being parsed.
    pub fn owner_id(&self) -> Option<InstructionId> {
        self.open_blocks
            .first()
            .map(|block| block.instruction.id)
            .or(self.current_instruction.as_ref().map(|i| i.id))
    }
}

/// The part of a script that is persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub name: String,
    pub parsed_tokens: Vec<ParsedToken>,
}

impl InterpreterState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            name: self.name.clone(),
            parsed_tokens: self.parsed_tokens.clone(),
        }
    }

    /// Rebuild a script by parsing its saved tokens again.
    pub fn restore(snapshot: Snapshot) -> Self {
        let state = parse_tokens(snapshot.parsed_tokens, InterpreterState::default());
        InterpreterState {
            name: snapshot.name,
            ..state
        }
    }
}
