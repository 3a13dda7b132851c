use pretty_assertions::assert_eq;

use super::*;
use crate::state::DrawCommand;

fn submit(lines: &[&str]) -> InterpreterState {
    lines
        .iter()
        .fold(InterpreterState::default(), |state, line| {
            parse_statement(&state, line)
        })
}

fn tags(state: &InterpreterState) -> Vec<(&str, Option<InstructionId>)> {
    state
        .parsed_tokens
        .iter()
        .map(|t| (t.text.as_str(), t.instruction_id))
        .collect()
}

#[test]
fn completes_instruction() {
    let state = submit(&["forward 10"]);
    assert_eq!(state.current_instruction, None);
    assert_eq!(state.parsed_instructions.len(), 1);
    let instr = &state.parsed_instructions[0];
    assert_eq!(instr.command, Command::Forward);
    assert!(instr.is_complete);
    assert_eq!(instr.number(Param::Distance), 10.0);
}

#[test]
fn assigns_increasing_ids() {
    let state = submit(&["forward 10\n", "right 90\n", "back 3"]);
    let ids: Vec<_> = state.parsed_instructions.iter().map(|i| i.id).collect();
    assert_eq!(ids, [0, 1, 2]);
    assert_eq!(state.next_instruction_id, 3);
}

#[test]
fn tags_tokens_with_their_instruction() {
    let state = submit(&["forward 10 right 90"]);
    assert_eq!(
        tags(&state),
        [
            ("forward", Some(0)),
            (" ", Some(0)),
            ("10", Some(0)),
            (" ", None),
            ("right", Some(1)),
            (" ", Some(1)),
            ("90", Some(1)),
        ]
    );
}

#[test]
fn statement_may_span_submissions() {
    let state = submit(&["forward"]);
    assert!(state.is_incomplete());
    assert!(state.parsed_instructions.is_empty());
    assert_eq!(state.next_instruction_id, 1);

    let state = parse_statement(&state, " 10");
    assert!(!state.is_incomplete());
    assert_eq!(state.parsed_instructions.len(), 1);
    assert_eq!(state.draw_commands.len(), 1);
}

#[test]
fn nested_blocks() {
    let state = submit(&["repeat 2 [ forward 1 repeat 3 [ right 90 ] ]"]);
    assert!(!state.is_incomplete());
    assert_eq!(state.parsed_instructions.len(), 1);
    let outer = &state.parsed_instructions[0];
    assert_eq!(outer.number(Param::Times), 2.0);
    let body = outer.block(Param::Statements);
    assert_eq!(body.len(), 2);
    assert_eq!(body[1].command, Command::Repeat);
    assert_eq!(body[1].block(Param::Statements).len(), 1);
    assert!(state.parsed_tokens.iter().all(|t| t.instruction_id == Some(0)));
    assert_eq!(state.next_instruction_id, 4);
}

#[test]
fn open_block_waits_for_bracket() {
    let state = submit(&["repeat 4 [\n", "forward 10\n"]);
    assert!(state.is_incomplete());
    assert_eq!(state.open_blocks.len(), 1);
    assert_eq!(state.open_blocks[0].statements.len(), 1);
    assert!(state.draw_commands.is_empty());

    let state = parse_statement(&state, "right 90 ]");
    assert!(!state.is_incomplete());
    assert_eq!(state.draw_commands.len(), 8);
}

#[test]
fn unknown_command_rolls_back_submission() {
    let before = submit(&["forward 10\n"]);
    let after = parse_statement(&before, "fnord 5");
    assert_eq!(
        after.error,
        Some(ErrorInfo {
            description: "fnord is not a recognized command".to_string()
        })
    );
    assert_eq!(
        InterpreterState {
            error: None,
            ..after.clone()
        },
        before
    );
}

#[test]
fn error_is_cleared_by_next_submission() {
    let state = submit(&["forward x"]);
    assert!(state.error.is_some());
    assert!(state.parsed_instructions.is_empty());
    assert!(state.parsed_tokens.is_empty());
    let state = parse_statement(&state, "forward 5");
    assert_eq!(state.error, None);
    assert_eq!(state.parsed_instructions.len(), 1);
}

#[test]
fn stray_brackets() {
    let state = submit(&["]"]);
    assert_eq!(
        state.error.map(|e| e.description),
        Some("unexpected `]`".to_string())
    );
    let state = submit(&["[ forward 1 ]"]);
    assert_eq!(
        state.error.map(|e| e.description),
        Some("unexpected `[`".to_string())
    );
}

#[test]
fn bare_number_is_not_a_command() {
    let state = submit(&["10"]);
    assert_eq!(
        state.error.map(|e| e.description),
        Some("10 is not a recognized command".to_string())
    );
}

#[test]
fn single_token_failure_discards_statement() {
    let state = submit(&["repeat 2 [ forward"]);
    let state = parse_and_save_statement(state, Token::new(TokenKind::BracketClose, "]", 1));
    assert!(!state.is_incomplete());
    assert!(state.error.is_some());
    assert_eq!(state.parsed_tokens.last().map(|t| t.instruction_id), Some(Some(0)));
}

#[test]
fn line_numbers_continue() {
    let state = submit(&["forward 10\n", "right 90\n"]);
    assert_eq!(state.next_line(), 3);
    let lines: Vec<_> = state.parsed_tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, [1, 1, 1, 1, 2, 2, 2, 2]);
}

#[test]
fn restore_from_tokens() {
    let state = submit(&["repeat 2 [\n", "forward 10 ]\n", "penup fd 3\n"]);
    let restored = parse_tokens(state.parsed_tokens.clone(), InterpreterState::default());
    assert_eq!(restored, state);
    assert!(matches!(
        restored.draw_commands.last(),
        Some(DrawCommand::DrawLine { .. })
    ));
}
