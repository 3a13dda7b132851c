use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    functions::{CallStep, Command, Param, ParamValue},
    lexer::Lexer,
    state::{ErrorInfo, InterpreterState},
    tokens::{InstructionId, ParsedToken, Token, TokenKind},
};

#[cfg(test)]
mod test;

/// One invocation of a command together with the parameters bound so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub id: InstructionId,
    pub command: Command,
    pub collected_parameters: IndexMap<Param, ParamValue>,
    pub is_complete: bool,
}

impl Instruction {
    pub fn new(id: InstructionId, command: Command) -> Self {
        Self {
            id,
            command,
            collected_parameters: IndexMap::new(),
            is_complete: command.parameters().is_empty(),
        }
    }

    /// The first parameter that has no value yet.
    pub fn next_param(&self) -> Option<Param> {
        self.command
            .parameters()
            .get(self.collected_parameters.len())
            .copied()
    }

    pub fn bind(&mut self, param: Param, value: ParamValue) {
        self.collected_parameters.insert(param, value);
        self.is_complete = self.next_param().is_none();
    }

    pub fn number(&self, param: Param) -> f64 {
        match self.collected_parameters.get(&param) {
            Some(ParamValue::Number(n)) => *n,
            _ => 0.0,
        }
    }

    pub fn block(&self, param: Param) -> &[Instruction] {
        match self.collected_parameters.get(&param) {
            Some(ParamValue::Block(block)) => block,
            _ => &[],
        }
    }
}

/// A parse frame: an instruction whose bracketed parameter is being parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenBlock {
    pub instruction: Instruction,
    pub parameter: Param,
    /// completed instructions inside the brackets so far
    pub statements: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("{0} is not a recognized command")]
    UnknownCommand(String),
    #[error("unexpected {0}")]
    UnexpectedBracket(Token),
    #[error("{command} expects {} as {param}, got {found}", .param.expectation())]
    UnexpectedToken {
        command: Command,
        param: Param,
        found: Token,
    },
    #[error("{command} expects a whole number as {param}, got `{found}`")]
    NotAnInteger {
        command: Command,
        param: Param,
        found: String,
    },
    #[error("{command} accepts at most {max} as {param}, got `{found}`")]
    TooLarge {
        command: Command,
        param: Param,
        found: String,
        max: u32,
    },
}

/// Consume a single token.
///
/// The token is always recorded in `parsed_tokens`, tagged with the
/// outermost instruction it belongs to. A failing token discards the
/// whole statement in progress and records the error in the state.
pub fn parse_and_save_statement(mut state: InterpreterState, token: Token) -> InterpreterState {
    let owner = state.owner_id();
    match state.step(&token) {
        Ok(tag) => state.parsed_tokens.push(ParsedToken::new(token, tag)),
        Err(why) => {
            debug!(%why, line = token.line, "statement rejected");
            state.current_instruction = None;
            state.open_blocks.clear();
            state.error = Some(ErrorInfo {
                description: why.to_string(),
            });
            state.parsed_tokens.push(ParsedToken::new(token, owner));
        }
    }
    state
}

/// Parse one submission of the editing buffer.
///
/// Submissions are atomic: when any token fails, the previous state is
/// returned with only its `error` replaced.
pub fn parse_statement(state: &InterpreterState, text: &str) -> InterpreterState {
    let mut next = InterpreterState {
        error: None,
        ..state.clone()
    };
    for token in Lexer::new(text, state.next_line()) {
        next = parse_and_save_statement(next, token);
        if next.error.is_some() {
            return InterpreterState {
                error: next.error,
                ..state.clone()
            };
        }
    }
    next
}

/// Rebuild a state from previously accepted tokens.
pub fn parse_tokens<T: Into<Token>>(
    tokens: impl IntoIterator<Item = T>,
    state: InterpreterState,
) -> InterpreterState {
    tokens
        .into_iter()
        .fold(state, |state, token| parse_and_save_statement(state, token.into()))
}

impl InterpreterState {
    /// Advance the state machine by one token, returning the id of the
    /// instruction owning the token.
    fn step(&mut self, token: &Token) -> Result<Option<InstructionId>, ParseError> {
        let owner = self.owner_id();
        let Some(mut instruction) = self.current_instruction.take() else {
            return self.step_outside_instruction(token).map(|id| owner.or(id));
        };
        let id = instruction.id;
        let command = instruction.command;
        match command.parse_token(&mut instruction, token)? {
            CallStep::OpenBlock(parameter) => self.open_blocks.push(OpenBlock {
                instruction,
                parameter,
                statements: Vec::new(),
            }),
            CallStep::Ignored | CallStep::Bound => self.settle(instruction),
        }
        Ok(owner.or(Some(id)))
    }

    fn step_outside_instruction(
        &mut self,
        token: &Token,
    ) -> Result<Option<InstructionId>, ParseError> {
        match token.kind {
            TokenKind::Whitespace => Ok(None),
            TokenKind::BracketClose if !self.open_blocks.is_empty() => {
                self.close_block();
                Ok(None)
            }
            TokenKind::BracketOpen | TokenKind::BracketClose => {
                Err(ParseError::UnexpectedBracket(token.clone()))
            }
            TokenKind::Word | TokenKind::Number => {
                let command = token.text.parse::<Command>()?;
                let id = self.next_instruction_id;
                self.next_instruction_id += 1;
                debug!(id, %command, "instruction started");
                self.settle(Instruction::new(id, command));
                Ok(Some(id))
            }
        }
    }

    fn close_block(&mut self) {
        if let Some(OpenBlock {
            mut instruction,
            parameter,
            statements,
        }) = self.open_blocks.pop()
        {
            instruction.bind(parameter, ParamValue::Block(statements));
            self.settle(instruction);
        }
    }

    /// Keep an incomplete instruction as current, or hand a complete one
    /// to the enclosing block or, at top level, to the execution engine.
    fn settle(&mut self, instruction: Instruction) {
        if !instruction.is_complete {
            self.current_instruction = Some(instruction);
        } else if let Some(block) = self.open_blocks.last_mut() {
            block.statements.push(instruction);
        } else {
            debug!(id = instruction.id, command = %instruction.command, "instruction complete");
            debug_assert!(
                !instruction.command.is_write_protected() || instruction.id < self.next_instruction_id,
                "{} completed without advancing the history",
                instruction.command,
            );
            instruction.command.perform(self, &instruction);
            self.parsed_instructions.push(instruction);
        }
    }
}
