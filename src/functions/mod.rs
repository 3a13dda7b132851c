//! Built-in commands of the logo language.
//!
//! Every command has a primary name, optional short aliases and an ordered
//! parameter list. Lookup is a compile-time match over all names.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    parser::{Instruction, ParseError},
    tokens::{Token, TokenKind},
};

#[cfg(test)]
mod test;

/// Largest count a `repeat` accepts.
pub const MAX_TIMES: u32 = 10_000;

macro_rules! commands {
    ($(
        #[doc = $doc:expr]
        $cmd:ident [$($alias:literal),*] ($($param:ident),*)
    ),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum Command {
            $(#[doc = $doc] $cmd,)+
        }

        impl Command {
            pub const ALL: &'static [Command] = &[$(Command::$cmd,)+];

            /// All names this command can be called by, primary name first.
            pub fn names(&self) -> &'static [&'static str] {
                paste::paste! {
                    match self {
                        $(Command::$cmd => &[stringify!([<$cmd:lower>]) $(, $alias)*],)+
                    }
                }
            }

            pub fn parameters(&self) -> &'static [Param] {
                match self {
                    $(Command::$cmd => &[$(Param::$param),*],)+
                }
            }

            /// Find the command registered under `name`.
            ///
            /// Names are case-sensitive.
            pub fn lookup(name: &str) -> Option<Command> {
                paste::paste! {
                    Some(match name {
                        $(stringify!([<$cmd:lower>]) $(| $alias)* => Command::$cmd,)+
                        _ => return None,
                    })
                }
            }

            pub fn summary(&self) -> &'static str {
                match self {
                    $(Command::$cmd => $doc.trim(),)+
                }
            }
        }
    };
}

commands! {
    /// move forward, drawing a line while the pen is down
    Forward ["fd"] (Distance),
    /// move backward, drawing a line while the pen is down
    Back ["bk"] (Distance),
    /// turn counter-clockwise
    Left ["lt"] (Angle),
    /// turn clockwise
    Right ["rt"] (Angle),
    /// run a bracketed block of statements several times
    Repeat ["rp"] (Times, Statements),
    /// stop drawing while moving
    PenUp ["pu"] (),
    /// resume drawing while moving
    PenDown ["pd"] (),
}

impl Command {
    /// Whether completing this command advances the history
    /// even though it draws nothing itself.
    ///
    /// The parser checks this whenever such an instruction completes.
    pub fn is_write_protected(&self) -> bool {
        matches!(self, Command::Repeat)
    }

    /// Feed one token to an incomplete instruction of this command.
    pub fn parse_token(
        &self,
        instruction: &mut Instruction,
        token: &Token,
    ) -> Result<CallStep, ParseError> {
        parse_call(instruction, token)
    }
}

impl std::str::FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::lookup(s).ok_or_else(|| ParseError::UnknownCommand(s.to_string()))
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names()[0])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Param {
    Distance,
    Angle,
    Times,
    Statements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    Integer,
    Block,
}

impl Param {
    pub fn kind(&self) -> ParamKind {
        match self {
            Param::Distance | Param::Angle => ParamKind::Number,
            Param::Times => ParamKind::Integer,
            Param::Statements => ParamKind::Block,
        }
    }

    pub fn expectation(&self) -> &'static str {
        match self.kind() {
            ParamKind::Number => "a number",
            ParamKind::Integer => "a whole number",
            ParamKind::Block => "a block in `[` `]`",
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Distance => write!(f, "distance"),
            Param::Angle => write!(f, "angle"),
            Param::Times => write!(f, "times"),
            Param::Statements => write!(f, "statements"),
        }
    }
}

/// Value bound to a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Block(Vec<Instruction>),
}

/// What [`parse_call`] did with a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStep {
    Ignored,
    Bound,
    /// the token opened a bracketed block for this parameter
    OpenBlock(Param),
}

/// Generic token strategy shared by all built-in commands.
///
/// Whitespace is skipped, everything else fills the next open parameter.
pub fn parse_call(instruction: &mut Instruction, token: &Token) -> Result<CallStep, ParseError> {
    let Some(param) = instruction.next_param() else {
        return Ok(CallStep::Ignored);
    };
    if token.is_whitespace() {
        return Ok(CallStep::Ignored);
    }
    let command = instruction.command;
    let mismatch = || ParseError::UnexpectedToken {
        command,
        param,
        found: token.clone(),
    };
    match (param.kind(), token.kind) {
        (ParamKind::Block, TokenKind::BracketOpen) => Ok(CallStep::OpenBlock(param)),
        (ParamKind::Block, _) => Err(mismatch()),
        (_, TokenKind::BracketOpen | TokenKind::BracketClose) => Err(mismatch()),
        (kind, _) => {
            let value = match token.text.parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => return Err(mismatch()),
            };
            if kind == ParamKind::Integer && value.fract() != 0.0 {
                return Err(ParseError::NotAnInteger {
                    command,
                    param,
                    found: token.text.clone(),
                });
            }
            if kind == ParamKind::Integer && value > f64::from(MAX_TIMES) {
                return Err(ParseError::TooLarge {
                    command,
                    param,
                    found: token.text.clone(),
                    max: MAX_TIMES,
                });
            }
            instruction.bind(param, ParamValue::Number(value));
            Ok(CallStep::Bound)
        }
    }
}
