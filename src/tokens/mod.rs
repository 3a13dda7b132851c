use std::fmt::Display;

use serde::{Deserialize, Serialize};


/// Id of a parsed instruction.
///
/// Ids are handed out in increasing order and never reused.
pub type InstructionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Word,
    Number,
    Whitespace,
    BracketOpen,
    BracketClose,
}

/// A lexical token together with the line it started on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub text: String,
    #[serde(rename = "lineNumber")]
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Line the next token would start on.
    pub fn end_line(&self) -> usize {
        self.line + self.text.matches('\n').count()
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Word => write!(f, "word `{}`", self.text),
            TokenKind::Number => write!(f, "number `{}`", self.text),
            TokenKind::Whitespace => write!(f, "whitespace"),
            TokenKind::BracketOpen => write!(f, "`[`"),
            TokenKind::BracketClose => write!(f, "`]`"),
        }
    }
}

/// A token that has been consumed by the parser.
///
/// Tokens belonging to an instruction carry its id, whitespace
/// between top-level statements carries none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedToken {
    #[serde(flatten)]
    pub token: Token,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_id: Option<InstructionId>,
}

impl ParsedToken {
    pub fn new(token: Token, instruction_id: Option<InstructionId>) -> Self {
        Self {
            token,
            instruction_id,
        }
    }
}

impl std::ops::Deref for ParsedToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl From<ParsedToken> for Token {
    fn from(value: ParsedToken) -> Self {
        value.token
    }
}

/// Group accepted tokens into source lines.
///
/// A token spanning several lines (only whitespace can) is
/// attributed to the line it starts on. Joining the texts of all
/// lines yields the accepted source again.
pub fn lines(tokens: &[ParsedToken]) -> Vec<(usize, String)> {
    let mut res: Vec<(usize, String)> = Vec::new();
    for token in tokens {
        match res.last_mut() {
            Some((line, text)) if *line == token.line => text.push_str(&token.text),
            _ => res.push((token.line, token.text.clone())),
        }
    }
    res
}

/// Split accepted tokens into texts that lex back into the same tokens.
///
/// Texts follow [`lines`], but two neighbouring tokens that would merge
/// when lexed together, two words or two runs of whitespace, never share
/// a text. Submitting the texts in order rebuilds the script.
pub fn submissions(tokens: &[ParsedToken]) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    let mut prev: Option<&ParsedToken> = None;
    for token in tokens {
        let joined = prev.is_some_and(|prev| prev.line == token.line && !merges(prev, token));
        match res.last_mut() {
            Some(text) if joined => text.push_str(&token.text),
            _ => res.push(token.text.clone()),
        }
        prev = Some(token);
    }
    res
}

/// Whether `a` directly followed by `b` may lex differently.
fn merges(a: &Token, b: &Token) -> bool {
    let bracket = |t: &Token| matches!(t.kind, TokenKind::BracketOpen | TokenKind::BracketClose);
    !bracket(a) && !bracket(b) && a.is_whitespace() == b.is_whitespace()
}
