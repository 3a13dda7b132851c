use crate::tokens::{Token, TokenKind};


/// Splits one submission into tokens.
///
/// The lexer never fails: characters it doesn't know end up inside
/// word tokens and are rejected by the parser.
#[derive(PartialEq, Debug)]
pub struct Lexer {
    chars: Vec<char>,
    offset: usize,
    pub line: usize,
}

impl Lexer {
    /// Create a lexer for `text` whose first character sits on `line`.
    pub fn new(text: &str, line: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            offset: 0,
            line,
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let start = self.offset;
        let line = self.line;
        let kind = match self.next_char()? {
            '[' => TokenKind::BracketOpen,
            ']' => TokenKind::BracketClose,
            c if c.is_whitespace() => {
                self.skip_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            c if c.is_ascii_digit() => self.match_number(),
            _ => {
                self.skip_while(|c| !c.is_whitespace() && !is_bracket(c));
                TokenKind::Word
            }
        };
        let text: String = self.chars[start..self.offset].iter().collect();
        Some(Token::new(kind, text, line))
    }

    fn match_number(&mut self) -> TokenKind {
        self.skip_while(|c| c.is_ascii_digit());
        if self.lookahead() == Some('.')
            && self
                .chars
                .get(self.offset + 1)
                .is_some_and(char::is_ascii_digit)
        {
            self.next_char();
            self.skip_while(|c| c.is_ascii_digit());
        }
        TokenKind::Number
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.lookahead().is_some_and(&pred) {
            self.next_char();
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.lookahead()?;
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn lookahead(&self) -> Option<char> {
        self.chars.get(self.offset).cloned()
    }
}

fn is_bracket(c: char) -> bool {
    c == '[' || c == ']'
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
