//! Lexer - Split formula source into tokens
//!
//! Tokens are produced lazily, one per call. The lexer never fails: anything
//! it does not recognise becomes part of an identifier run, and malformed
//! input is left for the parser to reject.

use serde::Serialize;
use std::fmt;

// =============================================================================
// Tokens
// =============================================================================

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// A run of plain glyph text
    Identifier,
    /// A `\name`; the token text is the name without the backslash
    FunctionName,
    /// `^` or `_`
    InfixOperator,
    /// A line break, only used for line numbers
    Newline,
    /// `{`
    OpenGroup,
    /// `}`
    CloseGroup,
    /// No more input
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "ID",
            TokenKind::FunctionName => "FN",
            TokenKind::InfixOperator => "INFIX",
            TokenKind::Newline => "NEWLINE",
            TokenKind::OpenGroup => "LBRACE",
            TokenKind::CloseGroup => "RBRACE",
            TokenKind::EndOfInput => "EOF",
        };
        f.write_str(name)
    }
}

/// A token borrowing its lexeme from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    pub fn end_of_input() -> Self {
        Self::new(TokenKind::EndOfInput, "")
    }
}

// =============================================================================
// Lexer
// =============================================================================

/// Characters that end an identifier run
fn is_reserved(c: char) -> bool {
    matches!(c, '{' | '}' | '\n' | '\\' | '^' | '_' | ' ' | '\t' | '\r')
}

/// Horizontal whitespace, skipped between tokens
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// Lexer over a borrowed source string
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            finished: false,
        }
    }

    /// Produce the next token; returns `EndOfInput` forever once exhausted
    pub fn next_token(&mut self) -> Token<'a> {
        while self.peek().is_some_and(is_blank) {
            self.advance();
        }

        let c = match self.peek() {
            Some(c) => c,
            None => return Token::end_of_input(),
        };

        let start = self.position;
        match c {
            '{' => {
                self.advance();
                Token::new(TokenKind::OpenGroup, self.slice(start))
            }
            '}' => {
                self.advance();
                Token::new(TokenKind::CloseGroup, self.slice(start))
            }
            '^' | '_' => {
                self.advance();
                Token::new(TokenKind::InfixOperator, self.slice(start))
            }
            '\n' => {
                self.advance();
                Token::new(TokenKind::Newline, self.slice(start))
            }
            '\\' => {
                self.advance();
                Token::new(TokenKind::FunctionName, self.collect_run())
            }
            _ => Token::new(TokenKind::Identifier, self.collect_run()),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.position += c.len_utf8();
        }
    }

    fn slice(&self, start: usize) -> &'a str {
        &self.input[start..self.position]
    }

    /// Consume a maximal run of non-reserved characters
    fn collect_run(&mut self) -> &'a str {
        let start = self.position;
        while self.peek().is_some_and(|c| !is_reserved(c)) {
            self.advance();
        }
        self.slice(start)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::EndOfInput {
            self.finished = true;
            return None;
        }
        Some(token)
    }
}

/// Lex a whole source into a token list, excluding `EndOfInput`
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}
