//! Parser - Build a formula tree from tokens
//!
//! Recursive descent with one token of lookahead:
//!
//! ```text
//! program := expr*
//! expr    := (FN arg{arity} | ID | '{' expr* '}')? (INFIX expr)?
//! arg     := expr
//! ```
//!
//! Infix operators are right-associative, so `a^b^c` is `^(a, ^(b, c))`.

use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::model::Node;
use crate::symbols;

/// How many expressions may be open at once (arguments, groups and infix
/// right-hand sides all count)
pub const MAX_NESTING: usize = 128;

/// Parser for formula markup
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    line: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser and read the first token
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            line: 1,
            depth: 0,
        }
    }

    /// Parse the whole program into a `Compound`
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        let mut children = Vec::new();
        while let Some(expr) = self.parse_expr()? {
            children.push(expr);
        }
        self.expect(TokenKind::EndOfInput)?;

        tracing::trace!(expressions = children.len(), lines = self.line, "parsed program");
        Ok(Node::compound(children))
    }

    /// Check the current token's kind and advance past it
    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        if self.current.kind != kind {
            return Err(ParseError::unexpected(self.current.text, self.line));
        }
        let token = self.current;
        self.current = self.lexer.next_token();
        Ok(token)
    }

    /// Parse one expression, or `None` where no expression can start
    fn parse_expr(&mut self) -> Result<Option<Node>, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new("nesting too deep", self.line));
        }
        self.depth += 1;
        let expr = self.parse_expr_inner();
        self.depth -= 1;
        expr
    }

    fn parse_expr_inner(&mut self) -> Result<Option<Node>, ParseError> {
        while self.current.kind == TokenKind::Newline {
            self.expect(TokenKind::Newline)?;
            self.line += 1;
        }

        let primary = match self.current.kind {
            TokenKind::FunctionName => Some(self.parse_fn()?),
            TokenKind::Identifier => Some(self.parse_id()?),
            TokenKind::OpenGroup => Some(self.parse_group()?),
            _ => None,
        };

        if self.current.kind != TokenKind::InfixOperator {
            return Ok(primary);
        }

        let op = self.expect(TokenKind::InfixOperator)?;
        let lhs = primary.unwrap_or(Node::Empty);
        let rhs = self.parse_expr()?.unwrap_or(Node::Empty);
        Ok(Some(Node::function(op.text, vec![lhs, rhs])))
    }

    fn parse_id(&mut self) -> Result<Node, ParseError> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Node::identifier(token.text))
    }

    /// Parse `\name` followed by exactly `arity(name)` argument expressions
    fn parse_fn(&mut self) -> Result<Node, ParseError> {
        let token = self.expect(TokenKind::FunctionName)?;
        let arity = symbols::arity(token.text);

        let mut args = Vec::with_capacity(arity);
        for _ in 0..arity {
            match self.parse_expr()? {
                Some(arg) => args.push(arg),
                None => {
                    return Err(ParseError::new(
                        format!(
                            "\\{} expects {} argument{}, found {}",
                            token.text,
                            arity,
                            if arity == 1 { "" } else { "s" },
                            describe(&self.current)
                        ),
                        self.line,
                    ))
                }
            }
        }

        Ok(Node::function(token.text, args))
    }

    /// Parse `{ expr* }`
    fn parse_group(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::OpenGroup)?;
        let mut children = Vec::new();
        while let Some(expr) = self.parse_expr()? {
            children.push(expr);
        }
        self.expect(TokenKind::CloseGroup)?;

        Ok(match children.len() {
            0 => Node::Empty,
            1 => children.remove(0),
            _ => Node::Compound { children },
        })
    }
}

fn describe(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::EndOfInput => "end of input".to_string(),
        _ => format!("'{}'", token.text.escape_debug()),
    }
}

/// Parse formula source into a tree
pub fn parse(input: &str) -> Result<Node, ParseError> {
    Parser::new(input).parse()
}
