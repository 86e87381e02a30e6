//! Error type for Michelson parsing
//!
//! Every failure mode of a parse call, lexical or grammatical, collapses
//! into one positioned [`ParseError`]. A failed call never returns a
//! partial tree.

use std::fmt;

use crate::ast::position::Position;

/// What went wrong during a parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token the grammar could not reduce.
    UnexpectedToken,
    /// Input ended while a production was still open.
    UnexpectedEof,
    /// The lexer hit a character no token rule accepts.
    IllegalCharacter,
    /// A quoted string literal carries an invalid escape sequence.
    StringDecode,
    /// The macro expander rejected a non-primitive name.
    MacroExpansion,
}

/// A positioned parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
        }
    }

    pub fn unexpected_token(position: Position, token: impl fmt::Display) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            position,
            format!("failed to parse expression, unexpected token `{}`", token),
        )
    }

    pub fn unexpected_eof(position: Position) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            position,
            "unexpected end of input",
        )
    }

    pub fn illegal_character(position: Position, ch: char) -> Self {
        Self::new(
            ParseErrorKind::IllegalCharacter,
            position,
            format!("illegal character `{}`", ch),
        )
    }

    pub fn string_decode(position: Position, raw: &str) -> Self {
        Self::new(
            ParseErrorKind::StringDecode,
            position,
            format!("invalid string literal {}", raw),
        )
    }

    pub fn macro_expansion(position: Position, message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::MacroExpansion, position, message)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}
