//! Scanning with spans and error recovery
//!
//! [`scan`] runs the logos lexer over the full source text and returns
//! tokens paired with their byte ranges. An unrecognized character does not
//! abort the scan: it becomes a [`RawToken::Illegal`] spanning exactly that
//! character, and scanning resumes right after it. Rejection is the grammar
//! engine's job; an `Illegal` token that reaches it turns into a positioned
//! parse error.

use std::ops::Range;

use logos::Logos;

use crate::lexer::tokens::Token;

/// A scanned token, or a character no token rule accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    Token(Token),
    Illegal(char),
}

/// A raw token with its byte range in the source.
pub type Spanned = (RawToken, Range<usize>);

/// Tokenize a full source text into an ordered, finite token sequence.
pub fn scan(source: &str) -> Vec<Spanned> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((RawToken::Token(token), span)),
            Err(()) => {
                // One Illegal token per offending character, each spanning
                // exactly that character.
                let mut offset = span.start;
                for ch in source[span.clone()].chars() {
                    let end = offset + ch.len_utf8();
                    tokens.push((RawToken::Illegal(ch), offset..end));
                    offset = end;
                }
            }
        }
    }

    tokens
}
