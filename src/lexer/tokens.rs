//! Token definitions for the Michelson surface syntax
//!
//! The tokens are defined with the logos derive macro, which compiles the
//! rules into matcher tables once, at build time. Longest match wins, so
//! `0x00` scans as one byte-string token rather than an integer followed
//! by a primitive name.
//!
//! Ignored spans are whitespace, `#` line comments, and `/* ... */` block
//! comments. The block-comment rule deliberately excludes `*` from the
//! comment body, so `/* a * b */` does not scan as a comment. This
//! reproduces a limitation of the scanner this crate is compatible with;
//! widening the rule would change which programs are accepted.

use std::fmt;

use logos::Logos;

/// All tokens of the Michelson surface syntax.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"/\*[^*]*\*/")]
pub enum Token {
    /// Integer literal: optional `-`, then digits. Kept as its decimal spelling.
    #[regex(r"-?[0-9]+", |lex| lex.slice().to_owned())]
    Int(String),

    /// Byte-string literal: `0x` plus hex digits. Length and parity are not
    /// validated here; `0x` alone and odd-length bodies pass through.
    #[regex(r"0x[A-Fa-f0-9]*", |lex| lex.slice().to_owned())]
    Bytes(String),

    /// Quoted string literal, raw text including the quotes. Escape
    /// sequences are decoded later, in the grammar action.
    #[regex(r#""(\\.|[^"\\])*""#, |lex| lex.slice().to_owned())]
    Str(String),

    /// Annotation: one or more of `:` `@` `%`, then an optional identifier.
    #[regex(r"[:@%]+[_0-9a-zA-Z.]*", |lex| lex.slice().to_owned())]
    Annot(String),

    /// Primitive name: a letter, then letters/digits/underscores. Minimum
    /// length two; a single letter is not a valid name.
    #[regex(r"[A-Za-z][A-Za-z0-9_]+", |lex| lex.slice().to_owned())]
    Prim(String),

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semi,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(text)
            | Token::Bytes(text)
            | Token::Str(text)
            | Token::Annot(text)
            | Token::Prim(text) => write!(f, "{}", text),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Semi => write!(f, ";"),
        }
    }
}
