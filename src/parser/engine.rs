//! Recursive descent over the scanned token stream
//!
//! One function per production: an instruction list, a single item, a
//! primitive application, an argument. Each reduction is a [`Reduction`],
//! which keeps "nothing", "one expression" and "a spliceable instruction
//! list" apart; a braced block reduces to one sequence expression and is
//! never spliced into the list around it.

use std::ops::Range;

use crate::ast::{Micheline, ParseError, Position, SourceMap};
use crate::lexer::{RawToken, Spanned, Token};
use crate::macros::{Expansion, MacroExpander};
use crate::primitives::PrimitiveTable;

/// The value of one grammar reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reduction {
    /// An empty production (nothing between two separators).
    Null,
    /// A single expression.
    One(Micheline),
    /// Semicolon-separated instructions, flattened.
    Many(Vec<Micheline>),
}

impl Reduction {
    /// The expressions this reduction contributes to an enclosing block.
    fn into_elements(self) -> Vec<Micheline> {
        match self {
            Reduction::Null => vec![],
            Reduction::One(node) => vec![node],
            Reduction::Many(nodes) => nodes,
        }
    }
}

pub(crate) struct Engine<'a> {
    tokens: &'a [Spanned],
    cursor: usize,
    map: &'a SourceMap,
    table: &'a dyn PrimitiveTable,
    extra_primitives: &'a [String],
    expander: &'a dyn MacroExpander,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(
        tokens: &'a [Spanned],
        map: &'a SourceMap,
        table: &'a dyn PrimitiveTable,
        extra_primitives: &'a [String],
        expander: &'a dyn MacroExpander,
    ) -> Self {
        Self {
            tokens,
            cursor: 0,
            map,
            table,
            extra_primitives,
            expander,
        }
    }

    /// Reduce the whole token stream to one expression.
    pub(crate) fn run(mut self) -> Result<Micheline, ParseError> {
        let reduction = self.parse_instr()?;
        if let Some((raw, span)) = self.peek() {
            return Err(self.reject(raw, span));
        }
        Ok(match reduction {
            Reduction::Null => Micheline::seq(vec![]),
            Reduction::One(node) => node,
            Reduction::Many(nodes) => Micheline::seq(nodes),
        })
    }

    fn peek(&self) -> Option<(&'a RawToken, &'a Range<usize>)> {
        self.tokens.get(self.cursor).map(|(raw, span)| (raw, span))
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    fn position_at_end(&self) -> Position {
        let offset = self
            .tokens
            .last()
            .map(|(_, span)| span.end)
            .unwrap_or(0);
        self.map.position(offset)
    }

    /// Positioned error for a token the current production cannot accept.
    fn reject(&self, raw: &RawToken, span: &Range<usize>) -> ParseError {
        let position = self.map.start_of(span);
        match raw {
            RawToken::Illegal(ch) => ParseError::illegal_character(position, *ch),
            RawToken::Token(token) => ParseError::unexpected_token(position, token),
        }
    }

    /// `instr : item (SEMI item)*`, spliced flat. Without a separator the
    /// single item's reduction passes through unchanged.
    fn parse_instr(&mut self) -> Result<Reduction, ParseError> {
        let first = self.parse_item()?;
        if !matches!(self.peek(), Some((RawToken::Token(Token::Semi), _))) {
            return Ok(first);
        }

        let mut nodes = first.into_elements();
        while matches!(self.peek(), Some((RawToken::Token(Token::Semi), _))) {
            self.advance();
            nodes.extend(self.parse_item()?.into_elements());
        }
        Ok(Reduction::Many(nodes))
    }

    /// One instruction-position item, or `Null` when the position is empty.
    fn parse_item(&mut self) -> Result<Reduction, ParseError> {
        let (raw, span) = match self.peek() {
            None => return Ok(Reduction::Null),
            Some(peeked) => peeked,
        };
        match raw {
            RawToken::Token(Token::Semi) | RawToken::Token(Token::RBrace) => Ok(Reduction::Null),
            RawToken::Token(Token::Int(text)) => {
                let node = Micheline::int(text.clone());
                self.advance();
                Ok(Reduction::One(node))
            }
            RawToken::Token(Token::Bytes(text)) => {
                let node = Micheline::bytes(text[2..].to_string());
                self.advance();
                Ok(Reduction::One(node))
            }
            RawToken::Token(Token::Str(raw_text)) => {
                let node = self.decode_string(raw_text, span)?;
                self.advance();
                Ok(Reduction::One(node))
            }
            RawToken::Token(Token::LBrace) => Ok(Reduction::One(self.parse_block()?)),
            RawToken::Token(Token::Prim(_)) => Ok(Reduction::One(self.parse_expr()?)),
            _ => Err(self.reject(raw, span)),
        }
    }

    /// `{ instr }`, reduced to one sequence expression.
    fn parse_block(&mut self) -> Result<Micheline, ParseError> {
        self.advance(); // opening brace
        let inner = self.parse_instr()?;
        match self.peek() {
            Some((RawToken::Token(Token::RBrace), _)) => {
                self.advance();
                Ok(Micheline::seq(inner.into_elements()))
            }
            Some((raw, span)) => Err(self.reject(raw, span)),
            None => Err(ParseError::unexpected_eof(self.position_at_end())),
        }
    }

    /// `PRIM annot* arg*`, with macro expansion for unrecognized names.
    fn parse_expr(&mut self) -> Result<Micheline, ParseError> {
        let (name, prim_span) = match self.peek() {
            Some((RawToken::Token(Token::Prim(name)), span)) => (name.clone(), span.clone()),
            Some((raw, span)) => return Err(self.reject(raw, span)),
            None => return Err(ParseError::unexpected_eof(self.position_at_end())),
        };
        self.advance();

        let mut annots = Vec::new();
        while let Some((RawToken::Token(Token::Annot(annot)), _)) = self.peek() {
            annots.push(annot.clone());
            self.advance();
        }

        let mut args = Vec::new();
        while self.at_arg_start() {
            args.push(self.parse_arg()?);
        }

        if self.is_recognized(&name) {
            return Ok(Micheline::prim_with(name, annots, args));
        }

        match self.expander.expand(&name, &annots, &args) {
            Ok(Expansion::One(node)) => Ok(node),
            Ok(Expansion::Many(nodes)) => Ok(Micheline::seq(nodes)),
            Err(err) => Err(ParseError::macro_expansion(
                self.map.start_of(&prim_span),
                err.message,
            )),
        }
    }

    fn is_recognized(&self, name: &str) -> bool {
        self.table.contains(name) || self.extra_primitives.iter().any(|p| p == name)
    }

    fn at_arg_start(&self) -> bool {
        matches!(
            self.peek(),
            Some((
                RawToken::Token(
                    Token::Prim(_)
                        | Token::Int(_)
                        | Token::Bytes(_)
                        | Token::Str(_)
                        | Token::LBrace
                        | Token::LParen
                ),
                _,
            ))
        )
    }

    /// One argument of a primitive application. A bare name in argument
    /// position stays a bare primitive, with no membership check and no
    /// expansion.
    fn parse_arg(&mut self) -> Result<Micheline, ParseError> {
        let (raw, span) = match self.peek() {
            None => return Err(ParseError::unexpected_eof(self.position_at_end())),
            Some(peeked) => peeked,
        };
        match raw {
            RawToken::Token(Token::Prim(name)) => {
                let node = Micheline::prim(name.clone());
                self.advance();
                Ok(node)
            }
            RawToken::Token(Token::Int(text)) => {
                let node = Micheline::int(text.clone());
                self.advance();
                Ok(node)
            }
            RawToken::Token(Token::Bytes(text)) => {
                let node = Micheline::bytes(text[2..].to_string());
                self.advance();
                Ok(node)
            }
            RawToken::Token(Token::Str(raw_text)) => {
                let node = self.decode_string(raw_text, span)?;
                self.advance();
                Ok(node)
            }
            RawToken::Token(Token::LBrace) => self.parse_block(),
            RawToken::Token(Token::LParen) => {
                self.advance();
                let node = self.parse_expr()?;
                match self.peek() {
                    Some((RawToken::Token(Token::RParen), _)) => {
                        self.advance();
                        Ok(node)
                    }
                    Some((raw, span)) => Err(self.reject(raw, span)),
                    None => Err(ParseError::unexpected_eof(self.position_at_end())),
                }
            }
            _ => Err(self.reject(raw, span)),
        }
    }

    /// Decode a quoted literal eagerly; the raw text includes the quotes
    /// and follows JSON string syntax.
    fn decode_string(&self, raw: &str, span: &Range<usize>) -> Result<Micheline, ParseError> {
        match serde_json::from_str::<String>(raw) {
            Ok(decoded) => Ok(Micheline::string(decoded)),
            Err(_) => Err(ParseError::string_decode(self.map.start_of(span), raw)),
        }
    }
}
