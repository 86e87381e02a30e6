//! Michelson source to Micheline
//!
//! [`MichelsonParser`] owns the collaborators a parse call consults: the
//! primitive table, the caller's extra primitives, and the macro expander.
//! It is stateless across calls; one instance can serve any number of
//! parses, concurrently. [`michelson_to_micheline`] is the one-shot
//! convenience entry point.

pub(crate) mod engine;

use crate::ast::{Micheline, ParseError, SourceMap};
use crate::lexer::scan;
use crate::macros::{MacroExpander, MichelsonMacros};
use crate::parser::engine::Engine;
use crate::primitives::{BuiltinPrimitives, PrimitiveTable};

/// A reusable Michelson parser.
pub struct MichelsonParser {
    extra_primitives: Vec<String>,
    table: Box<dyn PrimitiveTable + Send + Sync>,
    expander: Box<dyn MacroExpander + Send + Sync>,
}

impl MichelsonParser {
    /// A parser with the built-in primitive table and the standard macro
    /// set.
    pub fn new() -> Self {
        Self::with_extra_primitives(vec![])
    }

    /// A parser that additionally recognizes the given names as
    /// primitives, exempting them from macro expansion.
    pub fn with_extra_primitives(extra_primitives: Vec<String>) -> Self {
        Self {
            extra_primitives,
            table: Box::new(BuiltinPrimitives),
            expander: Box::new(MichelsonMacros),
        }
    }

    /// A parser with caller-supplied collaborators.
    pub fn with_collaborators(
        table: Box<dyn PrimitiveTable + Send + Sync>,
        expander: Box<dyn MacroExpander + Send + Sync>,
    ) -> Self {
        Self {
            extra_primitives: vec![],
            table,
            expander,
        }
    }

    /// Names recognized beyond the built-in table.
    pub fn extra_primitives(&self) -> &[String] {
        &self.extra_primitives
    }

    /// Parse Michelson source into a Micheline expression.
    ///
    /// Surrounding whitespace is ignored, and one pair of outer
    /// parentheses is stripped when the trimmed text both starts with `(`
    /// and ends with `)`. The stripped pair is not checked for being a
    /// matching pair; `(a) (b)` keeps its inner text as is and fails
    /// later in the grammar.
    pub fn parse(&self, code: &str) -> Result<Micheline, ParseError> {
        let mut code = code.trim();
        if code.starts_with('(') && code.ends_with(')') {
            code = &code[1..code.len() - 1];
        }

        let tokens = scan(code);
        let map = SourceMap::new(code);
        Engine::new(
            &tokens,
            &map,
            self.table.as_ref(),
            &self.extra_primitives,
            self.expander.as_ref(),
        )
        .run()
    }
}

impl Default for MichelsonParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse Michelson source with a fresh default parser.
pub fn michelson_to_micheline(code: &str) -> Result<Micheline, ParseError> {
    MichelsonParser::new().parse(code)
}
