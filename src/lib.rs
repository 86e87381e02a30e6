//! Michelson parser
//!
//! Compiles Michelson source text, the human-readable syntax of Tezos
//! smart contracts, into Micheline, the JSON-shaped expression tree the
//! protocol consumes. The pipeline is a lexer with byte-range spans, a
//! recursive descent grammar engine, and two pluggable collaborators: a
//! primitive table deciding which names are built in, and a macro
//! expander rewriting the rest into primitive instructions.
//!
//! ```
//! use michelson_parser::michelson_to_micheline;
//!
//! let tree = michelson_to_micheline("PUSH int 1; DROP")?;
//! ```
//!
//! [`micheline_to_michelson`] renders a tree back into formatted source.

pub mod ast;
pub mod format;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod primitives;

pub use ast::{Micheline, ParseError, ParseErrorKind, Position, SourceMap};
pub use format::{micheline_to_michelson, micheline_to_michelson_opts};
pub use macros::{Expansion, MacroError, MacroExpander, MichelsonMacros};
pub use parser::{michelson_to_micheline, MichelsonParser};
pub use primitives::{is_primitive, BuiltinPrimitives, PrimitiveTable, PRIMITIVES};
