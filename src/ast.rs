//! Expression model, positions and errors
//!
//! The parser's output type ([`Micheline`]) together with the position
//! tracking ([`Position`], [`SourceMap`]) and the error type
//! ([`ParseError`]) shared by the lexer and the grammar engine.

pub mod error;
pub mod micheline;
pub mod position;

pub use error::{ParseError, ParseErrorKind};
pub use micheline::Micheline;
pub use position::{Position, SourceMap};
