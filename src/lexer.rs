//! Lexer
//!
//! Scans raw Michelson source text into an ordered, finite token stream.
//! Token rules live in [`tokens`]; [`scan`] pairs each token with its byte
//! range and recovers from unrecognized characters so the grammar engine
//! can report them with exact positions.

pub mod scan;
pub mod tokens;

pub use scan::{scan, RawToken, Spanned};
pub use tokens::Token;
