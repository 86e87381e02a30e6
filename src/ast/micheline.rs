//! The Micheline expression type
//!
//! Micheline is the canonical tree representation the parser emits. It is
//! an explicit tagged union rather than a generic container, so the
//! flatten-vs-wrap decisions in the grammar are exhaustive matches. The
//! serde model produces exactly the canonical wire shapes:
//!
//! ```text
//! {"int": "<decimal>"}
//! {"bytes": "<hex, no 0x prefix>"}
//! {"string": "<unescaped text>"}
//! {"prim": "<name>", "annots": [...], "args": [...]}
//! [ ... ]            (a sequence)
//! ```
//!
//! Empty `annots`/`args` keys are omitted on serialization, the way the
//! downstream tooling expects them.

use serde::{Deserialize, Serialize};

/// A Micheline expression.
///
/// `Seq` is the value of a `{ ... }` block parsed at instruction position.
/// Argument-position blocks and `;`-concatenations reduce through a bare
/// `Vec<Micheline>` inside the grammar engine and only become a `Seq` when
/// bound into a slot that holds a single expression; both spellings share
/// the bare-array wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Micheline {
    Int {
        int: String,
    },
    Bytes {
        bytes: String,
    },
    String {
        string: String,
    },
    Prim {
        prim: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        annots: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<Micheline>,
    },
    Seq(Vec<Micheline>),
}

impl Micheline {
    /// An integer literal from its decimal spelling.
    pub fn int(value: impl Into<String>) -> Self {
        Micheline::Int { int: value.into() }
    }

    /// A byte-string literal from its hex body (no `0x` prefix).
    pub fn bytes(hex: impl Into<String>) -> Self {
        Micheline::Bytes { bytes: hex.into() }
    }

    /// A string literal from already-unescaped text.
    pub fn string(text: impl Into<String>) -> Self {
        Micheline::String {
            string: text.into(),
        }
    }

    /// A primitive application with no annotations and no arguments.
    pub fn prim(name: impl Into<String>) -> Self {
        Micheline::Prim {
            prim: name.into(),
            annots: Vec::new(),
            args: Vec::new(),
        }
    }

    /// A primitive application with annotations and arguments.
    pub fn prim_with(name: impl Into<String>, annots: Vec<String>, args: Vec<Micheline>) -> Self {
        Micheline::Prim {
            prim: name.into(),
            annots,
            args,
        }
    }

    /// An explicit sequence.
    pub fn seq(items: Vec<Micheline>) -> Self {
        Micheline::Seq(items)
    }

    /// The primitive name, if this is a primitive application.
    pub fn prim_name(&self) -> Option<&str> {
        match self {
            Micheline::Prim { prim, .. } => Some(prim),
            _ => None,
        }
    }

    /// The items of a sequence, if this is one.
    pub fn as_seq(&self) -> Option<&[Micheline]> {
        match self {
            Micheline::Seq(items) => Some(items),
            _ => None,
        }
    }
}
