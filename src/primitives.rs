//! The recognized built-in primitive names
//!
//! The grammar engine only needs a membership test: is this name a built-in
//! Michelson primitive? The seam is the [`PrimitiveTable`] trait so callers
//! can swap in their own oracle; [`BuiltinPrimitives`] is the default,
//! backed by a static set built once.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Script sections, data constructors, types and instructions, as the
/// protocol names them.
pub const PRIMITIVES: &[&str] = &[
    // Script sections
    "parameter",
    "storage",
    "code",
    // Data constructors
    "Unit",
    "True",
    "False",
    "Pair",
    "Left",
    "Right",
    "Some",
    "None",
    "Elt",
    // Types
    "address",
    "big_map",
    "bls12_381_fr",
    "bls12_381_g1",
    "bls12_381_g2",
    "bool",
    "bytes",
    "chain_id",
    "chest",
    "chest_key",
    "contract",
    "int",
    "key",
    "key_hash",
    "lambda",
    "list",
    "map",
    "mutez",
    "nat",
    "never",
    "operation",
    "option",
    "or",
    "pair",
    "sapling_state",
    "sapling_transaction",
    "set",
    "signature",
    "string",
    "ticket",
    "timestamp",
    "unit",
    // Instructions
    "ABS",
    "ADD",
    "ADDRESS",
    "AMOUNT",
    "AND",
    "APPLY",
    "BALANCE",
    "BLAKE2B",
    "CAR",
    "CAST",
    "CDR",
    "CHAIN_ID",
    "CHECK_SIGNATURE",
    "COMPARE",
    "CONCAT",
    "CONS",
    "CONTRACT",
    "CREATE_ACCOUNT",
    "CREATE_CONTRACT",
    "DIG",
    "DIP",
    "DROP",
    "DUG",
    "DUP",
    "EDIV",
    "EMPTY_BIG_MAP",
    "EMPTY_MAP",
    "EMPTY_SET",
    "EQ",
    "EXEC",
    "FAILWITH",
    "GE",
    "GET",
    "GET_AND_UPDATE",
    "GT",
    "HASH_KEY",
    "IF",
    "IF_CONS",
    "IF_LEFT",
    "IF_NONE",
    "IMPLICIT_ACCOUNT",
    "INT",
    "ISNAT",
    "ITER",
    "JOIN_TICKETS",
    "KECCAK",
    "LAMBDA",
    "LE",
    "LEFT",
    "LEVEL",
    "LOOP",
    "LOOP_LEFT",
    "LSL",
    "LSR",
    "LT",
    "MAP",
    "MEM",
    "MUL",
    "NEG",
    "NEQ",
    "NEVER",
    "NIL",
    "NONE",
    "NOT",
    "NOW",
    "OPEN_CHEST",
    "OR",
    "PACK",
    "PAIR",
    "PAIRING_CHECK",
    "PUSH",
    "READ_TICKET",
    "RENAME",
    "RIGHT",
    "SAPLING_EMPTY_STATE",
    "SAPLING_VERIFY_UPDATE",
    "SELF",
    "SELF_ADDRESS",
    "SENDER",
    "SET_DELEGATE",
    "SHA256",
    "SHA3",
    "SHA512",
    "SIZE",
    "SLICE",
    "SOME",
    "SOURCE",
    "SPLIT_TICKET",
    "STEPS_TO_QUOTA",
    "SUB",
    "SWAP",
    "TICKET",
    "TOTAL_VOTING_POWER",
    "TRANSFER_TOKENS",
    "UNIT",
    "UNPACK",
    "UNPAIR",
    "UPDATE",
    "VOTING_POWER",
    "XOR",
];

static PRIMITIVE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| PRIMITIVES.iter().copied().collect());

/// Is this name a recognized built-in Michelson primitive?
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_SET.contains(name)
}

/// Membership oracle for primitive names, consulted by the grammar engine.
pub trait PrimitiveTable {
    fn contains(&self, name: &str) -> bool;
}

/// The default table: the built-in Michelson primitives.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinPrimitives;

impl PrimitiveTable for BuiltinPrimitives {
    fn contains(&self, name: &str) -> bool {
        is_primitive(name)
    }
}
