//! Property tests: the parser must never panic, must be deterministic,
//! and must invert the formatter over well-formed trees.

use proptest::prelude::*;

use michelson_parser::{
    micheline_to_michelson, micheline_to_michelson_opts, michelson_to_micheline, Micheline,
};

/// Leaf expressions whose rendering contains no characters that need
/// escaping, so text comparisons stay exact.
fn leaf() -> impl Strategy<Value = Micheline> {
    prop_oneof![
        any::<i64>().prop_map(|n| Micheline::int(n.to_string())),
        "[0-9a-f]{0,8}".prop_map(Micheline::bytes),
        "[a-zA-Z0-9 _.,!]{0,12}".prop_map(Micheline::string),
        prop::sample::select(vec![
            "CAR", "CDR", "SWAP", "DROP", "UNIT", "ADD", "PAIR", "unit", "int", "nat",
        ])
        .prop_map(Micheline::prim),
    ]
}

/// Trees built only from shapes the parser can reproduce: sequences and
/// type applications of framed primitives.
fn micheline_tree() -> impl Strategy<Value = Micheline> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Micheline::seq),
            (
                prop::sample::select(vec!["pair", "option", "list", "or"]),
                prop::collection::vec(inner, 1..3),
            )
                .prop_map(|(name, args)| Micheline::prim_with(name, vec![], args)),
        ]
    })
}

proptest! {
    #[test]
    fn parse_never_panics_and_is_deterministic(source in "\\PC{0,60}") {
        let first = michelson_to_micheline(&source);
        let second = michelson_to_micheline(&source);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn format_then_parse_is_identity(tree in micheline_tree()) {
        let rendered = micheline_to_michelson(&tree);
        let reparsed = michelson_to_micheline(&rendered);
        prop_assert_eq!(reparsed.as_ref(), Ok(&tree), "rendered: {}", rendered);
    }

    #[test]
    fn inline_rendering_parses_to_the_same_tree(tree in micheline_tree()) {
        let multiline = michelson_to_micheline(&micheline_to_michelson(&tree));
        let inline = michelson_to_micheline(&micheline_to_michelson_opts(&tree, true, false));
        prop_assert_eq!(multiline, inline);
    }

    #[test]
    fn wire_shape_round_trips_through_serde(tree in micheline_tree()) {
        let text = serde_json::to_string(&tree).expect("serialization cannot fail");
        let back: Micheline = serde_json::from_str(&text).expect("own output must deserialize");
        prop_assert_eq!(back, tree);
    }
}
