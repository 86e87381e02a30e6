//! Formatting is the inverse of parsing: rendered source parses back to
//! the tree it was rendered from.

use rstest::rstest;

use michelson_parser::{micheline_to_michelson, micheline_to_michelson_opts, michelson_to_micheline};

#[rstest]
#[case("42")]
#[case("0x00aaff")]
#[case(r#""hello world""#)]
#[case("UNIT")]
#[case("{}")]
#[case("{ CAR ; CDR }")]
#[case("PUSH (int :t) 1")]
#[case("NIL (pair int nat)")]
#[case("Pair 1 (Pair 2 3)")]
#[case("IF { CAR } { CDR }")]
#[case("LAMBDA unit unit { DROP ; UNIT }")]
#[case("parameter unit; storage int; code { CDR; PUSH int 1; ADD; NIL operation; PAIR }")]
#[case(r#"{ Elt "a" 1 ; Elt "b" 2 }"#)]
fn test_parse_format_parse(#[case] source: &str) {
    let first = michelson_to_micheline(source).expect("source should parse");
    let rendered = micheline_to_michelson(&first);
    let second = michelson_to_micheline(&rendered)
        .unwrap_or_else(|err| panic!("rendered source failed to parse: {}\n{}", err, rendered));
    assert_eq!(first, second);
}

#[test]
fn test_script_renders_without_outer_braces() {
    let source = "parameter unit; storage int; code { CDR; PUSH int 1; ADD; NIL operation; PAIR }";
    let node = michelson_to_micheline(source).unwrap();
    assert_eq!(
        micheline_to_michelson(&node),
        "parameter unit; storage int; code { CDR ; PUSH int 1 ; ADD ; NIL operation ; PAIR }"
    );
}

#[test]
fn test_expanded_macro_renders_as_plain_instructions() {
    let node = michelson_to_micheline("ASSERT_EQ").unwrap();
    assert_eq!(
        micheline_to_michelson(&node),
        "{ EQ ; IF {} { { UNIT ; FAILWITH } } }"
    );
}

#[test]
fn test_wrapped_rendering_survives_argument_position() {
    let node = michelson_to_micheline("Pair 1 2").unwrap();
    let rendered = micheline_to_michelson_opts(&node, false, true);
    assert_eq!(rendered, "(Pair 1 2)");
    assert_eq!(michelson_to_micheline(&rendered).unwrap(), node);
}

#[test]
fn test_inline_rendering_reparses() {
    let source = "parameter unit; storage int; code { CDR; NIL operation; PAIR }";
    let node = michelson_to_micheline(source).unwrap();
    let rendered = micheline_to_michelson_opts(&node, true, false);
    assert!(!rendered.contains('\n'));
    assert_eq!(michelson_to_micheline(&rendered).unwrap(), node);
}
