//! Micheline to formatted Michelson source
//!
//! The inverse of parsing: renders an expression back into Michelson text,
//! breaking lines at a fixed width. The layout rules are positional: a
//! script root lays its sections out without the surrounding braces,
//! framed expressions pick up parentheses unless their position already
//! delimits them, and `LAMBDA`/`IF*` bodies indent as blocks.

use crate::ast::Micheline;

const LINE_SIZE: usize = 100;

/// Does this application need parentheses when it stands in an
/// undelimited position?
fn is_framed(prim: &str, has_annots: bool) -> bool {
    match prim {
        "Pair" | "Left" | "Right" | "Some" | "pair" | "or" | "option" | "map" | "big_map"
        | "list" | "set" | "contract" | "lambda" | "ticket" | "sapling_state"
        | "sapling_transaction" => true,
        "key" | "unit" | "signature" | "operation" | "int" | "nat" | "string" | "bytes"
        | "mutez" | "bool" | "key_hash" | "timestamp" | "address" | "bls12_381_g1"
        | "bls12_381_g2" | "bls12_381_fr" | "chain_id" | "never" => has_annots,
        _ => false,
    }
}

/// Applications whose arguments lay out as an indented block.
fn is_complex(prim: &str) -> bool {
    prim == "LAMBDA" || prim.starts_with("IF")
}

/// Applications whose arguments never break across lines.
fn is_inline_prim(prim: &str) -> bool {
    prim == "PUSH"
}

/// A top-level sequence of script sections renders without braces.
fn is_script(nodes: &[Micheline]) -> bool {
    nodes.iter().all(|node| {
        matches!(
            node,
            Micheline::Prim { prim, .. } if matches!(prim.as_str(), "parameter" | "storage" | "code")
        )
    })
}

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn format_node(node: &Micheline, indent: &str, inline: bool, is_root: bool, wrapped: bool) -> String {
    match node {
        Micheline::Int { int } => int.clone(),
        Micheline::Bytes { bytes } => format!("0x{}", bytes),
        Micheline::String { string } => quote(string),
        Micheline::Seq(nodes) => {
            let is_script_root = is_root && is_script(nodes);
            let seq_indent = if is_script_root {
                indent.to_string()
            } else {
                format!("{}  ", indent)
            };
            let items: Vec<String> = nodes
                .iter()
                .map(|item| format_node(item, &seq_indent, inline, false, true))
                .collect();
            if items.is_empty() {
                return "{}".to_string();
            }

            let length = indent.len() + items.iter().map(String::len).sum::<usize>() + 4;
            let space = if is_script_root { "" } else { " " };
            let seq = if inline || length < LINE_SIZE {
                items.join(&format!("{}; ", space))
            } else {
                items.join(&format!("{};\n{}", space, seq_indent))
            };
            if is_script_root {
                seq
            } else {
                format!("{{ {} }}", seq)
            }
        }
        Micheline::Prim { prim, annots, args } => {
            let mut expr = prim.clone();
            for annot in annots {
                expr.push(' ');
                expr.push_str(annot);
            }

            if is_complex(prim) {
                let arg_indent = format!("{}  ", indent);
                let items: Vec<String> = args
                    .iter()
                    .map(|arg| format_node(arg, &arg_indent, inline, false, false))
                    .collect();
                let length = indent.len()
                    + expr.len()
                    + items.iter().map(String::len).sum::<usize>()
                    + items.len()
                    + 1;
                if inline || length < LINE_SIZE {
                    expr = format!("{} {}", expr, items.join(" "));
                } else {
                    let mut lines = vec![expr];
                    lines.extend(items);
                    expr = lines.join(&format!("\n{}", arg_indent));
                }
            } else if args.len() == 1 {
                let arg_indent = format!("{}{}", indent, " ".repeat(expr.len() + 1));
                let item = format_node(&args[0], &arg_indent, inline, false, false);
                expr = format!("{} {}", expr, item);
            } else if args.len() > 1 {
                let mut arg_indent = format!("{}  ", indent);
                let alt_indent = format!("{}{}", indent, " ".repeat(expr.len() + 2));
                for arg in args {
                    let item = format_node(arg, &arg_indent, inline, false, false);
                    let length = indent.len() + expr.len() + item.len() + 1;
                    if inline || is_inline_prim(prim) || length < LINE_SIZE {
                        arg_indent = alt_indent.clone();
                        expr = format!("{} {}", expr, item);
                    } else {
                        expr = format!("{}\n{}{}", expr, arg_indent, item);
                    }
                }
            }

            if is_framed(prim, !annots.is_empty()) && !is_root && !wrapped {
                format!("({})", expr)
            } else {
                expr
            }
        }
    }
}

/// Render a Micheline expression as formatted Michelson source.
///
/// With `inline` everything stays on one line, for command-line
/// arguments. With `wrap`, a result spelling a bare data constructor
/// (`Pair`, `Left`, `Right`, `Some`) gains outer parentheses so it can be
/// re-parsed in argument position.
pub fn micheline_to_michelson_opts(node: &Micheline, inline: bool, wrap: bool) -> String {
    let res = format_node(node, "", inline, true, false);
    if wrap
        && ["Left", "Right", "Some", "Pair"]
            .iter()
            .any(|prefix| res.starts_with(prefix))
    {
        format!("({})", res)
    } else {
        res
    }
}

/// Render a Micheline expression with the default multi-line layout.
pub fn micheline_to_michelson(node: &Micheline) -> String {
    micheline_to_michelson_opts(node, false, false)
}
