//! Macro expansion for non-primitive names
//!
//! When the grammar engine reduces `PRIM annots args` and the name is not a
//! recognized primitive, it hands the ordered triple to a [`MacroExpander`].
//! [`MichelsonMacros`] is the default expander: a dispatch table of
//! compiled name patterns, built once, each mapped to a handler that
//! rewrites the application into primitive instructions.
//!
//! Handlers validate the shape of `annots`/`args` for their macro and fail
//! with a message the engine turns into a positioned parse error.

mod pair;

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::Micheline;
use crate::macros::pair::{traverse_pxr_tree, PairNode};
use crate::primitives;

/// The result of expanding one macro application: a single expression, or
/// an ordered list of instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    One(Micheline),
    Many(Vec<Micheline>),
}

impl Expansion {
    /// Flatten into an instruction list; a single expression becomes a
    /// singleton.
    pub fn into_vec(self) -> Vec<Micheline> {
        match self {
            Expansion::One(node) => vec![node],
            Expansion::Many(nodes) => nodes,
        }
    }
}

/// A macro application the expander rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroError {
    pub message: String,
}

impl MacroError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn unknown(prim: &str) -> Self {
        Self::new(format!("unknown primitive `{}`", prim))
    }

    fn no_args(name: &str) -> Self {
        Self::new(format!("macro `{}` takes no arguments", name))
    }

    fn no_annots(name: &str) -> Self {
        Self::new(format!("macro `{}` takes no annotations", name))
    }

    fn arity(name: &str, expected: usize) -> Self {
        Self::new(format!("macro `{}` expects {} argument(s)", name, expected))
    }
}

impl fmt::Display for MacroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MacroError {}

/// Expansion facility for names the primitive table does not recognize.
pub trait MacroExpander {
    /// Expand `(name, annots, args)` or reject the application. The engine
    /// wraps a `Many` result into a sequence and uses a `One` directly.
    fn expand(
        &self,
        prim: &str,
        annots: &[String],
        args: &[Micheline],
    ) -> Result<Expansion, MacroError>;
}

/// The standard Michelson macro set.
#[derive(Debug, Default, Clone, Copy)]
pub struct MichelsonMacros;

impl MacroExpander for MichelsonMacros {
    fn expand(
        &self,
        prim: &str,
        annots: &[String],
        args: &[Micheline],
    ) -> Result<Expansion, MacroError> {
        if primitives::is_primitive(prim) {
            return Ok(Expansion::One(Micheline::prim_with(
                prim,
                annots.to_vec(),
                args.to_vec(),
            )));
        }
        let expanded = dispatch(prim, annots, args)?;
        Ok(Expansion::Many(expanded.into_vec()))
    }
}

/// Expansion during another expansion: handler results stay unwrapped so
/// callers can splice them.
fn expand_internal(
    prim: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if primitives::is_primitive(prim) {
        return Ok(Expansion::One(Micheline::prim_with(
            prim,
            annots.to_vec(),
            args.to_vec(),
        )));
    }
    dispatch(prim, annots, args)
}

type Handler = fn(&str, &[String], &[Micheline]) -> Result<Expansion, MacroError>;

/// Dispatch table; first matching pattern wins. Each pattern is anchored,
/// and handlers receive the first capture group (the whole name when the
/// pattern has none).
static MACROS: Lazy<Vec<(Regex, Handler)>> = Lazy::new(|| {
    let table: Vec<(&str, Handler)> = vec![
        (r"^CMP(EQ|NEQ|LT|GT|LE|GE)$", expand_cmpx),
        (r"^IF(EQ|NEQ|LT|GT|LE|GE)$", expand_ifx),
        (r"^IFCMP(EQ|NEQ|LT|GT|LE|GE)$", expand_ifcmpx),
        (r"^FAIL$", expand_fail),
        (r"^ASSERT$", expand_assert),
        (r"^ASSERT_(EQ|NEQ|LT|LE|GT|GE)$", expand_assert_x),
        (r"^ASSERT_CMP(EQ|NEQ|LT|LE|GT|GE)$", expand_assert_cmpx),
        (r"^ASSERT_NONE$", expand_assert_none),
        (r"^ASSERT_SOME$", expand_assert_some),
        (r"^ASSERT_LEFT$", expand_assert_left),
        (r"^ASSERT_RIGHT$", expand_assert_right),
        (r"^D(II+)P$", expand_dixp),
        (r"^D(UU+)P$", expand_duxp),
        (r"^P[PAI]{3,}R$", expand_pxr),
        (r"^UN(P[PAI]{3,}R)$", expand_unpxr),
        (r"^CA([AD]+)R$", expand_caxr),
        (r"^CD([AD]+)R$", expand_cdxr),
        (r"^IF_SOME$", expand_if_some),
        (r"^IF_RIGHT$", expand_if_right),
        (r"^SET_CAR$", expand_set_car),
        (r"^SET_CDR$", expand_set_cdr),
        (r"^SET_CA([AD]+)R$", expand_set_caxr),
        (r"^SET_CD([AD]+)R$", expand_set_cdxr),
        (r"^MAP_CAR$", expand_map_car),
        (r"^MAP_CDR$", expand_map_cdr),
        (r"^MAP_CA([AD]+)R$", expand_map_caxr),
        (r"^MAP_CD([AD]+)R$", expand_map_cdxr),
    ];
    table
        .into_iter()
        .map(|(pattern, handler)| (Regex::new(pattern).unwrap(), handler))
        .collect()
});

fn dispatch(prim: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    for (pattern, handler) in MACROS.iter() {
        if let Some(caps) = pattern.captures(prim) {
            // Patterns are anchored, so the whole match is the name itself.
            let group = caps.get(1).map_or(prim, |m| m.as_str());
            return handler(group, annots, args);
        }
    }
    Err(MacroError::unknown(prim))
}

// Building blocks shared by the handlers.

fn compare() -> Micheline {
    Micheline::prim("COMPARE")
}

fn swap() -> Micheline {
    Micheline::prim("SWAP")
}

fn dup() -> Micheline {
    Micheline::prim("DUP")
}

fn car_propagated() -> Micheline {
    Micheline::prim_with("CAR", vec!["@%%".to_string()], vec![])
}

fn cdr_propagated() -> Micheline {
    Micheline::prim_with("CDR", vec!["@%%".to_string()], vec![])
}

/// `{ { UNIT ; FAILWITH } }`, the failure branch used by the assertion
/// macros.
fn fail() -> Micheline {
    Micheline::seq(vec![Micheline::seq(vec![
        Micheline::prim("UNIT"),
        Micheline::prim("FAILWITH"),
    ])])
}

/// `DIP` (with an explicit depth beyond one) around an instruction list.
pub(crate) fn dip_n(code: Vec<Micheline>, depth: usize) -> Micheline {
    if depth == 1 {
        Micheline::prim_with("DIP", vec![], vec![Micheline::seq(code)])
    } else {
        Micheline::prim_with(
            "DIP",
            vec![],
            vec![Micheline::int(depth.to_string()), Micheline::seq(code)],
        )
    }
}

fn field_annots(annots: &[String]) -> Vec<String> {
    annots
        .iter()
        .filter(|a| a.starts_with('%'))
        .cloned()
        .collect()
}

fn var_annots(annots: &[String]) -> Vec<String> {
    annots
        .iter()
        .filter(|a| a.starts_with('@'))
        .cloned()
        .collect()
}

// Handlers. `group` is the captured part of the macro name.

fn expand_cmpx(group: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args(&format!("CMP{}", group)));
    }
    Ok(Expansion::Many(vec![
        compare(),
        Micheline::prim_with(group, annots.to_vec(), vec![]),
    ]))
}

fn expand_ifx(group: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    if args.len() != 2 {
        return Err(MacroError::arity(&format!("IF{}", group), 2));
    }
    Ok(Expansion::Many(vec![
        Micheline::prim_with(group, annots.to_vec(), vec![]),
        Micheline::prim_with("IF", vec![], args.to_vec()),
    ]))
}

fn expand_ifcmpx(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if args.len() != 2 {
        return Err(MacroError::arity(&format!("IFCMP{}", group), 2));
    }
    Ok(Expansion::Many(vec![
        Micheline::seq(vec![
            compare(),
            Micheline::prim_with(group, annots.to_vec(), vec![]),
        ]),
        Micheline::prim_with("IF", vec![], args.to_vec()),
    ]))
}

fn expand_fail(_group: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    if !annots.is_empty() {
        return Err(MacroError::no_annots("FAIL"));
    }
    if !args.is_empty() {
        return Err(MacroError::no_args("FAIL"));
    }
    Ok(Expansion::Many(vec![
        Micheline::prim("UNIT"),
        Micheline::prim("FAILWITH"),
    ]))
}

fn expand_assert(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !annots.is_empty() {
        return Err(MacroError::no_annots("ASSERT"));
    }
    if !args.is_empty() {
        return Err(MacroError::no_args("ASSERT"));
    }
    Ok(Expansion::One(Micheline::prim_with(
        "IF",
        vec![],
        vec![Micheline::seq(vec![]), fail()],
    )))
}

fn expand_assert_x(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    let name = format!("ASSERT_{}", group);
    if !args.is_empty() {
        return Err(MacroError::no_args(&name));
    }
    if !annots.is_empty() {
        return Err(MacroError::no_annots(&name));
    }
    expand_ifx(group, &[], &[Micheline::seq(vec![]), fail()])
}

fn expand_assert_cmpx(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    let name = format!("ASSERT_CMP{}", group);
    if !args.is_empty() {
        return Err(MacroError::no_args(&name));
    }
    if !annots.is_empty() {
        return Err(MacroError::no_annots(&name));
    }
    expand_ifcmpx(group, &[], &[Micheline::seq(vec![]), fail()])
}

fn expand_assert_none(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !annots.is_empty() {
        return Err(MacroError::no_annots("ASSERT_NONE"));
    }
    if !args.is_empty() {
        return Err(MacroError::no_args("ASSERT_NONE"));
    }
    Ok(Expansion::One(Micheline::prim_with(
        "IF_NONE",
        vec![],
        vec![Micheline::seq(vec![]), fail()],
    )))
}

fn expand_assert_some(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args("ASSERT_SOME"));
    }
    Ok(Expansion::One(Micheline::prim_with(
        "IF_NONE",
        vec![],
        vec![
            fail(),
            Micheline::seq(vec![Micheline::prim_with("RENAME", annots.to_vec(), vec![])]),
        ],
    )))
}

fn expand_assert_left(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args("ASSERT_LEFT"));
    }
    Ok(Expansion::One(Micheline::prim_with(
        "IF_LEFT",
        vec![],
        vec![
            Micheline::seq(vec![Micheline::prim_with("RENAME", annots.to_vec(), vec![])]),
            fail(),
        ],
    )))
}

fn expand_assert_right(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args("ASSERT_RIGHT"));
    }
    Ok(Expansion::One(Micheline::prim_with(
        "IF_LEFT",
        vec![],
        vec![
            fail(),
            Micheline::seq(vec![Micheline::prim_with("RENAME", annots.to_vec(), vec![])]),
        ],
    )))
}

fn expand_dixp(group: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    let name = format!("D{}P", group);
    if !annots.is_empty() {
        return Err(MacroError::no_annots(&name));
    }
    if args.len() != 1 {
        return Err(MacroError::arity(&name, 1));
    }
    Ok(Expansion::One(dip_n(args.to_vec(), group.len())))
}

fn expand_duxp(group: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args(&format!("D{}P", group)));
    }
    Ok(Expansion::One(Micheline::prim_with(
        "DUP",
        annots.to_vec(),
        vec![Micheline::int(group.len().to_string())],
    )))
}

fn expand_pxr(group: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args(group));
    }
    let vars = var_annots(annots);
    let produce = |node: &PairNode| {
        let (left, right) = &node.annots;
        let mut pair_annots = Vec::new();
        if left.is_some() || right.is_some() {
            pair_annots.push(left.clone().unwrap_or_else(|| "%".to_string()));
            if let Some(right) = right {
                pair_annots.push(right.clone());
            }
        }
        if node.is_root {
            pair_annots.extend(vars.iter().cloned());
        }
        Expansion::One(Micheline::prim_with("PAIR", pair_annots, vec![]))
    };
    Ok(Expansion::Many(traverse_pxr_tree(
        group,
        &field_annots(annots),
        produce,
    )?))
}

fn expand_unpxr(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args(&format!("UN{}", group)));
    }
    let produce = |node: &PairNode| {
        let (left, right) = &node.annots;
        let mut unpair_annots = Vec::new();
        if let Some(left) = left {
            unpair_annots.push(left.clone());
        }
        if let Some(right) = right {
            unpair_annots.push(right.clone());
        }
        Expansion::Many(vec![Micheline::prim_with("UNPAIR", unpair_annots, vec![])])
    };
    let mut expanded = traverse_pxr_tree(group, annots, produce)?;
    expanded.reverse();
    Ok(Expansion::Many(expanded))
}

/// Shared tail of `CA..R` / `CD..R`: expand the rest of the access path,
/// threading the annotations to the innermost instruction.
fn expand_cxr(group: &str, annots: &[String]) -> Result<Vec<Micheline>, MacroError> {
    Ok(expand_internal(&format!("C{}R", group), annots, &[])?.into_vec())
}

fn expand_caxr(group: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args(&format!("CA{}R", group)));
    }
    let mut expanded = vec![Micheline::prim("CAR")];
    expanded.extend(expand_cxr(group, annots)?);
    Ok(Expansion::Many(expanded))
}

fn expand_cdxr(group: &str, annots: &[String], args: &[Micheline]) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args(&format!("CD{}R", group)));
    }
    let mut expanded = vec![Micheline::prim("CDR")];
    expanded.extend(expand_cxr(group, annots)?);
    Ok(Expansion::Many(expanded))
}

fn expand_if_some(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !annots.is_empty() {
        return Err(MacroError::no_annots("IF_SOME"));
    }
    if args.len() != 2 {
        return Err(MacroError::arity("IF_SOME", 2));
    }
    Ok(Expansion::One(Micheline::prim_with(
        "IF_NONE",
        vec![],
        vec![args[1].clone(), args[0].clone()],
    )))
}

fn expand_if_right(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !annots.is_empty() {
        return Err(MacroError::no_annots("IF_RIGHT"));
    }
    if args.len() != 2 {
        return Err(MacroError::arity("IF_RIGHT", 2));
    }
    Ok(Expansion::One(Micheline::prim_with(
        "IF_LEFT",
        vec![],
        vec![args[1].clone(), args[0].clone()],
    )))
}

fn expand_set_car(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args("SET_CAR"));
    }
    Ok(Expansion::Many(vec![
        swap(),
        Micheline::prim_with("UPDATE", annots.to_vec(), vec![Micheline::int("1")]),
    ]))
}

fn expand_set_cdr(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args("SET_CDR"));
    }
    Ok(Expansion::Many(vec![
        swap(),
        Micheline::prim_with("UPDATE", annots.to_vec(), vec![Micheline::int("2")]),
    ]))
}

/// Shared tail of the deep `SET_C..R` forms: the inner setter and the
/// rebuilding `PAIR`.
fn expand_set_cxr(group: &str, annots: &[String]) -> Result<(Vec<Micheline>, Micheline), MacroError> {
    let set_cxr =
        expand_internal(&format!("SET_C{}R", group), &field_annots(annots), &[])?.into_vec();
    let mut pair_annots = vec!["%@".to_string(), "%@".to_string()];
    pair_annots.extend(var_annots(annots));
    let pair = Micheline::prim_with("PAIR", pair_annots, vec![]);
    Ok((set_cxr, pair))
}

fn expand_set_caxr(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args(&format!("SET_CA{}R", group)));
    }
    let (set_cxr, pair) = expand_set_cxr(group, annots)?;
    Ok(Expansion::Many(vec![
        dup(),
        dip_n(vec![car_propagated(), Micheline::seq(set_cxr)], 1),
        cdr_propagated(),
        swap(),
        pair,
    ]))
}

fn expand_set_cdxr(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    if !args.is_empty() {
        return Err(MacroError::no_args(&format!("SET_CD{}R", group)));
    }
    let (set_cxr, pair) = expand_set_cxr(group, annots)?;
    Ok(Expansion::Many(vec![
        dup(),
        dip_n(vec![cdr_propagated(), Micheline::seq(set_cxr)], 1),
        car_propagated(),
        pair,
    ]))
}

/// Field annotation (defaulted) and derived variable annotations for the
/// `MAP_C[AD]R` forms.
fn map_cxr_annots(annots: &[String]) -> Result<(String, Vec<String>), MacroError> {
    let fields = field_annots(annots);
    if fields.is_empty() {
        return Ok(("%".to_string(), vec![]));
    }
    if fields.len() != 1 {
        return Err(MacroError::new(
            "MAP_C[AD]R macros take at most one field annotation",
        ));
    }
    let field = fields[0].clone();
    let var = format!("@{}", &field[1..]);
    Ok((field, vec![var]))
}

fn expand_map_car(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    let (car_annot, vars) = map_cxr_annots(annots)?;
    let mut body = vec![Micheline::prim_with("CAR", vars, vec![])];
    body.extend(args.iter().cloned());
    Ok(Expansion::Many(vec![
        dup(),
        cdr_propagated(),
        dip_n(body, 1),
        swap(),
        Micheline::prim_with("PAIR", vec![car_annot, "%@".to_string()], vec![]),
    ]))
}

fn expand_map_cdr(
    _group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    let (cdr_annot, vars) = map_cxr_annots(annots)?;
    let mut expanded = vec![dup(), Micheline::prim_with("CDR", vars, vec![])];
    expanded.extend(args.iter().cloned());
    expanded.push(swap());
    expanded.push(car_propagated());
    expanded.push(Micheline::prim_with(
        "PAIR",
        vec!["%@".to_string(), cdr_annot],
        vec![],
    ));
    Ok(Expansion::Many(expanded))
}

/// Shared tail of the deep `MAP_C..R` forms.
fn expand_map_cxr(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<(Vec<Micheline>, Micheline), MacroError> {
    let map_cxr =
        expand_internal(&format!("MAP_C{}R", group), &field_annots(annots), args)?.into_vec();
    let mut pair_annots = vec!["%@".to_string(), "%@".to_string()];
    pair_annots.extend(var_annots(annots));
    let pair = Micheline::prim_with("PAIR", pair_annots, vec![]);
    Ok((map_cxr, pair))
}

fn expand_map_caxr(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    let (map_cxr, pair) = expand_map_cxr(group, annots, args)?;
    Ok(Expansion::Many(vec![
        dup(),
        dip_n(vec![car_propagated(), Micheline::seq(map_cxr)], 1),
        cdr_propagated(),
        swap(),
        pair,
    ]))
}

fn expand_map_cdxr(
    group: &str,
    annots: &[String],
    args: &[Micheline],
) -> Result<Expansion, MacroError> {
    let (map_cxr, pair) = expand_map_cxr(group, annots, args)?;
    Ok(Expansion::Many(vec![
        dup(),
        dip_n(vec![cdr_propagated(), Micheline::seq(map_cxr)], 1),
        car_propagated(),
        pair,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(prim: &str, annots: &[&str], args: Vec<Micheline>) -> Expansion {
        let annots: Vec<String> = annots.iter().map(|a| a.to_string()).collect();
        MichelsonMacros
            .expand(prim, &annots, &args)
            .expect("expansion should succeed")
    }

    #[test]
    fn test_known_primitive_passes_through_unwrapped() {
        let expansion = expand("PAIR", &["%a"], vec![]);
        assert_eq!(
            expansion,
            Expansion::One(Micheline::prim_with("PAIR", vec!["%a".to_string()], vec![]))
        );
    }

    #[test]
    fn test_cmpeq() {
        let expansion = expand("CMPEQ", &[], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![Micheline::prim("COMPARE"), Micheline::prim("EQ")])
        );
    }

    #[test]
    fn test_ifcmplt_keeps_comparison_in_a_nested_sequence() {
        let branches = vec![Micheline::seq(vec![]), Micheline::seq(vec![])];
        let expansion = expand("IFCMPLT", &[], branches.clone());
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::seq(vec![Micheline::prim("COMPARE"), Micheline::prim("LT")]),
                Micheline::prim_with("IF", vec![], branches),
            ])
        );
    }

    #[test]
    fn test_fail() {
        let expansion = expand("FAIL", &[], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![Micheline::prim("UNIT"), Micheline::prim("FAILWITH")])
        );
    }

    #[test]
    fn test_assert() {
        let expansion = expand("ASSERT", &[], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![Micheline::prim_with(
                "IF",
                vec![],
                vec![
                    Micheline::seq(vec![]),
                    Micheline::seq(vec![Micheline::seq(vec![
                        Micheline::prim("UNIT"),
                        Micheline::prim("FAILWITH"),
                    ])]),
                ],
            )])
        );
    }

    #[test]
    fn test_assert_eq() {
        let expansion = expand("ASSERT_EQ", &[], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::prim("EQ"),
                Micheline::prim_with(
                    "IF",
                    vec![],
                    vec![
                        Micheline::seq(vec![]),
                        Micheline::seq(vec![Micheline::seq(vec![
                            Micheline::prim("UNIT"),
                            Micheline::prim("FAILWITH"),
                        ])]),
                    ],
                ),
            ])
        );
    }

    #[test]
    fn test_assert_some_renames_with_annotations() {
        let expansion = expand("ASSERT_SOME", &["@x"], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![Micheline::prim_with(
                "IF_NONE",
                vec![],
                vec![
                    Micheline::seq(vec![Micheline::seq(vec![
                        Micheline::prim("UNIT"),
                        Micheline::prim("FAILWITH"),
                    ])]),
                    Micheline::seq(vec![Micheline::prim_with(
                        "RENAME",
                        vec!["@x".to_string()],
                        vec![],
                    )]),
                ],
            )])
        );
    }

    #[test]
    fn test_diip_takes_explicit_depth() {
        let body = Micheline::seq(vec![Micheline::prim("SWAP")]);
        let expansion = expand("DIIP", &[], vec![body.clone()]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![Micheline::prim_with(
                "DIP",
                vec![],
                vec![Micheline::int("2"), Micheline::seq(vec![body])],
            )])
        );
    }

    #[test]
    fn test_duup() {
        let expansion = expand("DUUP", &["@x"], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![Micheline::prim_with(
                "DUP",
                vec!["@x".to_string()],
                vec![Micheline::int("2")],
            )])
        );
    }

    #[test]
    fn test_cadr_threads_annotations_to_the_innermost_access() {
        let expansion = expand("CADR", &["@x"], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::prim("CAR"),
                Micheline::prim_with("CDR", vec!["@x".to_string()], vec![]),
            ])
        );
    }

    #[test]
    fn test_cadar() {
        let expansion = expand("CADAR", &[], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::prim("CAR"),
                Micheline::prim("CDR"),
                Micheline::prim("CAR"),
            ])
        );
    }

    #[test]
    fn test_if_some_swaps_branches_of_if_none() {
        let some_branch = Micheline::seq(vec![Micheline::prim("DROP")]);
        let none_branch = Micheline::seq(vec![Micheline::prim("UNIT")]);
        let expansion = expand("IF_SOME", &[], vec![some_branch.clone(), none_branch.clone()]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![Micheline::prim_with(
                "IF_NONE",
                vec![],
                vec![none_branch, some_branch],
            )])
        );
    }

    #[test]
    fn test_set_car() {
        let expansion = expand("SET_CAR", &["%f"], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::prim("SWAP"),
                Micheline::prim_with("UPDATE", vec!["%f".to_string()], vec![Micheline::int("1")]),
            ])
        );
    }

    #[test]
    fn test_set_cadr_rebuilds_the_pair() {
        let expansion = expand("SET_CADR", &[], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::prim("DUP"),
                Micheline::prim_with(
                    "DIP",
                    vec![],
                    vec![Micheline::seq(vec![
                        Micheline::prim_with("CAR", vec!["@%%".to_string()], vec![]),
                        Micheline::seq(vec![
                            Micheline::prim("SWAP"),
                            Micheline::prim_with("UPDATE", vec![], vec![Micheline::int("2")]),
                        ]),
                    ])],
                ),
                Micheline::prim_with("CDR", vec!["@%%".to_string()], vec![]),
                Micheline::prim("SWAP"),
                Micheline::prim_with(
                    "PAIR",
                    vec!["%@".to_string(), "%@".to_string()],
                    vec![],
                ),
            ])
        );
    }

    #[test]
    fn test_papair() {
        let expansion = expand("PAPAIR", &[], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::prim_with(
                    "DIP",
                    vec![],
                    vec![Micheline::seq(vec![Micheline::prim("PAIR")])],
                ),
                Micheline::prim("PAIR"),
            ])
        );
    }

    #[test]
    fn test_papair_with_field_annotations() {
        let expansion = expand("PAPAIR", &["%x", "%y", "%z"], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::prim_with(
                    "DIP",
                    vec![],
                    vec![Micheline::seq(vec![Micheline::prim_with(
                        "PAIR",
                        vec!["%y".to_string(), "%z".to_string()],
                        vec![],
                    )])],
                ),
                Micheline::prim_with("PAIR", vec!["%x".to_string()], vec![]),
            ])
        );
    }

    #[test]
    fn test_unpapair_reverses_the_pair_tree() {
        let expansion = expand("UNPAPAIR", &[], vec![]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::seq(vec![Micheline::prim("UNPAIR")]),
                Micheline::prim_with(
                    "DIP",
                    vec![],
                    vec![Micheline::seq(vec![Micheline::prim("UNPAIR")])],
                ),
            ])
        );
    }

    #[test]
    fn test_map_car_splices_the_body() {
        let body = Micheline::seq(vec![Micheline::prim("NOT")]);
        let expansion = expand("MAP_CAR", &["%flag"], vec![body.clone()]);
        assert_eq!(
            expansion,
            Expansion::Many(vec![
                Micheline::prim("DUP"),
                Micheline::prim_with("CDR", vec!["@%%".to_string()], vec![]),
                Micheline::prim_with(
                    "DIP",
                    vec![],
                    vec![Micheline::seq(vec![
                        Micheline::prim_with("CAR", vec!["@flag".to_string()], vec![]),
                        body,
                    ])],
                ),
                Micheline::prim("SWAP"),
                Micheline::prim_with(
                    "PAIR",
                    vec!["%flag".to_string(), "%@".to_string()],
                    vec![],
                ),
            ])
        );
    }

    #[test]
    fn test_unknown_macro_is_rejected() {
        let err = MichelsonMacros.expand("FROB", &[], &[]).unwrap_err();
        assert_eq!(err.message, "unknown primitive `FROB`");
    }

    #[test]
    fn test_shape_validation() {
        assert!(MichelsonMacros
            .expand("CMPEQ", &[], &[Micheline::int("1")])
            .is_err());
        assert!(MichelsonMacros.expand("IFEQ", &[], &[]).is_err());
        assert!(MichelsonMacros
            .expand("FAIL", &["@x".to_string()], &[])
            .is_err());
    }
}
