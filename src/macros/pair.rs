//! Pair-tree macros (`PAPAIR`-style names)
//!
//! A `P[PAI]+R` macro name encodes a binary tree of `PAIR` applications:
//! `P` opens a pair node, `A` and `I` are leaves for the accessible stack
//! elements, and the trailing `R` closes the spelling. Field annotations
//! are consumed by leaves in spelling order. The same tree drives the
//! `UNP...R` inverse, with the produced instructions reversed.

use crate::ast::Micheline;
use crate::macros::{dip_n, Expansion, MacroError};

/// One node of the decoded pair tree.
pub(crate) enum Node {
    Pair(Box<PairNode>),
    Leaf,
}

pub(crate) struct PairNode {
    /// How many leaves were consumed before this node opened; becomes the
    /// DIP depth of the produced instruction.
    pub depth: usize,
    /// Annotations taken by the node's immediate leaf children, in order.
    pub annots: (Option<String>, Option<String>),
    pub left: Node,
    pub right: Node,
    pub is_root: bool,
}

struct TreeBuilder<'a> {
    letters: std::str::Chars<'a>,
    annots: std::slice::Iter<'a, String>,
    name: &'a str,
}

impl<'a> TreeBuilder<'a> {
    fn new(name: &'a str, annots: &'a [String]) -> Self {
        Self {
            letters: name.chars(),
            annots: annots.iter(),
            name,
        }
    }

    /// Returns the node, the annotation consumed by a leaf (pair nodes
    /// consume none), and the leaf count after this node.
    fn parse(
        &mut self,
        depth: usize,
        is_root: bool,
    ) -> Result<(Node, Option<String>, usize), MacroError> {
        let letter = self.letters.next().ok_or_else(|| {
            MacroError::new(format!("malformed pair macro `{}`", self.name))
        })?;

        if letter == 'P' {
            let dip_depth = depth;
            let (left, l_annot, depth) = self.parse(depth, false)?;
            let (right, r_annot, depth) = self.parse(depth, false)?;
            let node = Node::Pair(Box::new(PairNode {
                depth: dip_depth,
                annots: (l_annot, r_annot),
                left,
                right,
                is_root,
            }));
            Ok((node, None, depth))
        } else {
            let annot = self.annots.next().cloned();
            Ok((Node::Leaf, annot, depth + 1))
        }
    }
}

/// Decode a pair-macro spelling into its tree, consuming `annots` in leaf
/// order. The trailing `R` is never reached by a well-formed spelling.
pub(crate) fn build_pxr_tree(name: &str, annots: &[String]) -> Result<Node, MacroError> {
    let mut builder = TreeBuilder::new(name, annots);
    let (node, _, _) = builder.parse(0, true)?;
    Ok(node)
}

/// Walk the tree producing one instruction per pair node, parents before
/// the children that feed them, each wrapped in `DIP` to its depth.
pub(crate) fn traverse_pxr_tree<F>(
    name: &str,
    annots: &[String],
    produce: F,
) -> Result<Vec<Micheline>, MacroError>
where
    F: Fn(&PairNode) -> Expansion,
{
    fn walk<F>(node: &Node, out: &mut Vec<Micheline>, produce: &F)
    where
        F: Fn(&PairNode) -> Expansion,
    {
        if let Node::Pair(pair) = node {
            out.insert(0, wrap(produce(pair), pair.depth));
            walk(&pair.left, out, produce);
            walk(&pair.right, out, produce);
        }
    }

    fn wrap(produced: Expansion, depth: usize) -> Micheline {
        let code = match produced {
            Expansion::One(node) => {
                if depth == 0 {
                    return node;
                }
                vec![node]
            }
            Expansion::Many(nodes) => {
                if depth == 0 {
                    return Micheline::seq(nodes);
                }
                nodes
            }
        };
        dip_n(code, depth)
    }

    let tree = build_pxr_tree(name, annots)?;
    let mut out = Vec::new();
    walk(&tree, &mut out, &produce);
    Ok(out)
}
