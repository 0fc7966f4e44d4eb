//! Dependency-tree matching.
//!
//! Every token that fits the root node is tried as an anchor. Pattern edges
//! are then assigned to real head-dependent arcs with the required relation,
//! backtracking over dependents in sentence order. Optional nodes may be
//! left unbound, and their subtrees with them.

use cxg_foundation::{PatternNode, Result, Role, Sentence, Token, TokenSpan};
use cxg_pattern::DependencyTree;

use crate::budget::StepBudget;
use crate::result::Binding;

/// A raw dependency match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeCandidate {
    /// Convex hull of the bound tokens.
    pub span: TokenSpan,
    /// `Role::Node` bindings in token order.
    pub bindings: Vec<Binding>,
}

/// Matches `tree` anchored at every token, one assignment per anchor at most.
///
/// # Errors
/// Returns `MatchTimeout` if one anchor exhausts the budget.
pub fn match_tree(
    tree: &DependencyTree,
    sentence: &Sentence,
    budget: &mut StepBudget<'_>,
) -> Result<Vec<TreeCandidate>> {
    let mut candidates = Vec::new();
    let root = tree.root();

    for (anchor, token) in sentence.tokens().iter().enumerate() {
        if !node_fits(tree.node(root), token) {
            continue;
        }
        budget.reset();

        let mut assignment = vec![None; tree.len()];
        assignment[root] = Some(anchor);
        let agenda: Vec<Pending<'_>> = tree
            .children(root)
            .iter()
            .map(|(node, relation)| (*node, relation.as_str(), anchor))
            .collect();

        let mut run = Run {
            tree,
            sentence,
            budget: &mut *budget,
        };
        if run.bind(&agenda, &mut assignment)? {
            let mut bindings: Vec<Binding> = assignment
                .iter()
                .enumerate()
                .filter_map(|(node, token)| token.map(|t| Binding::new(t, Role::Node(node))))
                .collect();
            bindings.sort();
            if let Some(span) = TokenSpan::hull(bindings.iter().map(|b| b.token)) {
                candidates.push(TreeCandidate { span, bindings });
            }
        }
    }
    Ok(candidates)
}

/// `(pattern node, relation, head token)` edges still to assign.
type Pending<'t> = (usize, &'t str, usize);

struct Run<'r, 'b> {
    tree: &'r DependencyTree,
    sentence: &'r Sentence,
    budget: &'r mut StepBudget<'b>,
}

impl<'r> Run<'r, '_> {
    fn bind(&mut self, agenda: &[Pending<'r>], assignment: &mut [Option<usize>]) -> Result<bool> {
        let Some((&(node, relation, head), rest)) = agenda.split_first() else {
            return Ok(true);
        };
        self.budget.tick()?;

        let tree = self.tree;
        let sentence = self.sentence;
        for &dependent in sentence.dependents(head) {
            if assignment.contains(&Some(dependent)) {
                continue;
            }
            let Some(token) = sentence.token(dependent) else {
                continue;
            };
            if !relation_matches(relation, &token.rel) || !node_fits(tree.node(node), token) {
                continue;
            }

            assignment[node] = Some(dependent);
            let mut next = rest.to_vec();
            next.extend(
                tree.children(node)
                    .iter()
                    .map(|(child, rel)| (*child, rel.as_str(), dependent)),
            );
            if self.bind(&next, assignment)? {
                return Ok(true);
            }
            assignment[node] = None;
        }

        if tree.node(node).is_required {
            Ok(false)
        } else {
            self.bind(rest, assignment)
        }
    }
}

fn node_fits(node: &PatternNode, token: &Token) -> bool {
    node.pos.is_none_or(|pos| token.pos == pos)
        && node.lemma.as_deref().is_none_or(|lemma| token.lemma_is(lemma))
        && node.word.as_deref().is_none_or(|word| token.word_is(word))
}

/// `nmod` matches `nmod` and any subtype such as `nmod:poss`.
fn relation_matches(pattern: &str, actual: &str) -> bool {
    if pattern.eq_ignore_ascii_case(actual) {
        return true;
    }
    !pattern.contains(':')
        && actual
            .split_once(':')
            .is_some_and(|(base, _)| base.eq_ignore_ascii_case(pattern))
}
