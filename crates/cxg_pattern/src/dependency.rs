//! Dependency sub-patterns.
//!
//! A [`DependencyTree`] is built once from authored nodes and edges and
//! referenced by index afterwards. Building it checks that the edges form
//! a tree rooted at the single `is_root` node.

use std::collections::VecDeque;

use cxg_foundation::{DependencyPattern, Error, PatternNode, Result};

/// A compiled dependency sub-pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DependencyTree {
    nodes: Vec<PatternNode>,
    root: usize,
    /// `(dependent node, relation)` pairs per head node, in edge order.
    children: Vec<Vec<(usize, String)>>,
}

impl DependencyTree {
    /// Compiles and checks a dependency pattern.
    ///
    /// # Errors
    /// Returns a `PatternSyntax` error (offset 0) naming the offending node or edge.
    pub fn compile(pattern: &DependencyPattern) -> Result<Self> {
        let n = pattern.nodes.len();
        if n == 0 {
            return Err(tree_error("dependency pattern has no nodes"));
        }

        let roots: Vec<usize> = (0..n).filter(|&i| pattern.nodes[i].is_root).collect();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => return Err(tree_error("dependency pattern has no root node")),
            many => {
                return Err(tree_error(format!(
                    "dependency pattern has {} root nodes ({many:?}); exactly one is allowed",
                    many.len()
                )));
            }
        };

        let mut children = vec![Vec::new(); n];
        let mut incoming: Vec<Option<usize>> = vec![None; n];

        for (e, edge) in pattern.edges.iter().enumerate() {
            if edge.head >= n || edge.dependent >= n {
                return Err(tree_error(format!(
                    "edge {e} refers to a missing node ({} -> {})",
                    edge.head, edge.dependent
                )));
            }
            if edge.relation.trim().is_empty() {
                return Err(tree_error(format!("edge {e} has an empty relation")));
            }
            if edge.dependent == root {
                return Err(tree_error(format!("edge {e} points into the root node")));
            }
            if let Some(previous) = incoming[edge.dependent] {
                return Err(tree_error(format!(
                    "node {} has two heads (edges {previous} and {e})",
                    edge.dependent
                )));
            }
            incoming[edge.dependent] = Some(e);
            children[edge.head].push((edge.dependent, edge.relation.clone()));
        }

        let mut reached = vec![false; n];
        let mut queue = VecDeque::from([root]);
        reached[root] = true;
        while let Some(node) = queue.pop_front() {
            for &(child, _) in &children[node] {
                if !reached[child] {
                    reached[child] = true;
                    queue.push_back(child);
                }
            }
        }
        if let Some(orphan) = reached.iter().position(|r| !r) {
            return Err(tree_error(format!(
                "node {orphan} is not reachable from the root (cycle or missing edge)"
            )));
        }

        Ok(Self {
            nodes: pattern.nodes.clone(),
            root,
            children,
        })
    }

    /// Index of the root node.
    #[must_use]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Node at `index`.
    #[must_use]
    pub fn node(&self, index: usize) -> &PatternNode {
        &self.nodes[index]
    }

    /// All nodes.
    #[must_use]
    pub fn nodes(&self) -> &[PatternNode] {
        &self.nodes
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Trees always have a root node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `(dependent, relation)` pairs of a node.
    #[must_use]
    pub fn children(&self, index: usize) -> &[(usize, String)] {
        &self.children[index]
    }
}

fn tree_error(message: impl Into<String>) -> Error {
    Error::pattern_syntax(0, message)
}
