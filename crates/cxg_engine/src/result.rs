//! Match results and the construction-element layer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use cxg_foundation::{ConstructionId, ConstructionType, Role, TokenSpan};

/// Which lookahead outcome applied to a result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum LookaheadOutcome {
    /// A confirmation pattern fired inside the window.
    Confirmed,
    /// Lookahead ran and neither kind of pattern fired.
    NotTriggered,
    /// Lookahead was off for this construction or globally.
    #[default]
    Disabled,
}

impl fmt::Display for LookaheadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Confirmed => "confirmed",
            Self::NotTriggered => "not-triggered",
            Self::Disabled => "disabled",
        })
    }
}

/// A token bound to a pattern role.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Binding {
    /// Token index.
    pub token: usize,
    /// The step or node it was bound by.
    pub role: Role,
}

impl Binding {
    /// Creates a binding.
    #[must_use]
    pub const fn new(token: usize, role: Role) -> Self {
        Self { token, role }
    }
}

/// An accepted (or, in pattern tests, raw) construction match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    /// Matched construction.
    pub construction_id: ConstructionId,
    /// Its name.
    pub construction_name: Arc<str>,
    /// Its level.
    pub construction_type: ConstructionType,
    /// Inclusive token span.
    pub span: TokenSpan,
    /// Role bindings in token order.
    pub bindings: Vec<Binding>,
    /// CE label for this level, or the aggregate label on synthetic results.
    pub ce_label: Option<String>,
    /// True for `aggregate_as` spans.
    pub synthetic: bool,
    /// Copied from the construction.
    pub semantic_type: Option<String>,
    /// Copied from the construction.
    pub semantics: Option<String>,
    /// Lookahead outcome.
    pub lookahead: LookaheadOutcome,
    /// Construction priority at match time.
    pub priority: i32,
    /// Declaration order of the construction in its graph.
    pub declaration_order: usize,
}

impl MatchResult {
    /// Tokens bound to `role`, in order.
    pub fn tokens_for(&self, role: Role) -> impl Iterator<Item = usize> + '_ {
        self.bindings
            .iter()
            .filter(move |b| b.role == role)
            .map(|b| b.token)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.span, self.construction_type.as_str(), self.construction_name, self.construction_id
        )?;
        if let Some(label) = &self.ce_label {
            write!(f, " ce={label}")?;
        }
        if self.synthetic {
            f.write_str(" synthetic")?;
        }
        if self.lookahead != LookaheadOutcome::Disabled {
            write!(f, " lookahead={}", self.lookahead)?;
        }
        if let Some(semantic_type) = &self.semantic_type {
            write!(f, " sem={semantic_type}")?;
        }
        Ok(())
    }
}

/// Labelled spans accepted at lower levels, indexed by start token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CeSpans {
    by_start: BTreeMap<usize, Vec<(String, usize)>>,
}

impl CeSpans {
    /// Creates an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `span` under `label`.
    pub fn insert(&mut self, label: impl Into<String>, span: TokenSpan) {
        let label = label.into();
        let entries = self.by_start.entry(span.start).or_default();
        if !entries.iter().any(|(l, end)| *l == label && *end == span.end) {
            entries.push((label, span.end));
        }
    }

    /// End tokens of the `label` spans that start at `start`, longest first.
    #[must_use]
    pub fn ends(&self, start: usize, label: &str) -> Vec<usize> {
        let mut ends: Vec<usize> = self
            .by_start
            .get(&start)
            .into_iter()
            .flatten()
            .filter(|(l, _)| l == label)
            .map(|(_, end)| *end)
            .collect();
        ends.sort_unstable_by(|a, b| b.cmp(a));
        ends
    }

    /// Number of recorded spans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_start.values().map(Vec::len).sum()
    }

    /// Returns true if no span has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }
}
