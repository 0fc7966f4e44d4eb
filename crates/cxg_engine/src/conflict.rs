//! Conflict resolution among candidates of one level.
//!
//! Candidates are ranked by priority (higher first), then span length
//! (longer first), then declaration order, then start offset. The resolver
//! walks that ranking and accepts every candidate that does not overlap an
//! already accepted one.

use std::cmp::Ordering;

use tracing::trace;

use crate::result::MatchResult;

/// Total order used to rank competing candidates; `Less` wins.
#[must_use]
pub fn rank(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.span.len().cmp(&a.span.len()))
        .then_with(|| a.declaration_order.cmp(&b.declaration_order))
        .then_with(|| a.span.start.cmp(&b.span.start))
}

/// Returns the maximal non-overlapping subset chosen greedily by [`rank`],
/// in sentence order.
#[must_use]
pub fn resolve(mut candidates: Vec<MatchResult>) -> Vec<MatchResult> {
    candidates.sort_by(rank);

    let mut accepted: Vec<MatchResult> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if let Some(winner) = accepted.iter().find(|a| a.span.overlaps(&candidate.span)) {
            trace!(
                dropped = %candidate.construction_name,
                span = %candidate.span,
                winner = %winner.construction_name,
                "conflict lost"
            );
            continue;
        }
        accepted.push(candidate);
    }

    accepted.sort_by_key(|r| (r.span.start, r.declaration_order));
    accepted
}
