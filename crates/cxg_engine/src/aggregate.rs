//! Aggregation of accepted matches.
//!
//! Accepted results get their level's CE label and the construction's
//! semantic annotations. Each construction with `aggregate_as` also yields
//! a synthetic result over the same span. Every label a result exposes is
//! recorded in the CE layer for the levels above.

use cxg_foundation::ConstructionId;

use crate::registry::RegisteredConstruction;
use crate::result::{CeSpans, MatchResult};

/// Labels, annotates, and records accepted results of one level.
#[must_use]
pub fn aggregate(
    accepted: Vec<MatchResult>,
    level: &[RegisteredConstruction],
    emit_synthetic: bool,
    ce: &mut CeSpans,
) -> Vec<MatchResult> {
    let mut out = Vec::with_capacity(accepted.len());
    for mut result in accepted {
        let Some(entry) = find(level, result.construction_id) else {
            out.push(result);
            continue;
        };
        let construction = &entry.compiled.construction;

        result.ce_label = construction.ce_label().map(str::to_string);
        result.semantic_type.clone_from(&construction.semantic_type);
        result.semantics.clone_from(&construction.semantics);
        for label in construction.exposed_labels() {
            ce.insert(label, result.span);
        }

        let synthetic = construction
            .aggregate_as
            .as_ref()
            .filter(|_| emit_synthetic)
            .map(|label| MatchResult {
                ce_label: Some(label.clone()),
                synthetic: true,
                ..result.clone()
            });
        out.push(result);
        out.extend(synthetic);
    }
    out
}

fn find(level: &[RegisteredConstruction], id: ConstructionId) -> Option<&RegisteredConstruction> {
    level.iter().find(|entry| entry.compiled.construction.id == id)
}
