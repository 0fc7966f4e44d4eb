//! Constraint evaluation over raw matches.
//!
//! A failed constraint drops the candidate; it is never an error. Roles that
//! bound no tokens (a skipped optional step or node) satisfy every
//! constraint that mentions them.

use cxg_foundation::{Role, Sentence, Token};
use cxg_pattern::CompiledConstraint;
use tracing::trace;

use crate::result::Binding;

/// Returns true if `bindings` satisfy every constraint.
#[must_use]
pub fn satisfies_all(
    constraints: &[CompiledConstraint],
    bindings: &[Binding],
    sentence: &Sentence,
) -> bool {
    constraints.iter().all(|constraint| {
        let ok = satisfies(constraint, bindings, sentence);
        if !ok {
            trace!(?constraint, "constraint failed");
        }
        ok
    })
}

/// Checks one constraint.
#[must_use]
pub fn satisfies(constraint: &CompiledConstraint, bindings: &[Binding], sentence: &Sentence) -> bool {
    match constraint {
        CompiledConstraint::Agreement { features, targets } => {
            let tokens: Vec<&Token> = bindings
                .iter()
                .filter(|b| targets.is_empty() || targets.contains(&b.role))
                .filter_map(|b| sentence.token(b.token))
                .collect();
            features.iter().all(|feature| {
                let mut values = tokens.iter().filter_map(|t| t.feature(*feature));
                match values.next() {
                    Some(first) => values.all(|v| v == first),
                    None => true,
                }
            })
        }
        CompiledConstraint::MaxDistance { from, to, max } => {
            match (first_token(bindings, *from), first_token(bindings, *to)) {
                (Some(a), Some(b)) => a.abs_diff(b) <= *max,
                _ => true,
            }
        }
        CompiledConstraint::RequirePos { target, pos } => role_tokens(bindings, *target, sentence)
            .all(|t| t.pos == *pos),
        CompiledConstraint::RequireFeature {
            target,
            feature,
            value,
        } => role_tokens(bindings, *target, sentence)
            .all(|t| t.feature(*feature) == Some(value.as_str())),
    }
}

fn first_token(bindings: &[Binding], role: Role) -> Option<usize> {
    bindings.iter().filter(|b| b.role == role).map(|b| b.token).min()
}

fn role_tokens<'s>(
    bindings: &'s [Binding],
    role: Role,
    sentence: &'s Sentence,
) -> impl Iterator<Item = &'s Token> + 's {
    bindings
        .iter()
        .filter(move |b| b.role == role)
        .filter_map(move |b| sentence.token(b.token))
}
