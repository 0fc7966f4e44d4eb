//! Constraint declarations, checked at compile time.
//!
//! Declarations name features and tags as strings; compiling them resolves
//! those names against the closed UD vocabularies and checks that every
//! role refers to a step or node that actually exists.

use cxg_foundation::{ConstraintDecl, Error, Feature, PosTag, Result, Role};

/// A checked constraint ready for evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompiledConstraint {
    /// Bound tokens carrying any of `features` agree on their values.
    Agreement {
        /// Features to compare.
        features: Vec<Feature>,
        /// Roles to check; empty means every bound token.
        targets: Vec<Role>,
    },
    /// The first tokens of two roles are at most `max` apart.
    MaxDistance {
        /// First role.
        from: Role,
        /// Second role.
        to: Role,
        /// Maximum token distance.
        max: usize,
    },
    /// Tokens bound to `target` have this POS.
    RequirePos {
        /// Constrained role.
        target: Role,
        /// Required tag.
        pos: PosTag,
    },
    /// Tokens bound to `target` carry `feature=value`.
    RequireFeature {
        /// Constrained role.
        target: Role,
        /// Required feature.
        feature: Feature,
        /// Required value.
        value: String,
    },
}

/// Compiles constraint declarations against the shape of their pattern.
///
/// `steps` is the number of top-level flat steps, `nodes` the number of
/// dependency nodes; `None` means the construction has no such matcher.
///
/// # Errors
/// Returns a `ConstraintDeclaration` error for unknown features or tags and
/// for roles that do not exist.
pub fn compile_constraints(
    decls: &[ConstraintDecl],
    steps: Option<usize>,
    nodes: Option<usize>,
) -> Result<Vec<CompiledConstraint>> {
    decls
        .iter()
        .enumerate()
        .map(|(i, decl)| compile_one(i, decl, steps, nodes))
        .collect()
}

fn compile_one(
    index: usize,
    decl: &ConstraintDecl,
    steps: Option<usize>,
    nodes: Option<usize>,
) -> Result<CompiledConstraint> {
    let check_role = |role: &Role| -> Result<Role> {
        let (limit, i, what) = match *role {
            Role::Step(i) => (steps, i, "step"),
            Role::Node(i) => (nodes, i, "node"),
        };
        match limit {
            Some(limit) if i < limit => Ok(*role),
            Some(limit) => Err(Error::constraint_declaration(format!(
                "constraint {index} refers to {what} {i}, but the pattern has {limit}"
            ))),
            None => Err(Error::constraint_declaration(format!(
                "constraint {index} refers to {what} {i}, but the construction has no {what} pattern"
            ))),
        }
    };

    Ok(match decl {
        ConstraintDecl::Agreement { features, targets } => {
            if features.is_empty() {
                return Err(Error::constraint_declaration(format!(
                    "constraint {index}: agreement needs at least one feature"
                )));
            }
            CompiledConstraint::Agreement {
                features: features
                    .iter()
                    .map(|f| resolve_feature(index, f))
                    .collect::<Result<_>>()?,
                targets: targets.iter().map(check_role).collect::<Result<_>>()?,
            }
        }
        ConstraintDecl::MaxDistance { from, to, max } => CompiledConstraint::MaxDistance {
            from: check_role(from)?,
            to: check_role(to)?,
            max: *max,
        },
        ConstraintDecl::RequirePos { target, pos } => CompiledConstraint::RequirePos {
            target: check_role(target)?,
            pos: PosTag::lookup(pos).ok_or_else(|| {
                Error::constraint_declaration(format!("constraint {index}: unknown POS tag {pos:?}"))
            })?,
        },
        ConstraintDecl::RequireFeature {
            target,
            feature,
            value,
        } => CompiledConstraint::RequireFeature {
            target: check_role(target)?,
            feature: resolve_feature(index, feature)?,
            value: value.clone(),
        },
    })
}

fn resolve_feature(index: usize, name: &str) -> Result<Feature> {
    Feature::lookup(name).ok_or_else(|| {
        Error::constraint_declaration(format!("constraint {index}: unknown feature {name:?}"))
    })
}
