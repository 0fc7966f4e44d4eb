//! Compiled match steps.
//!
//! A [`CompiledMatcher`] is an immutable, ordered list of [`Step`]s: a small
//! regular expression over tokens. Recompiling a pattern produces a new
//! matcher; matchers are never edited in place.

use std::fmt;

use cxg_foundation::PosTag;

/// One compiled match step.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Word form, stored lowercase, compared case-insensitively.
    Literal(String),
    /// Lemma, stored lowercase, compared case-insensitively.
    Lemma(String),
    /// POS class.
    Pos(PosTag),
    /// A lower-level construction-element span carrying this label.
    Ce(String),
    /// Any single token.
    Wildcard,
    /// Alternatives tried in declaration order.
    Group(Vec<Vec<Step>>),
    /// Greedy repetition of `inner` between `min` and `max` times.
    Repeat {
        /// Minimum repetitions.
        min: usize,
        /// Maximum repetitions; `None` is unbounded.
        max: Option<usize>,
        /// The repeated step.
        inner: Box<Step>,
    },
}

impl Step {
    /// Returns true if this step can match without consuming anything.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Literal(_) | Self::Lemma(_) | Self::Pos(_) | Self::Ce(_) | Self::Wildcard => {
                false
            }
            Self::Group(alternatives) => alternatives
                .iter()
                .any(|alt| alt.iter().all(Step::is_nullable)),
            Self::Repeat { min, inner, .. } => *min == 0 || inner.is_nullable(),
        }
    }

    /// Returns true if this step (or any nested step) refers to a CE label.
    #[must_use]
    pub fn uses_ce(&self) -> bool {
        match self {
            Self::Ce(_) => true,
            Self::Group(alternatives) => alternatives.iter().flatten().any(Step::uses_ce),
            Self::Repeat { inner, .. } => inner.uses_ce(),
            _ => false,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(w) => f.write_str(w),
            Self::Lemma(l) => write!(f, "~{l}"),
            Self::Pos(p) => write!(f, "{{{p}}}"),
            Self::Ce(c) => write!(f, "{{{c}}}"),
            Self::Wildcard => f.write_str("_"),
            Self::Group(alternatives) => {
                f.write_str("(")?;
                write_alternatives(f, alternatives)?;
                f.write_str(")")
            }
            Self::Repeat {
                min: 0,
                max: Some(1),
                inner,
            } => match inner.as_ref() {
                Self::Group(alternatives) => {
                    f.write_str("[")?;
                    write_alternatives(f, alternatives)?;
                    f.write_str("]")
                }
                other => write!(f, "[{other}]"),
            },
            Self::Repeat { min, inner, .. } => {
                let op = if *min == 0 { '*' } else { '+' };
                write!(f, "{inner}{op}")
            }
        }
    }
}

fn write_alternatives(f: &mut fmt::Formatter<'_>, alternatives: &[Vec<Step>]) -> fmt::Result {
    for (i, alt) in alternatives.iter().enumerate() {
        if i > 0 {
            f.write_str(" | ")?;
        }
        write_sequence(f, alt)?;
    }
    Ok(())
}

fn write_sequence(f: &mut fmt::Formatter<'_>, steps: &[Step]) -> fmt::Result {
    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{step}")?;
    }
    Ok(())
}

/// A compiled flat pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompiledMatcher {
    /// The source the matcher was compiled from.
    pub source: String,
    /// Top-level steps; constraint roles `Step(i)` index into this list.
    pub steps: Vec<Step>,
}

impl CompiledMatcher {
    /// Creates a matcher from already-compiled steps.
    #[must_use]
    pub fn new(source: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            source: source.into(),
            steps,
        }
    }

    /// Number of top-level steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if there are no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns true if any step refers to a CE label.
    #[must_use]
    pub fn uses_ce(&self) -> bool {
        self.steps.iter().any(Step::uses_ce)
    }

    /// Canonical rendering of the compiled steps.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompiledMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sequence(f, &self.steps)
    }
}
