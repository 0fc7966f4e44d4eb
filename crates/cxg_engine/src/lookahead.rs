//! Lookahead confirmation and invalidation.
//!
//! The window is the `max_distance` tokens that follow a match. Tokens
//! before the match are never examined. An auxiliary pattern fires when it
//! matches from a start position inside the window. Confirmation wins over invalidation, and a match for which
//! neither fires is kept.

use cxg_foundation::{Construction, ErrorContext, Result, Sentence, TokenSpan, Vocabulary};
use cxg_pattern::{CompiledMatcher, compile_pattern};

use crate::budget::StepBudget;
use crate::flat::match_at;
use crate::result::CeSpans;

/// Outcome of running lookahead on one match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LookaheadVerdict {
    /// A confirmation pattern fired.
    Confirmed,
    /// An invalidation pattern fired and no confirmation did.
    Invalidated,
    /// Nothing fired.
    NotTriggered,
}

/// Compiled lookahead patterns of one construction.
///
/// Only right context is consulted: the window starts at the token after
/// the match and spans `max_distance` tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookahead {
    /// Window size in tokens.
    pub max_distance: usize,
    /// Patterns that reject the match.
    pub invalidation: Vec<CompiledMatcher>,
    /// Patterns that confirm the match.
    pub confirmation: Vec<CompiledMatcher>,
}

impl Lookahead {
    /// Compiles the lookahead patterns of `construction`, if lookahead is enabled.
    ///
    /// # Errors
    /// Returns a `PatternSyntax` error naming the failing auxiliary pattern.
    pub fn compile(construction: &Construction, vocabulary: &Vocabulary) -> Result<Option<Self>> {
        if !construction.lookahead_enabled {
            return Ok(None);
        }
        let compile_all = |patterns: &[String], kind: &str| -> Result<Vec<CompiledMatcher>> {
            patterns
                .iter()
                .enumerate()
                .map(|(i, source)| {
                    compile_pattern(source, vocabulary).map_err(|e| {
                        e.with_context(
                            ErrorContext::new()
                                .with_source(construction.name.clone())
                                .with_frame(format!("{kind} pattern {i}")),
                        )
                    })
                })
                .collect()
        };
        Ok(Some(Self {
            max_distance: construction.lookahead_max_distance,
            invalidation: compile_all(construction.invalidation_patterns.as_slice(), "invalidation")?,
            confirmation: compile_all(construction.confirmation_patterns.as_slice(), "confirmation")?,
        }))
    }

    /// Runs the patterns against the window after `span`.
    ///
    /// # Errors
    /// Returns `MatchTimeout` if an auxiliary attempt exhausts the budget.
    pub fn evaluate(
        &self,
        span: TokenSpan,
        sentence: &Sentence,
        ce: &CeSpans,
        budget: &mut StepBudget<'_>,
    ) -> Result<LookaheadVerdict> {
        if self.fires(&self.confirmation, span, sentence, ce, budget)? {
            return Ok(LookaheadVerdict::Confirmed);
        }
        if self.fires(&self.invalidation, span, sentence, ce, budget)? {
            return Ok(LookaheadVerdict::Invalidated);
        }
        Ok(LookaheadVerdict::NotTriggered)
    }

    fn fires(
        &self,
        patterns: &[CompiledMatcher],
        span: TokenSpan,
        sentence: &Sentence,
        ce: &CeSpans,
        budget: &mut StepBudget<'_>,
    ) -> Result<bool> {
        let first = span.end + 1;
        let last = (span.end + self.max_distance).min(sentence.len().saturating_sub(1));
        for pattern in patterns {
            for start in first..=last {
                budget.reset();
                if match_at(pattern, sentence, ce, start, budget)?.is_some() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
