//! Step budgets for match attempts.

use cxg_foundation::{Error, Result};

/// Counts backtracking steps for one match attempt.
#[derive(Debug)]
pub struct StepBudget<'a> {
    limit: usize,
    used: usize,
    construction: Option<&'a str>,
}

impl<'a> StepBudget<'a> {
    /// Creates a budget of `limit` steps.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: 0,
            construction: None,
        }
    }

    /// Names the construction reported in a timeout.
    #[must_use]
    pub fn for_construction(mut self, name: &'a str) -> Self {
        self.construction = Some(name);
        self
    }

    /// Starts a fresh attempt with the same limit.
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// Steps consumed so far.
    #[must_use]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Consumes one step.
    ///
    /// # Errors
    /// Returns `MatchTimeout` once the limit is exceeded.
    pub fn tick(&mut self) -> Result<()> {
        self.used += 1;
        if self.used > self.limit {
            return Err(Error::match_timeout(
                self.limit,
                self.construction.map(str::to_string),
            ));
        }
        Ok(())
    }
}
