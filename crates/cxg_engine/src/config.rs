//! Configuration for the annotation pipeline.

/// Configuration for matching and annotation.
///
/// Controls the per-attempt step budget, lookahead, and synthetic spans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Backtracking steps allowed for one match attempt before `MatchTimeout`.
    pub step_budget: usize,

    /// Global lookahead switch; when false no construction's lookahead runs.
    pub lookahead_enabled: bool,

    /// Emit a synthetic result for every `aggregate_as` label.
    pub emit_synthetic: bool,

    /// Cap on raw candidates kept per construction per sentence.
    pub max_candidates_per_construction: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_budget: Self::DEFAULT_STEP_BUDGET,
            lookahead_enabled: true,
            emit_synthetic: true,
            max_candidates_per_construction: None,
        }
    }
}

impl EngineConfig {
    /// Default step budget per match attempt.
    pub const DEFAULT_STEP_BUDGET: usize = 100_000;

    /// Creates a configuration for grammar development: a generous budget so
    /// pathological patterns show up as slow rather than as timeouts.
    #[must_use]
    pub fn development() -> Self {
        Self {
            step_budget: 1_000_000,
            ..Self::default()
        }
    }

    /// Creates a configuration for batch annotation with tight limits.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            step_budget: 10_000,
            lookahead_enabled: true,
            emit_synthetic: true,
            max_candidates_per_construction: Some(256),
        }
    }

    /// Builder method to set the step budget.
    #[must_use]
    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = budget;
        self
    }

    /// Builder method to enable/disable lookahead globally.
    #[must_use]
    pub fn with_lookahead(mut self, enabled: bool) -> Self {
        self.lookahead_enabled = enabled;
        self
    }

    /// Builder method to enable/disable synthetic aggregate spans.
    #[must_use]
    pub fn with_synthetic(mut self, emit: bool) -> Self {
        self.emit_synthetic = emit;
        self
    }

    /// Builder method to cap raw candidates per construction.
    #[must_use]
    pub fn with_max_candidates(mut self, max: Option<usize>) -> Self {
        self.max_candidates_per_construction = max;
        self
    }
}
