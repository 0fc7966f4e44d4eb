//! Construction registry, matchers, and annotation pipeline for cxg.
//!
//! This crate provides:
//! - [`ConstructionRegistry`] - Enabled constructions, compiled and grouped by level
//! - [`Engine`] - Level-by-level annotation of sentences
//! - [`match_all`] and [`match_tree`] - Flat and dependency matchers
//! - [`resolve`] - Conflict resolution by priority, length, and declaration order
//! - [`EngineConfig`] - Step budget, lookahead, and synthetic-span settings

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aggregate;
pub mod budget;
pub mod config;
pub mod conflict;
pub mod constraint;
pub mod flat;
pub mod lookahead;
pub mod pipeline;
pub mod registry;
pub mod result;
pub mod tree;

#[cfg(test)]
mod test_util;

pub use aggregate::aggregate;
pub use budget::StepBudget;
pub use config::EngineConfig;
pub use conflict::{rank, resolve};
pub use constraint::satisfies_all;
pub use flat::{FlatCandidate, match_all, match_at};
pub use lookahead::{Lookahead, LookaheadVerdict};
pub use pipeline::{Annotation, Engine, TEST_PATTERN_NAME, annotate_with, match_construction, test_pattern};
pub use registry::{
    CompileCache, CompiledConstruction, ConstructionRegistry, RegisteredConstruction,
    RegistryHandle, compile,
};
pub use result::{Binding, CeSpans, LookaheadOutcome, MatchResult};
pub use tree::{TreeCandidate, match_tree};
