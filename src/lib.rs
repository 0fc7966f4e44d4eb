//! cxg - Construction-grammar pattern engine
//!
//! This crate re-exports all layers of the cxg system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: cxg_runtime    - REPL, CLI, import, CoNLL-U, snapshots
//! Layer 2: cxg_engine     - Registry, matchers, lookahead, conflicts, pipeline
//! Layer 1: cxg_pattern    - Pattern lexer, parser, compiler, component lists
//! Layer 0: cxg_foundation - Core types (Sentence, Construction, Error)
//! ```

pub use cxg_engine as engine;
pub use cxg_foundation as foundation;
pub use cxg_pattern as pattern;
pub use cxg_runtime as runtime;
