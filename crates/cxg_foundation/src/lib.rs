//! Core types, vocabularies, sentences, and errors for cxg.
//!
//! This crate provides:
//! - [`Sentence`] and [`Token`] - The UD parse the engine matches against
//! - [`PosTag`], [`Feature`], [`Vocabulary`] - Closed tag and label sets
//! - [`Construction`] and [`GrammarGraph`] - The construction data model
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod construction;
pub mod error;
pub mod sentence;
pub mod vocab;

pub use construction::{
    ConstraintDecl, Construction, ConstructionId, ConstructionType, DependencyPattern, GrammarGraph,
    GrammarId, MweComponent, PatternEdge, PatternNode, Role,
};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use sentence::{Features, Sentence, Token, TokenSpan};
pub use vocab::{Feature, PosTag, Vocabulary};
