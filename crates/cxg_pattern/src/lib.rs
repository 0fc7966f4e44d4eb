//! Pattern lexer, parser, and compiler for cxg constructions.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of pattern strings
//! - [`Parser`] - Parsing tokens into a [`PatternAst`]
//! - [`PatternCompiler`] - Compiling an AST into a [`CompiledMatcher`]
//! - [`validate_components`] - The MWE component-list gate
//! - [`DependencyTree`] - Compiled dependency sub-patterns
//! - [`CompiledConstraint`] - Checked constraint declarations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod components;
pub mod compiler;
pub mod constraint;
pub mod dependency;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod step;
pub mod token;

pub use ast::PatternAst;
pub use components::{components_to_matcher, validate_components};
pub use compiler::{PatternCompiler, compile_pattern};
pub use constraint::{CompiledConstraint, compile_constraints};
pub use dependency::DependencyTree;
pub use lexer::Lexer;
pub use parser::{Parser, parse};
pub use span::Span;
pub use step::{CompiledMatcher, Step};
pub use token::{Token, TokenKind};
