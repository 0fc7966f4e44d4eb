//! Abstract syntax tree for patterns.
//!
//! The AST mirrors the surface grammar; POS/CE resolution happens in the
//! compiler, so a pattern parses without a vocabulary.

use crate::span::Span;

/// A pattern AST node.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternAst {
    /// Word-form literal: `café`
    Word(String, Span),
    /// Lemma literal: `~ser`
    Lemma(String, Span),
    /// Class reference: `{NOUN}`, `{Head}`
    Class(String, Span),
    /// Single-token wildcard: `_`
    Wildcard(Span),
    /// `( a | b c )` or, when `optional`, `[ a | b c ]`
    Group {
        /// Alternatives in declaration order, each a sequence.
        alternatives: Vec<Vec<PatternAst>>,
        /// True for square brackets.
        optional: bool,
        /// Source span including the brackets.
        span: Span,
    },
    /// `x*` (`min = 0`) or `x+` (`min = 1`)
    Repeat {
        /// The repeated atom.
        inner: Box<PatternAst>,
        /// Minimum repetitions.
        min: usize,
        /// Source span including the operator.
        span: Span,
    },
}

impl PatternAst {
    /// Returns the source span of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Word(_, span) | Self::Lemma(_, span) | Self::Class(_, span) => *span,
            Self::Wildcard(span) => *span,
            Self::Group { span, .. } | Self::Repeat { span, .. } => *span,
        }
    }
}
