//! Token types for the pattern language.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this token can start an atom.
    #[must_use]
    pub const fn starts_atom(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Class(_)
                | TokenKind::Word(_)
                | TokenKind::Lemma(_)
                | TokenKind::Wildcard
        )
    }
}

/// Token types for the pattern language.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    // Operators
    /// `|`
    Pipe,
    /// `*`
    Star,
    /// `+`
    Plus,

    // Atoms
    /// `{NAME}` class reference (POS tag or CE label)
    Class(String),
    /// Bare word-form literal
    Word(String),
    /// `~lemma` literal
    Lemma(String),
    /// `_`
    Wildcard,

    // Special
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Pipe => "'|'",
            Self::Star => "'*'",
            Self::Plus => "'+'",
            Self::Class(_) => "class",
            Self::Word(_) => "word",
            Self::Lemma(_) => "lemma",
            Self::Wildcard => "'_'",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
