//! Dependency-parsed sentences.
//!
//! A [`Sentence`] is the read-only input the engine matches against. It is
//! produced by an external UD parser; this module only checks that the
//! token ids and head references are well formed and precomputes the
//! dependent lists used by the tree matcher.

use std::fmt;

use im::OrdMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::vocab::{Feature, PosTag};

/// Morphological features (`Number=Sing|Gender=Masc`).
pub type Features = OrdMap<String, String>;

/// One UD token.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// 1-based token id.
    pub id: usize,
    /// Surface word form.
    pub word: String,
    /// Lemma, when the parser supplies one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lemma: Option<String>,
    /// Universal POS tag.
    pub pos: PosTag,
    /// Dependency relation to the head.
    pub rel: String,
    /// Head token id; 0 marks the sentence root.
    pub parent: usize,
    /// Morphological features.
    #[cfg_attr(feature = "serde", serde(default))]
    pub feats: Features,
}

impl Token {
    /// Creates a token without lemma or features.
    #[must_use]
    pub fn new(
        id: usize,
        word: impl Into<String>,
        pos: PosTag,
        rel: impl Into<String>,
        parent: usize,
    ) -> Self {
        Self {
            id,
            word: word.into(),
            lemma: None,
            pos,
            rel: rel.into(),
            parent,
            feats: Features::new(),
        }
    }

    /// Sets the lemma.
    #[must_use]
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    /// Adds a morphological feature.
    #[must_use]
    pub fn with_feat(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.feats.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a UD feature, if present.
    #[must_use]
    pub fn feature(&self, feature: Feature) -> Option<&str> {
        self.feats.get(feature.as_str()).map(String::as_str)
    }

    /// Case-insensitive word-form comparison.
    #[must_use]
    pub fn word_is(&self, word: &str) -> bool {
        self.word.to_lowercase() == word.to_lowercase()
    }

    /// Case-insensitive lemma comparison; a token without lemma never matches.
    #[must_use]
    pub fn lemma_is(&self, lemma: &str) -> bool {
        self.lemma
            .as_deref()
            .is_some_and(|l| l.to_lowercase() == lemma.to_lowercase())
    }
}

/// Inclusive token-index span `[start, end]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenSpan {
    /// First token index.
    pub start: usize,
    /// Last token index (inclusive).
    pub end: usize,
}

impl TokenSpan {
    /// Creates a span; `start` must not exceed `end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A one-token span.
    #[must_use]
    pub const fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    /// Number of tokens covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Spans always cover at least one token.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if the two spans share a token.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns true if `index` falls inside this span.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Convex hull of a set of token indices.
    pub fn hull(indices: impl IntoIterator<Item = usize>) -> Option<Self> {
        let mut iter = indices.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), i| (lo.min(i), hi.max(i)));
        Some(Self { start, end })
    }
}

impl fmt::Display for TokenSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.start, self.end)
    }
}

/// A dependency-parsed sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<Token>,
    /// Dependent token indices per token index, in sentence order.
    dependents: Vec<Vec<usize>>,
}

impl Sentence {
    /// Builds a sentence, checking that ids run `1..=n` and every head exists.
    ///
    /// # Errors
    /// Returns a `UdParse` error naming the first malformed token.
    pub fn new(tokens: Vec<Token>) -> Result<Self> {
        let n = tokens.len();
        let mut dependents = vec![Vec::new(); n];

        for (index, token) in tokens.iter().enumerate() {
            if token.id != index + 1 {
                return Err(Error::new(ErrorKind::UdParse {
                    line: index + 1,
                    message: format!("expected token id {}, found {}", index + 1, token.id),
                }));
            }
            if token.parent > n {
                return Err(Error::new(ErrorKind::UdParse {
                    line: index + 1,
                    message: format!("head {} out of range (sentence has {n} tokens)", token.parent),
                }));
            }
            if token.parent == token.id {
                return Err(Error::new(ErrorKind::UdParse {
                    line: index + 1,
                    message: format!("token {} is its own head", token.id),
                }));
            }
            if token.parent > 0 {
                dependents[token.parent - 1].push(index);
            }
        }

        Ok(Self { tokens, dependents })
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the sentence has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at a 0-based index.
    #[must_use]
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// All tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Indices of the tokens whose head is the token at `index`.
    #[must_use]
    pub fn dependents(&self, index: usize) -> &[usize] {
        self.dependents.get(index).map_or(&[], Vec::as_slice)
    }

    /// Index of the head of the token at `index`, or `None` for the root.
    #[must_use]
    pub fn head(&self, index: usize) -> Option<usize> {
        match self.tokens.get(index)?.parent {
            0 => None,
            parent => Some(parent - 1),
        }
    }

    /// Surface text of a span, words joined by spaces.
    #[must_use]
    pub fn text(&self, span: TokenSpan) -> String {
        self.tokens[span.start..=span.end.min(self.len().saturating_sub(1))]
            .iter()
            .map(|t| t.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
