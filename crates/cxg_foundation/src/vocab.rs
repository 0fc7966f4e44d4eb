//! Closed vocabularies: POS tags, morphological features, and CE labels.
//!
//! POS tags and feature names are fixed by Universal Dependencies. The
//! construction-element label inventory is closed per grammar: a default
//! set plus whatever labels the grammar's constructions declare.

use std::fmt;
use std::str::FromStr;

use im::OrdSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Universal part-of-speech tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[allow(missing_docs)]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl PosTag {
    /// All tags in canonical order.
    pub const ALL: [PosTag; 17] = [
        PosTag::Adj,
        PosTag::Adp,
        PosTag::Adv,
        PosTag::Aux,
        PosTag::Cconj,
        PosTag::Det,
        PosTag::Intj,
        PosTag::Noun,
        PosTag::Num,
        PosTag::Part,
        PosTag::Pron,
        PosTag::Propn,
        PosTag::Punct,
        PosTag::Sconj,
        PosTag::Sym,
        PosTag::Verb,
        PosTag::X,
    ];

    /// Returns the UD spelling of this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adj => "ADJ",
            Self::Adp => "ADP",
            Self::Adv => "ADV",
            Self::Aux => "AUX",
            Self::Cconj => "CCONJ",
            Self::Det => "DET",
            Self::Intj => "INTJ",
            Self::Noun => "NOUN",
            Self::Num => "NUM",
            Self::Part => "PART",
            Self::Pron => "PRON",
            Self::Propn => "PROPN",
            Self::Punct => "PUNCT",
            Self::Sconj => "SCONJ",
            Self::Sym => "SYM",
            Self::Verb => "VERB",
            Self::X => "X",
        }
    }

    /// Looks up a tag by its UD spelling (exact, upper-case).
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| format!("unknown POS tag: {s}"))
    }
}

/// Universal morphological feature name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum Feature {
    Number,
    Gender,
    Person,
    Case,
    Tense,
    Mood,
    VerbForm,
    Definite,
    PronType,
    Degree,
    Aspect,
    Voice,
    Polarity,
    NumType,
    Poss,
    Reflex,
}

impl Feature {
    /// All features in canonical order.
    pub const ALL: [Feature; 16] = [
        Feature::Number,
        Feature::Gender,
        Feature::Person,
        Feature::Case,
        Feature::Tense,
        Feature::Mood,
        Feature::VerbForm,
        Feature::Definite,
        Feature::PronType,
        Feature::Degree,
        Feature::Aspect,
        Feature::Voice,
        Feature::Polarity,
        Feature::NumType,
        Feature::Poss,
        Feature::Reflex,
    ];

    /// Returns the UD spelling of this feature.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Gender => "Gender",
            Self::Person => "Person",
            Self::Case => "Case",
            Self::Tense => "Tense",
            Self::Mood => "Mood",
            Self::VerbForm => "VerbForm",
            Self::Definite => "Definite",
            Self::PronType => "PronType",
            Self::Degree => "Degree",
            Self::Aspect => "Aspect",
            Self::Voice => "Voice",
            Self::Polarity => "Polarity",
            Self::NumType => "NumType",
            Self::Poss => "Poss",
            Self::Reflex => "Reflex",
        }
    }

    /// Looks up a feature by its UD spelling.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed vocabulary a grammar is compiled against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    ce_labels: OrdSet<String>,
}

impl Vocabulary {
    /// Construction-element labels known to every grammar.
    const DEFAULT_CE_LABELS: &'static [&'static str] = &[
        "Head",
        "Modifier",
        "Determiner",
        "Complement",
        "Specifier",
        "Subject",
        "Predicate",
        "Object",
        "Adjunct",
        "Marker",
        "Conjunct",
    ];

    /// Creates a vocabulary with the default CE inventory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ce_labels: Self::DEFAULT_CE_LABELS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Creates a vocabulary with no CE labels at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ce_labels: OrdSet::new(),
        }
    }

    /// Returns a vocabulary that additionally knows `label`.
    #[must_use]
    pub fn with_ce_label(&self, label: impl Into<String>) -> Self {
        Self {
            ce_labels: self.ce_labels.update(label.into()),
        }
    }

    /// Returns true if `name` is a UD POS tag.
    #[must_use]
    pub fn is_pos(&self, name: &str) -> bool {
        PosTag::lookup(name).is_some()
    }

    /// Returns true if `label` is a known CE label.
    #[must_use]
    pub fn is_ce_label(&self, label: &str) -> bool {
        self.ce_labels.contains(label)
    }

    /// Iterates the CE labels in sorted order.
    pub fn ce_labels(&self) -> impl Iterator<Item = &str> {
        self.ce_labels.iter().map(String::as_str)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
