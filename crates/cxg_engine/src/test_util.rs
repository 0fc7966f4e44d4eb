//! Sentence builders shared by unit tests.

use cxg_foundation::{PosTag, Sentence, Token};

/// Builds a sentence from `(word, pos, rel, parent)` rows; ids are assigned in order.
pub fn parsed(rows: &[(&str, PosTag, &str, usize)]) -> Sentence {
    let tokens = rows
        .iter()
        .enumerate()
        .map(|(i, (word, pos, rel, parent))| {
            Token::new(i + 1, *word, *pos, *rel, *parent).with_lemma(word.to_lowercase())
        })
        .collect();
    Sentence::new(tokens).expect("test sentence is well formed")
}

/// Builds a sentence whose tokens all hang off the root.
pub fn tagged(rows: &[(&str, PosTag)]) -> Sentence {
    let rows: Vec<_> = rows.iter().map(|(w, p)| (*w, *p, "dep", 0)).collect();
    parsed(&rows)
}

/// "o café está quente" with a real dependency parse.
pub fn cafe() -> Sentence {
    parsed(&[
        ("o", PosTag::Det, "det", 2),
        ("café", PosTag::Noun, "nsubj", 4),
        ("está", PosTag::Aux, "cop", 4),
        ("quente", PosTag::Adj, "root", 0),
    ])
}
