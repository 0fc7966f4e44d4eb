//! The UD parser seam.
//!
//! The engine never parses text itself: a [`UdParser`] turns raw input
//! into dependency-parsed [`Sentence`]s. Two local parsers are provided,
//! the CoNLL-U reader in [`crate::conllu`] and [`PretaggedParser`] for the
//! compact one-line format the REPL accepts.

use cxg_foundation::{Error, ErrorKind, PosTag, Result, Sentence, Token};

/// Turns raw text into parsed sentences.
pub trait UdParser {
    /// Parses every sentence in `text`.
    ///
    /// # Errors
    /// Returns a `UdParse` error naming the offending line.
    fn parse_all(&self, text: &str) -> Result<Vec<Sentence>>;

    /// Parses `text`, which must hold exactly one sentence.
    ///
    /// # Errors
    /// Returns a `UdParse` error if the input is malformed or does not
    /// hold exactly one sentence.
    fn parse(&self, text: &str) -> Result<Sentence> {
        let mut sentences = self.parse_all(text)?;
        if sentences.len() != 1 {
            return Err(ud_error(
                1,
                format!("expected one sentence, found {}", sentences.len()),
            ));
        }
        sentences
            .pop()
            .ok_or_else(|| Error::internal("sentence list emptied during parse"))
    }
}

/// Builds a `UdParse` error.
pub(crate) fn ud_error(line: usize, message: impl Into<String>) -> Error {
    Error::new(ErrorKind::UdParse {
        line,
        message: message.into(),
    })
}

/// Parses a UPOS column.
pub(crate) fn parse_pos(line: usize, value: &str) -> Result<PosTag> {
    value
        .parse::<PosTag>()
        .map_err(|message| ud_error(line, message))
}

/// Parses a 1-based head id.
pub(crate) fn parse_head(line: usize, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| ud_error(line, format!("head must be a token id, found {value:?}")))
}

/// One sentence per line, tokens separated by whitespace.
///
/// Each token is `word/POS`, `word/POS/rel/parent`, or
/// `word/lemma/POS/rel/parent`:
///
/// ```text
/// o/DET/det/2 café/NOUN/nsubj/4 está/AUX/cop/4 quente/ADJ/root/0
/// ```
///
/// A bare `word/POS` token is attached to nothing (`root`, head 0).
#[derive(Clone, Copy, Debug, Default)]
pub struct PretaggedParser;

impl PretaggedParser {
    fn token(line: usize, id: usize, raw: &str) -> Result<Token> {
        let fields: Vec<&str> = raw.split('/').collect();
        let token = match fields.as_slice() {
            [word, pos] => Token::new(id, *word, parse_pos(line, pos)?, "root", 0),
            [word, pos, rel, parent] => {
                Token::new(id, *word, parse_pos(line, pos)?, *rel, parse_head(line, parent)?)
            }
            [word, lemma, pos, rel, parent] => {
                Token::new(id, *word, parse_pos(line, pos)?, *rel, parse_head(line, parent)?)
                    .with_lemma(*lemma)
            }
            _ => {
                return Err(ud_error(
                    line,
                    format!(
                        "token {id} ({raw:?}) must be word/POS, word/POS/rel/parent, \
                         or word/lemma/POS/rel/parent"
                    ),
                ));
            }
        };
        if token.word.is_empty() {
            return Err(ud_error(line, format!("token {id} has an empty word form")));
        }
        Ok(token)
    }
}

impl UdParser for PretaggedParser {
    fn parse_all(&self, text: &str) -> Result<Vec<Sentence>> {
        text.lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| {
                let line = i + 1;
                let tokens = l
                    .split_whitespace()
                    .enumerate()
                    .map(|(j, raw)| Self::token(line, j + 1, raw))
                    .collect::<Result<Vec<_>>>()?;
                Sentence::new(tokens).map_err(|e| match e.kind {
                    ErrorKind::UdParse { message, .. } => ud_error(line, message),
                    other => Error::new(other),
                })
            })
            .collect()
    }
}
