//! CoNLL-U reader.
//!
//! Reads the ID, FORM, LEMMA, UPOS, FEATS, HEAD, and DEPREL columns.
//! Comment lines are ignored, sentences are separated by blank lines, and
//! multi-word token ranges (`1-2`) and empty nodes (`3.1`) are skipped.

use cxg_foundation::{Error, ErrorContext, ErrorKind, Features, Result, Sentence, Token};
use tracing::debug;

use crate::ud::{UdParser, parse_head, parse_pos, ud_error};

/// Minimum number of columns a token line must carry (through DEPREL).
const MIN_COLUMNS: usize = 8;

/// Reads CoNLL-U text.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConlluParser;

impl UdParser for ConlluParser {
    fn parse_all(&self, text: &str) -> Result<Vec<Sentence>> {
        let mut sentences = Vec::new();
        let mut tokens = Vec::new();
        let mut lines = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let trimmed = raw.trim_end();
            if trimmed.is_empty() {
                flush(&mut tokens, &mut lines, &mut sentences)?;
                continue;
            }
            if trimmed.starts_with('#') {
                continue;
            }
            if let Some(token) = token_line(line, trimmed)? {
                tokens.push(token);
                lines.push(line);
            }
        }
        flush(&mut tokens, &mut lines, &mut sentences)?;

        debug!(sentences = sentences.len(), "read CoNLL-U");
        Ok(sentences)
    }
}

fn flush(
    tokens: &mut Vec<Token>,
    lines: &mut Vec<usize>,
    sentences: &mut Vec<Sentence>,
) -> Result<()> {
    if tokens.is_empty() {
        return Ok(());
    }
    let lines = std::mem::take(lines);
    let sentence = Sentence::new(std::mem::take(tokens)).map_err(|e| match e.kind {
        // Sentence::new numbers tokens from 1; report the file line instead.
        ErrorKind::UdParse { line, message } => {
            ud_error(lines.get(line - 1).copied().unwrap_or(line), message)
        }
        other => Error::new(other),
    })?;
    sentences.push(sentence);
    Ok(())
}

fn token_line(line: usize, raw: &str) -> Result<Option<Token>> {
    let columns: Vec<&str> = if raw.contains('\t') {
        raw.split('\t').collect()
    } else {
        raw.split_whitespace().collect()
    };
    if columns.len() < MIN_COLUMNS {
        return Err(ud_error(
            line,
            format!(
                "expected at least {MIN_COLUMNS} columns, found {}",
                columns.len()
            ),
        ));
    }

    let id_column = columns[0];
    if id_column.contains('-') || id_column.contains('.') {
        return Ok(None);
    }
    let id: usize = id_column
        .parse()
        .map_err(|_| ud_error(line, format!("token id must be an integer, found {id_column:?}")))?;

    let mut token = Token::new(
        id,
        columns[1],
        parse_pos(line, columns[3])?,
        columns[7],
        parse_head(line, columns[6])?,
    );
    if columns[2] != "_" {
        token = token.with_lemma(columns[2]);
    }
    token.feats = features(line, columns[5])?;
    Ok(Some(token))
}

fn features(line: usize, column: &str) -> Result<Features> {
    if column == "_" {
        return Ok(Features::new());
    }
    column
        .split('|')
        .map(|pair| {
            pair.split_once('=')
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| ud_error(line, format!("malformed feature {pair:?}")))
        })
        .collect()
}

/// Reads a CoNLL-U file.
///
/// # Errors
/// Returns an `IoError` if the file cannot be read, or a `UdParse` error
/// carrying the file name as context.
pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<Vec<Sentence>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;
    ConlluParser
        .parse_all(&text)
        .map_err(|e| e.with_context(ErrorContext::new().with_source(path.display().to_string())))
}
