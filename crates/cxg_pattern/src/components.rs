//! MWE component lists.
//!
//! Component lists arrive as raw JSON in one of two formats:
//!
//! ```text
//! simple:   ["de", "acordo", "com"]
//! extended: [{"type": "L", "value": "dar"}, {"type": "*"}, {"type": "P", "value": "NOUN"}]
//! ```
//!
//! [`validate_components`] is the gate a list passes before it is stored
//! on a construction; [`components_to_matcher`] turns a validated list into
//! a flat matcher.

use cxg_foundation::{Error, MweComponent, PosTag, Result, Vocabulary};
use serde_json::Value;

use crate::step::{CompiledMatcher, Step};

/// Validates a raw component list and returns its typed form.
///
/// # Errors
/// Returns a `Validation` error naming the offending index and rule.
pub fn validate_components(raw: &Value, vocabulary: &Vocabulary) -> Result<Vec<MweComponent>> {
    let Value::Array(entries) = raw else {
        return Err(Error::validation(None, "component list must be an array"));
    };
    if entries.len() < 2 {
        return Err(Error::validation(
            None,
            format!(
                "component list must have at least 2 entries, found {}",
                entries.len()
            ),
        ));
    }

    match &entries[0] {
        Value::String(_) => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| simple_component(index, entry))
            .collect(),
        Value::Object(_) => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| extended_component(index, entry, vocabulary))
            .collect(),
        _ => Err(Error::validation(
            Some(0),
            "entry must be a string (simple format) or an object (extended format)",
        )),
    }
}

fn simple_component(index: usize, entry: &Value) -> Result<MweComponent> {
    match entry {
        Value::String(s) if !s.trim().is_empty() => Ok(MweComponent::Simple(s.clone())),
        Value::String(_) => Err(Error::validation(
            Some(index),
            "simple-format entry must be a non-empty string",
        )),
        Value::Object(_) => Err(Error::validation(
            Some(index),
            "list mixes simple and extended formats",
        )),
        _ => Err(Error::validation(
            Some(index),
            "simple-format entry must be a string",
        )),
    }
}

fn extended_component(index: usize, entry: &Value, vocabulary: &Vocabulary) -> Result<MweComponent> {
    let object = match entry {
        Value::Object(object) => object,
        Value::String(_) => {
            return Err(Error::validation(
                Some(index),
                "list mixes simple and extended formats",
            ));
        }
        _ => {
            return Err(Error::validation(
                Some(index),
                "extended-format entry must be an object",
            ));
        }
    };

    let Some(kind) = object.get("type").and_then(Value::as_str) else {
        return Err(Error::validation(
            Some(index),
            "extended-format entry must carry a string 'type'",
        ));
    };

    if kind == "*" {
        return Ok(MweComponent::Wildcard);
    }

    if !matches!(kind, "W" | "L" | "P" | "C") {
        return Err(Error::validation(
            Some(index),
            format!("unknown component type {kind:?} (expected W, L, P, C, or *)"),
        ));
    }

    let value = match object.get("value").and_then(Value::as_str) {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            return Err(Error::validation(
                Some(index),
                format!("type {kind} requires a non-empty string 'value'"),
            ));
        }
    };

    match kind {
        "W" => Ok(MweComponent::Word(value.to_string())),
        "L" => Ok(MweComponent::Lemma(value.to_string())),
        "P" => PosTag::lookup(value).map(MweComponent::Pos).ok_or_else(|| {
            Error::validation(Some(index), format!("{value:?} is not a known POS tag"))
        }),
        _ => {
            if vocabulary.is_ce_label(value) {
                Ok(MweComponent::Ce(value.to_string()))
            } else {
                Err(Error::validation(
                    Some(index),
                    format!("{value:?} is not a known CE label"),
                ))
            }
        }
    }
}

/// Builds a flat matcher with one step per component.
#[must_use]
pub fn components_to_matcher(components: &[MweComponent]) -> CompiledMatcher {
    let steps: Vec<Step> = components
        .iter()
        .map(|component| match component {
            MweComponent::Simple(w) | MweComponent::Word(w) => Step::Literal(w.to_lowercase()),
            MweComponent::Lemma(l) => Step::Lemma(l.to_lowercase()),
            MweComponent::Pos(p) => Step::Pos(*p),
            MweComponent::Ce(c) => Step::Ce(c.clone()),
            MweComponent::Wildcard => Step::Wildcard,
        })
        .collect();
    let source = CompiledMatcher::new("", steps.clone()).canonical();
    CompiledMatcher::new(source, steps)
}
