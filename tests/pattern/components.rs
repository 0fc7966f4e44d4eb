//! Integration tests for MWE component lists

use cxg_foundation::{ErrorKind, MweComponent, PosTag, Vocabulary};
use cxg_pattern::{Step, components_to_matcher, validate_components};
use serde_json::{Value, json};

fn rule_broken(raw: &Value, vocab: &Vocabulary) -> (Option<usize>, String) {
    match validate_components(raw, vocab).unwrap_err().kind {
        ErrorKind::Validation { index, message } => (index, message),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn simple_list_becomes_literal_steps() {
    let components = validate_components(&json!(["Por", "causa", "de"]), &Vocabulary::new()).unwrap();
    let matcher = components_to_matcher(&components);
    assert_eq!(
        matcher.steps,
        vec![
            Step::Literal("por".to_string()),
            Step::Literal("causa".to_string()),
            Step::Literal("de".to_string()),
        ]
    );
    assert_eq!(matcher.canonical(), "por causa de");
}

#[test]
fn extended_list_covers_every_type() {
    let components = validate_components(
        &json!([
            {"type": "W", "value": "tomar"},
            {"type": "L", "value": "conta"},
            {"type": "*"},
            {"type": "P", "value": "ADP"},
            {"type": "C", "value": "Object"}
        ]),
        &Vocabulary::new(),
    )
    .unwrap();
    assert_eq!(components[0], MweComponent::Word("tomar".to_string()));
    assert_eq!(components[3], MweComponent::Pos(PosTag::Adp));

    let matcher = components_to_matcher(&components);
    assert_eq!(matcher.canonical(), "tomar ~conta _ {ADP} {Object}");
    assert!(matcher.uses_ce());
}

#[test]
fn single_entry_is_too_short() {
    let (index, message) = rule_broken(&json!(["sozinho"]), &Vocabulary::new());
    assert_eq!(index, None);
    assert!(message.contains("at least 2"), "{message}");
}

#[test]
fn format_is_decided_by_the_first_entry() {
    let vocab = Vocabulary::new();
    let (index, message) = rule_broken(&json!(["de", "acordo", {"type": "*"}]), &vocab);
    assert_eq!(index, Some(2));
    assert!(message.contains("mixes"), "{message}");

    let (index, _) = rule_broken(&json!([{"type": "*"}, {"type": "*"}, "com"]), &vocab);
    assert_eq!(index, Some(2));
}

#[test]
fn pos_values_must_be_ud_tags() {
    let (index, message) = rule_broken(
        &json!([{"type": "W", "value": "de"}, {"type": "P", "value": "noun"}]),
        &Vocabulary::new(),
    );
    assert_eq!(index, Some(1));
    assert!(message.contains("POS"), "{message}");
}

#[test]
fn ce_values_depend_on_the_vocabulary() {
    let raw = json!([{"type": "C", "value": "Nominal"}, {"type": "P", "value": "VERB"}]);
    let (index, _) = rule_broken(&raw, &Vocabulary::new());
    assert_eq!(index, Some(0));

    let vocab = Vocabulary::new().with_ce_label("Nominal");
    assert!(validate_components(&raw, &vocab).is_ok());
}

#[test]
fn blank_values_are_rejected() {
    let (index, _) = rule_broken(&json!(["de", "  "]), &Vocabulary::new());
    assert_eq!(index, Some(1));

    let (index, message) = rule_broken(
        &json!([{"type": "L", "value": ""}, {"type": "*"}]),
        &Vocabulary::new(),
    );
    assert_eq!(index, Some(0));
    assert!(message.contains("value"), "{message}");
}

#[test]
fn validation_errors_have_their_kind_name() {
    let err = validate_components(&json!({"type": "W"}), &Vocabulary::new()).unwrap_err();
    assert_eq!(err.kind_name(), "ValidationError");
}
