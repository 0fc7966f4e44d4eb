//! Integration tests for the pattern compiler

use cxg_foundation::{ErrorKind, PosTag, Vocabulary};
use cxg_pattern::{Step, compile_pattern};

fn steps(source: &str) -> Vec<Step> {
    compile_pattern(source, &Vocabulary::new()).unwrap().steps
}

fn syntax_error(source: &str) -> (usize, String) {
    match compile_pattern(source, &Vocabulary::new()).unwrap_err().kind {
        ErrorKind::PatternSyntax { offset, message } => (offset, message),
        other => panic!("expected a syntax error for {source:?}, got {other:?}"),
    }
}

fn optional(inner: Vec<Step>) -> Step {
    Step::Repeat {
        min: 0,
        max: Some(1),
        inner: Box::new(Step::Group(vec![inner])),
    }
}

// =============================================================================
// Steps
// =============================================================================

#[test]
fn noun_phrase_with_optional_adjective() {
    assert_eq!(
        steps("{DET} [{ADJ}] {NOUN}"),
        vec![
            Step::Pos(PosTag::Det),
            optional(vec![Step::Pos(PosTag::Adj)]),
            Step::Pos(PosTag::Noun),
        ]
    );
}

#[test]
fn literals_and_lemmas_are_lowercased() {
    assert_eq!(
        steps("De ~DAR _"),
        vec![
            Step::Literal("de".to_string()),
            Step::Lemma("dar".to_string()),
            Step::Wildcard,
        ]
    );
}

#[test]
fn star_and_plus_are_unbounded() {
    assert_eq!(
        steps("{ADJ}* {NOUN}+"),
        vec![
            Step::Repeat {
                min: 0,
                max: None,
                inner: Box::new(Step::Pos(PosTag::Adj)),
            },
            Step::Repeat {
                min: 1,
                max: None,
                inner: Box::new(Step::Pos(PosTag::Noun)),
            },
        ]
    );
}

#[test]
fn group_repetition_wraps_the_group() {
    assert_eq!(
        steps("({ADP} {NOUN})*"),
        vec![Step::Repeat {
            min: 0,
            max: None,
            inner: Box::new(Step::Group(vec![vec![
                Step::Pos(PosTag::Adp),
                Step::Pos(PosTag::Noun),
            ]])),
        }]
    );
}

#[test]
fn top_level_alternation_becomes_one_group() {
    assert_eq!(
        steps("de | em {DET}"),
        vec![Step::Group(vec![
            vec![Step::Literal("de".to_string())],
            vec![Step::Literal("em".to_string()), Step::Pos(PosTag::Det)],
        ])]
    );
}

#[test]
fn ce_labels_resolve_against_the_vocabulary() {
    let vocab = Vocabulary::new().with_ce_label("Nominal");
    let matcher = compile_pattern("{Nominal} {VERB} {Head}", &vocab).unwrap();
    assert_eq!(
        matcher.steps,
        vec![
            Step::Ce("Nominal".to_string()),
            Step::Pos(PosTag::Verb),
            Step::Ce("Head".to_string()),
        ]
    );
    assert!(matcher.uses_ce());
    assert!(!compile_pattern("{DET} {NOUN}", &vocab).unwrap().uses_ce());
}

#[test]
fn pos_classes_are_case_sensitive() {
    let (offset, message) = syntax_error("{DET} {noun}");
    assert_eq!(offset, 6);
    assert!(message.contains("noun"), "{message}");
}

#[test]
fn matcher_keeps_its_source() {
    let matcher = compile_pattern("{DET}  {NOUN}", &Vocabulary::new()).unwrap();
    assert_eq!(matcher.source, "{DET}  {NOUN}");
    assert_eq!(matcher.canonical(), "{DET} {NOUN}");
    assert_eq!(matcher.len(), 2);
}

#[test]
fn compilation_is_deterministic() {
    let vocab = Vocabulary::new();
    let source = "{DET} [{ADJ} | {NUM}] ({ADP} ~o)* {NOUN}+";
    assert_eq!(
        compile_pattern(source, &vocab).unwrap(),
        compile_pattern(source, &vocab).unwrap()
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unbalanced_paren_points_at_the_opener() {
    assert_eq!(syntax_error("{DET} ({NOUN}").0, 6);
    assert_eq!(syntax_error("[{ADJ} {NOUN}").0, 0);
}

#[test]
fn unmatched_closers_point_at_themselves() {
    assert_eq!(syntax_error("{DET})").0, 5);
    assert_eq!(syntax_error("{DET} ]").0, 6);
    assert_eq!(syntax_error("{DET} }").0, 6);
}

#[test]
fn mismatched_closer_is_reported() {
    let (offset, message) = syntax_error("({DET}]");
    assert_eq!(offset, 6);
    assert!(message.contains("offset 0"), "{message}");
}

#[test]
fn empty_alternatives_are_rejected() {
    assert_eq!(syntax_error("| {NOUN}").0, 0);
    assert_eq!(syntax_error("{DET} ( | {NOUN})").0, 8);
    assert_eq!(syntax_error("{DET} |").0, 7);
    assert_eq!(syntax_error("()").0, 1);
}

#[test]
fn repetition_needs_an_atom() {
    let (offset, message) = syntax_error("+ {NOUN}");
    assert_eq!(offset, 0);
    assert!(message.contains("repetition"), "{message}");
    assert_eq!(syntax_error("{DET} (* {NOUN})").0, 7);
}

#[test]
fn unknown_class_reports_its_offset() {
    let (offset, message) = syntax_error("{DET} [{ADJ}] {NOMINAL}");
    assert_eq!(offset, 14);
    assert!(message.contains("NOMINAL"), "{message}");
}

#[test]
fn malformed_class_names() {
    assert_eq!(syntax_error("{}").0, 0);
    assert_eq!(syntax_error("a {DET").0, 2);
    assert_eq!(syntax_error("{DE T}").0, 0);
}

#[test]
fn empty_patterns_are_rejected() {
    assert_eq!(syntax_error("").0, 0);
    assert_eq!(syntax_error(" \t ").0, 0);
}

#[test]
fn dangling_tilde_is_rejected() {
    assert_eq!(syntax_error("{DET} ~").0, 6);
}
