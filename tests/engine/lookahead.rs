//! Lookahead confirmation and invalidation through the pipeline

use cxg_engine::{Engine, EngineConfig, LookaheadOutcome};
use cxg_foundation::{ConstraintDecl, Construction, ConstructionType, PosTag, Role, TokenSpan};

use crate::{cafe, engine, graph, tagged};

fn sn(distance: usize) -> Construction {
    Construction::new("sn-det", ConstructionType::Phrasal, "{DET} {NOUN}").with_lookahead(distance)
}

#[test]
fn invalidation_two_tokens_after_the_match_drops_it() {
    // "quente" sits two positions after the end of [0,1].
    let e = engine(vec![sn(2).with_invalidation("{ADJ}")]);
    assert!(e.annotate(&cafe()).unwrap().is_empty());
}

#[test]
fn invalidation_outside_the_window_is_ignored() {
    let e = engine(vec![sn(1).with_invalidation("{ADJ}")]);
    let results = e.annotate(&cafe()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].lookahead, LookaheadOutcome::NotTriggered);
}

#[test]
fn invalidation_right_after_the_match() {
    let e = engine(vec![sn(1).with_invalidation("{AUX}")]);
    assert!(e.annotate(&cafe()).unwrap().is_empty());
}

#[test]
fn confirmation_within_the_window_is_accepted() {
    let e = engine(vec![sn(2).with_confirmation("{ADJ}")]);
    let results = e.annotate(&cafe()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].span, TokenSpan::new(0, 1));
    assert_eq!(results[0].lookahead, LookaheadOutcome::Confirmed);
}

#[test]
fn confirmation_overrides_invalidation() {
    let e = engine(vec![sn(2).with_invalidation("{AUX}").with_confirmation("{ADJ}")]);
    let results = e.annotate(&cafe()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].lookahead, LookaheadOutcome::Confirmed);
}

#[test]
fn confirmed_match_still_obeys_constraints() {
    let e = engine(vec![sn(2).with_confirmation("{ADJ}").with_constraint(
        ConstraintDecl::RequirePos {
            target: Role::Step(0),
            pos: "PRON".to_string(),
        },
    )]);
    assert!(e.annotate(&cafe()).unwrap().is_empty());
}

#[test]
fn multi_token_auxiliary_patterns() {
    let s = tagged(&[
        ("banco", PosTag::Noun),
        ("de", PosTag::Adp),
        ("dados", PosTag::Noun),
        ("relacional", PosTag::Adj),
    ]);
    let e = engine(vec![
        Construction::new("banco", ConstructionType::Mwe, "banco")
            .with_lookahead(3)
            .with_invalidation("de dados"),
    ]);
    assert!(e.annotate(&s).unwrap().is_empty());
}

#[test]
fn global_switch_disables_every_lookahead() {
    let g = graph(vec![sn(2).with_invalidation("{ADJ}")]);
    let e = Engine::with_graph(&g, EngineConfig::default().with_lookahead(false)).unwrap();
    let results = e.annotate(&cafe()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].lookahead, LookaheadOutcome::Disabled);
}

#[test]
fn broken_auxiliary_pattern_fails_compilation() {
    let g = graph(vec![sn(2).with_invalidation("({ADJ}")]);
    let err = Engine::with_graph(&g, EngineConfig::default()).unwrap_err();
    assert_eq!(err.kind_name(), "PatternSyntaxError");
    let context = err.context.as_ref().unwrap().to_string();
    assert!(context.contains("sn-det"), "{context}");
    assert!(context.contains("invalidation pattern 0"), "{context}");
}
