//! Property tests for the annotation pipeline

use cxg_engine::{Engine, EngineConfig, MatchResult};
use cxg_foundation::{Construction, ConstructionType, PosTag, Sentence};
use proptest::prelude::*;

use crate::{graph, tagged};

fn grammar() -> Engine {
    let g = graph(vec![
        Construction::new("sintagma", ConstructionType::Phrasal, "{DET} [{ADJ}] {NOUN}")
            .with_phrasal_ce("Subject")
            .with_aggregate_as("Nominal"),
        Construction::new("adjetivos", ConstructionType::Phrasal, "{ADJ}+ {NOUN}").with_priority(60),
        Construction::new("preposicional", ConstructionType::Phrasal, "{ADP} {DET}* {NOUN}"),
        Construction::new("qualquer-par", ConstructionType::Mwe, "_ _").with_priority(1),
        Construction::new("oracao", ConstructionType::Clausal, "{Subject} {VERB} _*"),
        Construction::new("nominal", ConstructionType::Clausal, "{Nominal} {ADP}"),
    ]);
    Engine::with_graph(&g, EngineConfig::default()).unwrap()
}

fn sentence() -> impl Strategy<Value = Sentence> {
    let tag = prop::sample::select(vec![
        PosTag::Det,
        PosTag::Adj,
        PosTag::Noun,
        PosTag::Adp,
        PosTag::Verb,
    ]);
    prop::collection::vec(tag, 1..10).prop_map(|tags| {
        let rows: Vec<(&str, PosTag)> = tags.into_iter().map(|t| ("x", t)).collect();
        tagged(&rows)
    })
}

fn real(results: &[MatchResult], level: ConstructionType) -> Vec<&MatchResult> {
    results
        .iter()
        .filter(|r| r.construction_type == level && !r.synthetic)
        .collect()
}

proptest! {
    #[test]
    fn accepted_spans_never_overlap_within_a_level(s in sentence()) {
        let results = grammar().annotate(&s).unwrap();
        for level in ConstructionType::LEVELS {
            let accepted = real(&results, level);
            for (i, a) in accepted.iter().enumerate() {
                for b in &accepted[i + 1..] {
                    prop_assert!(!a.span.overlaps(&b.span), "{} overlaps {}", a, b);
                }
            }
        }
    }

    #[test]
    fn results_are_in_sentence_order_per_level(s in sentence()) {
        let results = grammar().annotate(&s).unwrap();
        for level in ConstructionType::LEVELS {
            let starts: Vec<usize> = real(&results, level).iter().map(|r| r.span.start).collect();
            let mut sorted = starts.clone();
            sorted.sort_unstable();
            prop_assert_eq!(starts, sorted);
        }
    }

    #[test]
    fn annotation_is_deterministic(s in sentence()) {
        let e = grammar();
        let first: Vec<String> = e.annotate(&s).unwrap().iter().map(ToString::to_string).collect();
        let second: Vec<String> = e.annotate(&s).unwrap().iter().map(ToString::to_string).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn spans_stay_inside_the_sentence(s in sentence()) {
        for result in grammar().annotate(&s).unwrap() {
            prop_assert!(result.span.start <= result.span.end);
            prop_assert!(result.span.end < s.len());
        }
    }
}
