//! Registry building, compile caching, and registry swaps

use cxg_engine::{CompileCache, ConstructionRegistry, compile};
use cxg_foundation::{Construction, ConstructionType, ErrorKind, GrammarId, Vocabulary};

use crate::{cafe, engine, graph};

fn grammar() -> cxg_foundation::GrammarGraph {
    graph(vec![
        Construction::new("baixa", ConstructionType::Phrasal, "{DET} {NOUN}").with_priority(10),
        Construction::new("alta", ConstructionType::Phrasal, "{AUX} {ADJ}").with_priority(90),
        Construction::new("mwe-cafe", ConstructionType::Mwe, "o café").with_phrasal_ce("Bebida"),
        Construction::new("desligada", ConstructionType::Clausal, "{Bebida} {AUX}").with_enabled(false),
    ])
}

#[test]
fn levels_are_ordered_by_priority() {
    let mut cache = CompileCache::new();
    let registry = ConstructionRegistry::build(&grammar(), &Vocabulary::new(), &mut cache).unwrap();
    let names: Vec<_> = registry
        .level(ConstructionType::Phrasal)
        .iter()
        .map(|entry| entry.compiled.construction.name.clone())
        .collect();
    assert_eq!(names, vec!["alta", "baixa"]);
    assert_eq!(registry.level(ConstructionType::Phrasal)[0].order, 1);
}

#[test]
fn disabled_constructions_are_not_registered() {
    let mut cache = CompileCache::new();
    let g = grammar();
    let registry = ConstructionRegistry::build(&g, &Vocabulary::new(), &mut cache).unwrap();
    assert_eq!(registry.len(), 3);
    assert!(registry.level(ConstructionType::Clausal).is_empty());

    let disabled = g.find_by_name("desligada").unwrap().id;
    assert!(registry.get(disabled).is_none());
    assert_eq!(registry.graph_id(), GrammarId(1));
}

#[test]
fn graph_labels_join_the_vocabulary() {
    let mut cache = CompileCache::new();
    let registry = ConstructionRegistry::build(&grammar(), &Vocabulary::new(), &mut cache).unwrap();
    assert!(registry.vocabulary().is_ce_label("Bebida"));
    assert!(registry.vocabulary().is_ce_label("Head"));
}

#[test]
fn rebuilding_an_unchanged_graph_hits_the_cache() {
    let mut cache = CompileCache::new();
    let g = grammar();
    ConstructionRegistry::build(&g, &Vocabulary::new(), &mut cache).unwrap();
    assert_eq!(cache.stats(), (0, 3));

    ConstructionRegistry::build(&g, &Vocabulary::new(), &mut cache).unwrap();
    assert_eq!(cache.stats(), (3, 3));
    assert_eq!(cache.len(), 3);
}

#[test]
fn editing_a_construction_misses_the_cache() {
    let mut cache = CompileCache::new();
    let g = grammar();
    ConstructionRegistry::build(&g, &Vocabulary::new(), &mut cache).unwrap();

    let mut edited = g.find_by_name("baixa").unwrap().clone();
    edited.pattern = "{DET} [{ADJ}] {NOUN}".to_string();
    let g = g.replace(edited).unwrap();
    ConstructionRegistry::build(&g, &Vocabulary::new(), &mut cache).unwrap();
    assert_eq!(cache.stats(), (2, 4));
    assert_eq!(cache.len(), 3);
}

#[test]
fn compile_errors_name_the_construction() {
    let bad = Construction::new("quebrada", ConstructionType::Phrasal, "{DET} ({NOUN}");
    let err = compile(&bad, &Vocabulary::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PatternSyntax { offset: 6, .. }));
    assert_eq!(err.context.unwrap().source.as_deref(), Some("quebrada"));
}

#[test]
fn out_of_range_fields_are_validation_errors() {
    let vocab = Vocabulary::new();
    let short_name = Construction::new("sn", ConstructionType::Phrasal, "{DET} {NOUN}");
    assert_eq!(compile(&short_name, &vocab).unwrap_err().kind_name(), "ValidationError");

    let priority = Construction::new("sn-det", ConstructionType::Phrasal, "{DET} {NOUN}").with_priority(200);
    assert_eq!(compile(&priority, &vocab).unwrap_err().kind_name(), "ValidationError");

    let window = Construction::new("sn-det", ConstructionType::Phrasal, "{DET} {NOUN}").with_lookahead(11);
    assert_eq!(compile(&window, &vocab).unwrap_err().kind_name(), "ValidationError");
}

#[test]
fn blank_pattern_needs_another_matcher() {
    let blank = Construction::new("vazia", ConstructionType::Mwe, "  ");
    assert_eq!(
        compile(&blank, &Vocabulary::new()).unwrap_err().kind_name(),
        "PatternSyntaxError"
    );
}

#[test]
fn failed_reload_keeps_the_previous_grammar() {
    let e = engine(vec![Construction::new("sn-det", ConstructionType::Phrasal, "{DET} {NOUN}")]);
    let before = e.registry();

    let broken = graph(vec![Construction::new("quebrada", ConstructionType::Phrasal, "{DET")]);
    assert!(e.load(&broken).is_err());
    assert_eq!(e.registry().len(), before.len());
    assert_eq!(e.annotate(&cafe()).unwrap().len(), 1);
}

#[test]
fn readers_keep_their_snapshot_across_swaps() {
    let e = engine(vec![Construction::new("sn-det", ConstructionType::Phrasal, "{DET} {NOUN}")]);
    let snapshot = e.registry();
    e.load(&graph(vec![])).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(e.registry().is_empty());
}
