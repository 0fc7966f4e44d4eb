//! Grammar snapshots

use cxg_engine::EngineConfig;
use cxg_foundation::{ConstructionType, GrammarGraph, GrammarId};
use cxg_runtime::{ConlluParser, Session, UdParser, from_bytes, service, to_bytes};

use crate::{CORPUS, GRAMMAR, temp_path};

fn grammar() -> GrammarGraph {
    service::import(&GrammarGraph::new(GrammarId(3), "pt-br"), GRAMMAR, false)
        .unwrap()
        .0
}

fn annotations(session: &Session) -> Vec<String> {
    ConlluParser
        .parse_all(CORPUS)
        .unwrap()
        .iter()
        .flat_map(|s| session.annotate(s).unwrap())
        .map(|r| r.to_string())
        .collect()
}

#[test]
fn restored_grammar_annotates_identically() {
    let graph = grammar();
    let restored = from_bytes(&to_bytes(&graph).unwrap()).unwrap();
    assert_eq!(restored, graph);

    let original = Session::with_graph(graph, EngineConfig::default()).unwrap();
    let copy = Session::with_graph(restored, EngineConfig::default()).unwrap();
    assert_eq!(annotations(&original), annotations(&copy));
    assert!(!annotations(&copy).is_empty());
}

#[test]
fn session_saves_and_loads_snapshots() {
    let path = temp_path("grammar.msgpack");
    let saved = Session::with_graph(grammar(), EngineConfig::default()).unwrap();
    saved.save_snapshot(&path).unwrap();

    let mut loaded = Session::default();
    loaded.load_snapshot(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.graph().id, GrammarId(3));
    assert_eq!(loaded.graph().len(), 5);
    assert_eq!(annotations(&loaded), annotations(&saved));
}

#[test]
fn disabled_state_survives_a_snapshot() {
    let mut session = Session::with_graph(grammar(), EngineConfig::default()).unwrap();
    session.set_enabled("declarativa", false).unwrap();

    let restored = from_bytes(&to_bytes(session.graph()).unwrap()).unwrap();
    assert!(!restored.find_by_name("declarativa").unwrap().enabled);

    let copy = Session::with_graph(restored, EngineConfig::default()).unwrap();
    let sentential = copy
        .engine()
        .registry()
        .level(ConstructionType::Sentential)
        .len();
    assert_eq!(sentential, 0);
}

#[test]
fn ids_continue_after_a_restore() {
    let graph = grammar();
    let restored = from_bytes(&to_bytes(&graph).unwrap()).unwrap();
    let (next, report) = service::import(
        &restored,
        r#"[{"name": "nova-regra", "type": "phrasal", "pattern": "{PRON} {AUX}"}]"#,
        false,
    )
    .unwrap();
    assert_eq!(report.created, 1);
    let ids: Vec<_> = next.iter().map(|c| c.id).collect();
    let mut unique = ids.clone();
    unique.dedup();
    assert_eq!(ids.len(), 6);
    assert_eq!(unique, ids);
}

#[test]
fn corrupt_snapshots_are_rejected() {
    let err = from_bytes(b"definitely not msgpack").unwrap_err();
    assert_eq!(err.kind_name(), "SerializationError");

    let mut session = Session::default();
    let err = session.load_snapshot(temp_path("absent.msgpack")).unwrap_err();
    assert_eq!(err.kind_name(), "IoError");
}
