//! Importing grammars from JSON

use cxg_engine::{Engine, EngineConfig};
use cxg_foundation::{ConstructionType, GrammarGraph, GrammarId, MweComponent, PosTag};
use cxg_runtime::{ImportReport, service};

use crate::{GRAMMAR, temp_path};

fn empty() -> GrammarGraph {
    GrammarGraph::new(GrammarId(1), "pt-br")
}

fn import(graph: &GrammarGraph, json: &str, overwrite: bool) -> (GrammarGraph, ImportReport) {
    service::import(graph, json, overwrite).unwrap()
}

#[test]
fn bad_row_is_reported_and_the_rest_created() {
    let json = r#"[
        {"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}"},
        {"name": "quebrada", "type": "phrasal", "pattern": "{DET} ({NOUN}"},
        {"name": "por-causa-de", "type": "mwe", "pattern": "por causa de"}
    ]"#;
    let (graph, report) = import(&empty(), json, false);
    assert_eq!(report.created, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 2);
    assert_eq!(report.errors[0].kind, "PatternSyntaxError");

    let names: Vec<_> = graph.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["sn-det", "por-causa-de"]);
}

#[test]
fn report_serializes_with_row_and_kind() {
    let json = r#"[
        {"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}"},
        {"name": "quebrada", "type": "phrasal", "pattern": "{DET} ({NOUN}"},
        {"name": "por-causa-de", "type": "mwe", "pattern": "por causa de"}
    ]"#;
    let (_, report) = import(&empty(), json, false);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["created"], 2);
    assert_eq!(value["errors"][0]["row"], 2);
    assert_eq!(value["errors"][0]["kind"], "PatternSyntaxError");
}

#[test]
fn full_grammar_imports_cleanly() {
    let (graph, report) = import(&empty(), GRAMMAR, false);
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.created, 5);

    let mwe = graph.find_by_name("de-acordo-com").unwrap();
    assert_eq!(mwe.construction_type, ConstructionType::Mwe);
    assert_eq!(mwe.priority, 80);
    assert_eq!(
        mwe.components.as_deref().unwrap()[1],
        MweComponent::Simple("acordo".to_string())
    );
    assert_eq!(graph.find_by_name("sn-det").unwrap().constraints.len(), 1);
}

#[test]
fn invalid_component_lists_fail_their_row() {
    let json = r#"[
        {"name": "curta", "type": "mwe", "components": ["só"]},
        {"name": "mista", "type": "mwe", "components": ["de", {"type": "*"}]},
        {"name": "estendida", "type": "mwe",
         "components": [{"type": "L", "value": "dar"}, {"type": "*"}, {"type": "P", "value": "NOUN"}]}
    ]"#;
    let (graph, report) = import(&empty(), json, false);
    assert_eq!(report.created, 1);
    let kinds: Vec<_> = report.errors.iter().map(|e| (e.row, e.kind.as_str())).collect();
    assert_eq!(kinds, vec![(1, "ValidationError"), (2, "ValidationError")]);
    assert_eq!(
        graph.find_by_name("estendida").unwrap().components.as_deref().unwrap()[2],
        MweComponent::Pos(PosTag::Noun)
    );
}

#[test]
fn labels_may_be_declared_later_in_the_batch() {
    let json = r#"[
        {"name": "oracao", "type": "clausal", "pattern": "{Nominal} {VERB}"},
        {"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}", "aggregate_as": "Nominal"}
    ]"#;
    let (_, report) = import(&empty(), json, false);
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.created, 2);
}

#[test]
fn labels_of_rejected_rows_are_unknown() {
    let json = r#"[
        {"name": "sn-ruim", "type": "phrasal", "pattern": "({DET}", "phrasal_ce": "Sujeito"},
        {"name": "oracao", "type": "clausal", "pattern": "{Sujeito} {VERB}"},
        {"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}"}
    ]"#;
    let (graph, report) = import(&empty(), json, false);
    assert_eq!(report.created, 1);
    let rows: Vec<_> = report.errors.iter().map(|e| (e.row, e.kind.as_str())).collect();
    assert_eq!(rows, vec![(1, "PatternSyntaxError"), (2, "PatternSyntaxError")]);
    assert!(report.errors[1].message.contains("Sujeito"), "{report:?}");

    assert!(graph.find_by_name("oracao").is_none());
    assert!(Engine::with_graph(&graph, EngineConfig::default()).is_ok());
}

#[test]
fn rejection_follows_label_chains() {
    let json = r#"[
        {"name": "sn-ruim", "type": "phrasal", "pattern": "({DET}", "phrasal_ce": "Sujeito"},
        {"name": "oracao", "type": "clausal", "pattern": "{Sujeito} {VERB}", "clausal_ce": "Oracao"},
        {"name": "frase", "type": "sentential", "pattern": "{Oracao} {PUNCT}"}
    ]"#;
    let (graph, report) = import(&empty(), json, false);
    assert_eq!(report.created, 0);
    let rows: Vec<_> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![1, 2, 3]);
    assert!(graph.is_empty());
    assert!(Engine::with_graph(&graph, EngineConfig::default()).is_ok());
}

#[test]
fn labels_of_skipped_rows_are_unknown() {
    let (graph, _) = import(
        &empty(),
        r#"[{"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}"}]"#,
        false,
    );
    let json = r#"[
        {"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}", "phrasal_ce": "Sujeito"},
        {"name": "oracao", "type": "clausal", "pattern": "{Sujeito} {VERB}"}
    ]"#;
    let (graph, report) = import(&graph, json, false);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 2);
    assert!(Engine::with_graph(&graph, EngineConfig::default()).is_ok());
}

#[test]
fn unknown_constraint_features_fail_their_row() {
    let json = r#"[
        {"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}",
         "constraints": [{"kind": "agreement", "features": ["Cor"]}]}
    ]"#;
    let (_, report) = import(&empty(), json, false);
    assert_eq!(report.errors[0].kind, "ConstraintDeclarationError");
}

#[test]
fn overwrite_decides_between_update_and_skip() {
    let (graph, _) = import(&empty(), GRAMMAR, false);
    let before = graph.find_by_name("predicativo").unwrap().id;
    let edit = r#"[{"name": "predicativo", "type": "phrasal", "pattern": "{AUX} [{ADV}] {ADJ}", "priority": 70}]"#;

    let (same, report) = import(&graph, edit, false);
    assert_eq!((report.created, report.updated, report.skipped), (0, 0, 1));
    assert_eq!(same.find_by_name("predicativo").unwrap().priority, 50);

    let (updated, report) = import(&graph, edit, true);
    assert_eq!((report.created, report.updated, report.skipped), (0, 1, 0));
    let edited = updated.find_by_name("predicativo").unwrap();
    assert_eq!(edited.id, before);
    assert_eq!(edited.priority, 70);
    assert_eq!(updated.position(before), graph.position(before));
}

#[test]
fn malformed_documents_are_import_errors() {
    for json in ["not json", r#"{"rows": []}"#, "42"] {
        let err = service::import(&empty(), json, false).unwrap_err();
        assert_eq!(err.kind_name(), "ImportError", "{json}");
    }
}

#[test]
fn non_object_rows_fail_alone() {
    let (graph, report) = import(
        &empty(),
        r#"[17, {"name": "sn-det", "type": "phrasal", "pattern": "{DET} {NOUN}"}]"#,
        false,
    );
    assert_eq!(report.errors[0].row, 1);
    assert_eq!(graph.len(), 1);
}

#[test]
fn import_file_names_the_file_on_error() {
    let path = temp_path("broken.json");
    std::fs::write(&path, "[").unwrap();
    let err = service::import_file(&empty(), &path, false).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert_eq!(err.kind_name(), "ImportError");
    let source = err.context.and_then(|c| c.source).unwrap();
    assert!(source.ends_with("broken.json"), "{source}");
}

#[test]
fn import_file_reads_a_grammar() {
    let path = temp_path("grammar.json");
    std::fs::write(&path, GRAMMAR).unwrap();
    let (graph, report) = service::import_file(&empty(), &path, false).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(report.created, 5);
    assert_eq!(graph.len(), 5);
}
