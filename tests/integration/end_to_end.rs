//! CoNLL-U in, annotations out

use cxg_engine::{EngineConfig, LookaheadOutcome};
use cxg_foundation::{ConstructionType, GrammarGraph, GrammarId, TokenSpan};
use cxg_runtime::{ConlluParser, PretaggedParser, Session, UdParser, format_results, service};

use crate::{CORPUS, GRAMMAR, temp_path};

fn session() -> Session {
    let (graph, report) =
        service::import(&GrammarGraph::new(GrammarId(1), "pt-br"), GRAMMAR, false).unwrap();
    assert!(report.is_clean(), "{report:?}");
    Session::with_graph(graph, EngineConfig::default()).unwrap()
}

#[test]
fn annotates_every_level_of_a_copular_sentence() {
    let sentences = ConlluParser.parse_all(CORPUS).unwrap();
    assert_eq!(sentences.len(), 2);

    let results = session().annotate(&sentences[0]).unwrap();
    let summary: Vec<_> = results
        .iter()
        .map(|r| (r.construction_name.to_string(), r.span, r.synthetic))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("sn-det".to_string(), TokenSpan::new(0, 1), false),
            ("sn-det".to_string(), TokenSpan::new(0, 1), true),
            ("predicativo".to_string(), TokenSpan::new(2, 3), false),
            ("oracao-cop".to_string(), TokenSpan::new(0, 3), false),
            ("declarativa".to_string(), TokenSpan::new(0, 4), false),
        ]
    );
}

#[test]
fn mwe_from_components_is_found() {
    let sentences = ConlluParser.parse_all(CORPUS).unwrap();
    let results = session().annotate(&sentences[1]).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].construction_type, ConstructionType::Mwe);
    assert_eq!(results[0].span, TokenSpan::new(2, 4));
    assert_eq!(sentences[1].text(results[0].span), "de acordo com");
}

#[test]
fn agreement_uses_conllu_features() {
    let disagreeing = CORPUS.replacen("Gender=Masc|Number=Sing\t2", "Gender=Fem|Number=Sing\t2", 1);
    let sentences = ConlluParser.parse_all(&disagreeing).unwrap();
    let results = session().annotate(&sentences[0]).unwrap();
    assert!(results.iter().all(|r| &*r.construction_name != "sn-det"));
    assert!(results.iter().all(|r| r.construction_type != ConstructionType::Clausal));
}

#[test]
fn formatted_results_show_the_text() {
    let sentences = ConlluParser.parse_all(CORPUS).unwrap();
    let out = format_results(&sentences[1], &session().annotate(&sentences[1]).unwrap());
    assert!(out.contains("[2,4] mwe de-acordo-com"), "{out}");
    assert!(out.ends_with("\"de acordo com\""), "{out}");
}

#[test]
fn conllu_files_are_read_from_disk() {
    let path = temp_path("corpus.conllu");
    std::fs::write(&path, CORPUS).unwrap();
    let sentences = cxg_runtime::conllu::read_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].len(), 5);

    let missing = cxg_runtime::conllu::read_file(temp_path("missing.conllu")).unwrap_err();
    assert_eq!(missing.kind_name(), "IoError");
}

#[test]
fn service_tests_patterns_on_raw_text() {
    let (graph, _) =
        service::import(&GrammarGraph::new(GrammarId(1), "pt-br"), GRAMMAR, false).unwrap();
    let text = "o/DET/det/2 café/NOUN/nsubj/4 está/AUX/cop/4 quente/ADJ/root/0";

    let results = service::test_pattern(&graph, "{Subject} {AUX}", text, &PretaggedParser).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].span, TokenSpan::new(0, 2));
    assert_eq!(results[0].lookahead, LookaheadOutcome::Disabled);

    let err = service::test_pattern(&graph, "{Subject} (", text, &PretaggedParser).unwrap_err();
    assert_eq!(err.kind_name(), "PatternSyntaxError");

    let err = service::test_pattern(&graph, "{DET}", "o/ARTIGO", &PretaggedParser).unwrap_err();
    assert_eq!(err.kind_name(), "UdParseError");
}

#[test]
fn service_compiles_against_the_graph_namespace() {
    let (graph, _) =
        service::import(&GrammarGraph::new(GrammarId(1), "pt-br"), GRAMMAR, false).unwrap();
    let uses_graph_label = cxg_foundation::Construction::new(
        "nominal-pp",
        ConstructionType::Clausal,
        "{Nominal} {ADP} {Nominal}",
    );
    let compiled = service::compile(&graph, &uses_graph_label).unwrap();
    assert!(compiled.flat.unwrap().uses_ce());

    let bare = GrammarGraph::new(GrammarId(2), "vazia");
    assert!(service::compile(&bare, &uses_graph_label).is_err());
}

#[test]
fn step_budget_surfaces_as_timeout() {
    let (graph, _) = service::import(
        &GrammarGraph::new(GrammarId(1), "pt-br"),
        r#"[{"name": "qualquer", "type": "mwe", "pattern": "_ _ _ _ _"}]"#,
        false,
    )
    .unwrap();
    let session = Session::with_graph(graph, EngineConfig::default().with_step_budget(2)).unwrap();
    let err = session.annotate_line("a/X b/X c/X d/X e/X").unwrap_err();
    assert_eq!(err.kind_name(), "MatchTimeout");
}
