//! Driving the REPL with scripted input

use cxg_engine::EngineConfig;
use cxg_foundation::{GrammarGraph, GrammarId, Result};
use cxg_runtime::{LineEditor, Outcome, ReadResult, Repl, Session, save_to_file, service};

use crate::{GRAMMAR, temp_path};

struct Script {
    lines: Vec<String>,
    read: usize,
}

impl Script {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
            read: 0,
        }
    }
}

impl LineEditor for Script {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        let line = self.lines.get(self.read).cloned();
        self.read += 1;
        Ok(line.map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, _line: &str) {}

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

const CAFE: &str = "o/DET/det/2 café/NOUN/nsubj/4 está/AUX/cop/4 quente/ADJ/root/0";

fn repl() -> Repl<Script> {
    let (graph, _) =
        service::import(&GrammarGraph::new(GrammarId(1), "pt-br"), GRAMMAR, false).unwrap();
    let session = Session::with_graph(graph, EngineConfig::default()).unwrap();
    Repl::with_editor(Script::new(&[])).without_banner().with_session(session)
}

fn printed(outcome: Outcome) -> String {
    match outcome {
        Outcome::Print(text) => text,
        Outcome::Quit => panic!("unexpected quit"),
    }
}

#[test]
fn sentences_show_every_level() {
    let mut repl = repl();
    let out = printed(repl.eval(CAFE).unwrap());
    assert!(out.contains("phrasal sn-det"), "{out}");
    assert!(out.contains("clausal oracao-cop"), "{out}");
    assert!(out.contains("\"o café está quente\""), "{out}");
}

#[test]
fn pattern_mode_uses_grammar_labels() {
    let mut repl = repl();
    let out = printed(repl.eval(":pattern {Subject} {Predicate}").unwrap());
    assert_eq!(out, "testing pattern: {Subject} {Predicate}");

    let out = printed(repl.eval(CAFE).unwrap());
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("[0,3] phrasal test-pattern #0"), "{out}");

    assert!(repl.eval(":pattern {Sujeito}").is_err());
    assert_eq!(repl.session().test_pattern(), Some("{Subject} {Predicate}"));
}

#[test]
fn load_accepts_snapshots() {
    let path = temp_path("repl.msgpack");
    let (small, _) = service::import(
        &GrammarGraph::new(GrammarId(9), "pequena"),
        r#"[{"name": "aux-adj", "type": "phrasal", "pattern": "{AUX} {ADJ}"}]"#,
        false,
    )
    .unwrap();
    save_to_file(&small, &path).unwrap();

    let mut repl = repl();
    let out = printed(repl.eval(&format!(":load {}", path.display())).unwrap());
    let _ = std::fs::remove_file(&path);
    assert_eq!(out, "loaded snapshot with 1 constructions");
    assert_eq!(repl.session().graph().id, GrammarId(9));
}

#[test]
fn run_reads_until_quit() {
    let script = Script::new(&[":list", CAFE, ":disable sn-det", CAFE, ":quit", ":help"]);
    let mut repl = Repl::with_editor(script).without_banner();
    repl.run().unwrap();
    assert!(repl.session().graph().is_empty());
}
