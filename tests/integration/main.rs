//! Integration tests for Layer 3: Runtime
//!
//! End-to-end tests across every layer: importing grammars, reading
//! CoNLL-U, annotating, snapshots, and the REPL.

mod end_to_end;
mod import;
mod repl;
mod snapshot;

use std::path::PathBuf;

/// A grammar covering every level, in the JSON import format.
pub const GRAMMAR: &str = r#"{
  "constructions": [
    {"name": "de-acordo-com", "type": "mwe", "components": ["de", "acordo", "com"], "priority": 80},
    {"name": "sn-det", "type": "phrasal", "pattern": "{DET} [{ADJ}] {NOUN}",
     "phrasal_ce": "Subject", "aggregate_as": "Nominal",
     "constraints": [{"kind": "agreement", "features": ["Number", "Gender"]}]},
    {"name": "predicativo", "type": "phrasal", "pattern": "{AUX} {ADJ}", "phrasal_ce": "Predicate"},
    {"name": "oracao-cop", "type": "clausal", "pattern": "{Subject} {Predicate}", "clausal_ce": "Oracao"},
    {"name": "declarativa", "type": "sentential", "pattern": "{Oracao} [{PUNCT}]"}
  ]
}"#;

/// "O café está quente." followed by "Eu estou de acordo com você."
pub const CORPUS: &str = "\
# sent_id = 1
# text = O café está quente.
1\tO\to\tDET\t_\tGender=Masc|Number=Sing\t2\tdet\t_\t_
2\tcafé\tcafé\tNOUN\t_\tGender=Masc|Number=Sing\t4\tnsubj\t_\t_
3\testá\testar\tAUX\t_\tMood=Ind|Tense=Pres\t4\tcop\t_\t_
4\tquente\tquente\tADJ\t_\tNumber=Sing\t0\troot\t_\t_
5\t.\t.\tPUNCT\t_\t_\t4\tpunct\t_\t_

# sent_id = 2
1\tEu\teu\tPRON\t_\t_\t2\tnsubj\t_\t_
2\testou\testar\tAUX\t_\t_\t0\troot\t_\t_
3\tde\tde\tADP\t_\t_\t4\tcase\t_\t_
4\tacordo\tacordo\tNOUN\t_\t_\t2\tobl\t_\t_
5\tcom\tcom\tADP\t_\t_\t6\tcase\t_\t_
6\tvocê\tvocê\tPRON\t_\t_\t4\tnmod\t_\t_
";

/// A path in the temp directory unique to this test process.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cxg_it_{}_{name}", std::process::id()))
}
