//! The pattern-debugging REPL.
//!
//! Lines starting with `:` are commands; every other line is a pre-tagged
//! sentence (see [`PretaggedParser`](crate::ud::PretaggedParser)) that
//! is annotated by the whole grammar, or by the test pattern when one is
//! set.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use cxg_engine::MatchResult;
use cxg_foundation::{Error, Result, Sentence};

use crate::editor::{LineEditor, ReadResult, RustylineEditor, default_keywords};
use crate::import::ImportReport;
use crate::session::Session;
use crate::ud::{PretaggedParser, UdParser};

const HELP: &str = "\
:pattern P      test pattern P alone on the following sentences
:pattern        stop testing and use the whole grammar again
:load FILE      import a JSON grammar (or load a .msgpack snapshot)
:list           list constructions
:enable NAME    enable a construction
:disable NAME   disable a construction
:help           show this help
:quit           leave

Any other line is a sentence: word/POS/rel/parent tokens separated by spaces.";

/// What the REPL does after evaluating a line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text (possibly empty) and read the next line.
    Print(String),
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Grammar, engine, and test pattern.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: Session::default(),
            show_banner: true,
            prompt: "cxg> ".to_string(),
        }
    }

    /// Sets the session for this REPL.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self.refresh_keywords();
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };
            if line.trim().is_empty() {
                continue;
            }
            self.editor.add_history(&line);

            match self.eval(&line) {
                Ok(Outcome::Print(text)) if text.is_empty() => {}
                Ok(Outcome::Print(text)) => println!("{text}"),
                Ok(Outcome::Quit) => break,
                Err(e) => self.print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Evaluates one line.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown command, a failed command, or a
    /// sentence that does not parse.
    pub fn eval(&mut self, line: &str) -> Result<Outcome> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            let sentence = PretaggedParser.parse(line)?;
            let results = self.session.annotate(&sentence)?;
            return Ok(Outcome::Print(format_results(&sentence, &results)));
        };

        let (name, argument) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, a)| (n, a.trim()));

        match name {
            "pattern" => {
                let pattern = (!argument.is_empty()).then(|| argument.to_string());
                self.session.set_test_pattern(pattern)?;
                Ok(Outcome::Print(match self.session.test_pattern() {
                    Some(p) => format!("testing pattern: {p}"),
                    None => "testing the whole grammar".to_string(),
                }))
            }
            "load" => {
                let text = self.load(required(name, argument)?)?;
                self.refresh_keywords();
                Ok(Outcome::Print(text))
            }
            "list" => Ok(Outcome::Print(self.list())),
            "enable" | "disable" => {
                let target = required(name, argument)?;
                self.session.set_enabled(target, name == "enable")?;
                Ok(Outcome::Print(format!("{name}d {target}")))
            }
            "help" => Ok(Outcome::Print(HELP.to_string())),
            "quit" | "q" => Ok(Outcome::Quit),
            other => Err(Error::validation(
                None,
                format!("unknown command :{other} (try :help)"),
            )),
        }
    }

    fn load(&mut self, path: &str) -> Result<String> {
        if Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("msgpack"))
        {
            self.session.load_snapshot(path)?;
            return Ok(format!(
                "loaded snapshot with {} constructions",
                self.session.graph().len()
            ));
        }
        let report = self.session.import_file(path, true)?;
        Ok(format_report(&report))
    }

    fn list(&self) -> String {
        let mut out = String::new();
        for c in self.session.graph().iter() {
            let state = if c.enabled { "enabled" } else { "disabled" };
            let _ = writeln!(
                out,
                "{:>4} {:<24} {:<10} {:>3}  {state}  {}",
                c.id.to_string(),
                c.name,
                c.construction_type.as_str(),
                c.priority,
                c.pattern
            );
        }
        if out.is_empty() {
            out.push_str("no constructions");
        }
        out.trim_end().to_string()
    }

    fn refresh_keywords(&mut self) {
        let registry = self.session.engine().registry();
        let mut keywords = default_keywords();
        keywords.extend(registry.vocabulary().ce_labels().map(|l| format!("{{{l}}}")));
        keywords.extend(self.session.graph().iter().map(|c| c.name.clone()));
        self.editor.set_keywords(keywords);
    }

    /// Prints an error to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
        if let Some(context) = &error.context {
            eprintln!("\x1b[2m{context}\x1b[0m");
        }
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mcxg\x1b[0m construction-grammar REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for commands. Use Ctrl+D to exit.\n");
        let _ = io::stdout().flush();
    }
}

fn required<'a>(command: &str, argument: &'a str) -> Result<&'a str> {
    if argument.is_empty() {
        Err(Error::validation(None, format!(":{command} needs an argument")))
    } else {
        Ok(argument)
    }
}

/// One line per result: span, text, and result summary.
#[must_use]
pub fn format_results(sentence: &Sentence, results: &[MatchResult]) -> String {
    if results.is_empty() {
        return "no matches".to_string();
    }
    results
        .iter()
        .map(|r| format!("{r}  \"{}\"", sentence.text(r.span)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary line plus one line per row error.
#[must_use]
pub fn format_report(report: &ImportReport) -> String {
    let mut out = format!(
        "created {}, updated {}, skipped {}, errors {}",
        report.created,
        report.updated,
        report.skipped,
        report.errors.len()
    );
    for e in &report.errors {
        let _ = write!(out, "\n  row {}: {}: {}", e.row, e.kind, e.message);
    }
    out
}
