//! Session state for the REPL and CLI.
//!
//! The session holds the grammar being edited, an engine loaded with it,
//! and the ad-hoc pattern under test, if any. Every edit to the graph
//! reloads the engine; an edit whose graph fails to compile is rejected
//! and the session keeps its previous graph.

use std::path::Path;

use cxg_engine::{Engine, EngineConfig, MatchResult};
use cxg_foundation::{
    Construction, Error, GrammarGraph, GrammarId, Result, Sentence, Vocabulary,
};
use cxg_pattern::compile_pattern;
use tracing::info;

use crate::import::{self, ImportReport};
use crate::serialize;
use crate::ud::{PretaggedParser, UdParser};

/// Session state for an interactive or batch run.
#[derive(Debug)]
pub struct Session {
    graph: GrammarGraph,
    engine: Engine,
    test_pattern: Option<String>,
}

impl Session {
    /// Creates a session with an empty grammar.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            graph: GrammarGraph::new(GrammarId(1), "default"),
            engine: Engine::new(config),
            test_pattern: None,
        }
    }

    /// Creates a session over `graph`.
    ///
    /// # Errors
    /// Fails if a construction of the graph does not compile.
    pub fn with_graph(graph: GrammarGraph, config: EngineConfig) -> Result<Self> {
        let engine = Engine::with_graph(&graph, config)?;
        Ok(Self {
            graph,
            engine,
            test_pattern: None,
        })
    }

    /// The current grammar.
    #[must_use]
    pub const fn graph(&self) -> &GrammarGraph {
        &self.graph
    }

    /// The engine loaded with the current grammar.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Replaces the grammar.
    ///
    /// # Errors
    /// Fails, leaving the session unchanged, if the graph does not compile.
    pub fn set_graph(&mut self, graph: GrammarGraph) -> Result<()> {
        self.engine.load(&graph)?;
        self.graph = graph;
        Ok(())
    }

    /// Imports a JSON file of constructions into the grammar.
    ///
    /// # Errors
    /// Fails if the file is unreadable or malformed. Row errors are
    /// reported in the returned [`ImportReport`].
    pub fn import_file(&mut self, path: impl AsRef<Path>, overwrite: bool) -> Result<ImportReport> {
        let (graph, report) = import::import_file(&self.graph, &Vocabulary::new(), path, overwrite)?;
        self.set_graph(graph)?;
        info!(
            created = report.created,
            updated = report.updated,
            errors = report.errors.len(),
            "imported grammar"
        );
        Ok(report)
    }

    /// Replaces the grammar with a snapshot.
    ///
    /// # Errors
    /// Fails if the snapshot cannot be read or its graph does not compile.
    pub fn load_snapshot(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let graph = serialize::load_from_file(path)?;
        self.set_graph(graph)
    }

    /// Writes the grammar to a snapshot file.
    ///
    /// # Errors
    /// Fails if the file cannot be written.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        serialize::save_to_file(&self.graph, path)
    }

    /// Enables or disables the construction called `name`.
    ///
    /// # Errors
    /// Fails if no construction has that name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let id = self
            .find(name)
            .map(|c| c.id)
            .ok_or_else(|| Error::validation(None, format!("no construction named {name:?}")))?;
        let graph = self.graph.set_enabled(id, enabled)?;
        self.set_graph(graph)
    }

    /// Looks up a construction by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Construction> {
        self.graph.find_by_name(name)
    }

    /// Sets or clears the pattern under test.
    ///
    /// # Errors
    /// Returns a `PatternSyntax` error, leaving the previous pattern in
    /// place, if `pattern` does not compile against the grammar.
    pub fn set_test_pattern(&mut self, pattern: Option<String>) -> Result<()> {
        if let Some(source) = &pattern {
            compile_pattern(source, self.engine.registry().vocabulary())?;
        }
        self.test_pattern = pattern;
        Ok(())
    }

    /// The pattern under test.
    #[must_use]
    pub fn test_pattern(&self) -> Option<&str> {
        self.test_pattern.as_deref()
    }

    /// Annotates a sentence, with the test pattern if one is set and with
    /// the whole grammar otherwise.
    ///
    /// # Errors
    /// Returns `MatchTimeout` if matching exhausts the step budget.
    pub fn annotate(&self, sentence: &Sentence) -> Result<Vec<MatchResult>> {
        match &self.test_pattern {
            Some(pattern) => self.engine.test_pattern(pattern, sentence),
            None => self.engine.annotate(sentence),
        }
    }

    /// Parses a pre-tagged line and annotates it.
    ///
    /// # Errors
    /// Fails if the line does not parse or matching times out.
    pub fn annotate_line(&self, line: &str) -> Result<Vec<MatchResult>> {
        let sentence = PretaggedParser.parse(line)?;
        self.annotate(&sentence)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
