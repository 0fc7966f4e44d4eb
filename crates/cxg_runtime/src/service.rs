//! Grammar operations over a whole graph.
//!
//! These are the entry points a caller holding a [`GrammarGraph`] uses:
//! compile one construction in the graph's namespace, try an ad-hoc
//! pattern on raw text, and import a batch of definitions.

use std::path::Path;

use cxg_engine::{
    CompileCache, CompiledConstruction, ConstructionRegistry, EngineConfig, MatchResult,
};
use cxg_foundation::{Construction, GrammarGraph, Result, Vocabulary};
use tracing::debug;

use crate::import::{self, ImportReport};
use crate::ud::UdParser;

/// Compiles `construction` against the vocabulary of `graph`.
///
/// The construction need not belong to the graph yet; labels it declares
/// itself are known while it compiles.
///
/// # Errors
/// Returns the first validation, syntax, or constraint error.
pub fn compile(graph: &GrammarGraph, construction: &Construction) -> Result<CompiledConstruction> {
    let vocabulary = construction
        .exposed_labels()
        .fold(graph.vocabulary(&Vocabulary::new()), |v, label| {
            v.with_ce_label(label)
        });
    cxg_engine::compile(construction, &vocabulary)
}

/// Parses `text` and matches `pattern` alone against it.
///
/// Nothing is persisted. CE references in the pattern see the spans the
/// graph's enabled constructions produce on the sentence.
///
/// # Errors
/// Fails if the text does not parse, the graph or pattern does not
/// compile, or matching exhausts the step budget.
pub fn test_pattern(
    graph: &GrammarGraph,
    pattern: &str,
    text: &str,
    parser: &dyn UdParser,
) -> Result<Vec<MatchResult>> {
    test_pattern_with(graph, pattern, text, parser, &EngineConfig::default())
}

/// [`test_pattern`] with an explicit configuration.
///
/// # Errors
/// See [`test_pattern`].
pub fn test_pattern_with(
    graph: &GrammarGraph,
    pattern: &str,
    text: &str,
    parser: &dyn UdParser,
    config: &EngineConfig,
) -> Result<Vec<MatchResult>> {
    let sentence = parser.parse(text)?;
    let registry = ConstructionRegistry::build(graph, &Vocabulary::new(), &mut CompileCache::new())?;
    let results = cxg_engine::test_pattern(&registry, config, pattern, &sentence)?;
    debug!(pattern, matches = results.len(), "tested pattern");
    Ok(results)
}

/// Imports JSON rows into `graph`; see [`import::import_str`].
///
/// # Errors
/// Fails only if the document itself is malformed.
pub fn import(
    graph: &GrammarGraph,
    json: &str,
    overwrite: bool,
) -> Result<(GrammarGraph, ImportReport)> {
    import::import_str(graph, &Vocabulary::new(), json, overwrite)
}

/// Imports a JSON file into `graph`; see [`import::import_file`].
///
/// # Errors
/// Fails if the file cannot be read or is malformed.
pub fn import_file(
    graph: &GrammarGraph,
    path: impl AsRef<Path>,
    overwrite: bool,
) -> Result<(GrammarGraph, ImportReport)> {
    import::import_file(graph, &Vocabulary::new(), path, overwrite)
}
