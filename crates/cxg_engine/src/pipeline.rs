//! The annotation pipeline.
//!
//! Levels run in order: mwe, phrasal, clausal, sentential. At each level
//! every construction is matched, its raw candidates filtered by
//! constraints and lookahead, the survivors of all constructions resolved
//! against each other, and the winners aggregated into the CE layer the
//! next level matches against.

use std::sync::{Arc, Mutex};

use cxg_foundation::{
    ConstructionId, ConstructionType, GrammarGraph, Result, Sentence, TokenSpan, Vocabulary,
};
use cxg_pattern::{CompiledMatcher, compile_pattern};
use tracing::{debug, trace};

use crate::aggregate::aggregate;
use crate::budget::StepBudget;
use crate::config::EngineConfig;
use crate::conflict::resolve;
use crate::constraint::satisfies_all;
use crate::flat::{match_all, match_spanning};
use crate::lookahead::LookaheadVerdict;
use crate::registry::{CompileCache, ConstructionRegistry, RegisteredConstruction, RegistryHandle};
use crate::result::{Binding, CeSpans, LookaheadOutcome, MatchResult};
use crate::tree::match_tree;

/// Name reported on results of an ad-hoc pattern test.
pub const TEST_PATTERN_NAME: &str = "test-pattern";

/// Results of annotating one sentence, with the CE layer they produced.
#[derive(Clone, Debug, Default)]
pub struct Annotation {
    /// Accepted results, level by level, each level in sentence order.
    pub results: Vec<MatchResult>,
    /// Every labelled span offered to higher levels.
    pub ce_spans: CeSpans,
}

/// Annotates sentences against the current registry.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    base: Vocabulary,
    handle: RegistryHandle,
    cache: Mutex<CompileCache>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Creates an engine with an empty registry.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            base: Vocabulary::new(),
            handle: RegistryHandle::default(),
            cache: Mutex::new(CompileCache::new()),
        }
    }

    /// Creates an engine and loads `graph`.
    ///
    /// # Errors
    /// Fails if a construction of the graph does not compile.
    pub fn with_graph(graph: &GrammarGraph, config: EngineConfig) -> Result<Self> {
        let engine = Self::new(config);
        engine.load(graph)?;
        Ok(engine)
    }

    /// Rebuilds the registry from `graph` and swaps it in.
    ///
    /// On error the previous registry stays in effect.
    ///
    /// # Errors
    /// Fails if a construction of the graph does not compile.
    pub fn load(&self, graph: &GrammarGraph) -> Result<()> {
        let registry = {
            let mut cache = match self.cache.lock() {
                Ok(cache) => cache,
                Err(poisoned) => poisoned.into_inner(),
            };
            ConstructionRegistry::build(graph, &self.base, &mut cache)?
        };
        self.handle.swap(registry);
        Ok(())
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A snapshot of the current registry.
    #[must_use]
    pub fn registry(&self) -> Arc<ConstructionRegistry> {
        self.handle.current()
    }

    /// Annotates a sentence.
    ///
    /// # Errors
    /// Returns `MatchTimeout` if a match attempt exhausts the step budget.
    pub fn annotate(&self, sentence: &Sentence) -> Result<Vec<MatchResult>> {
        Ok(self.analyze(sentence)?.results)
    }

    /// Annotates a sentence and returns the CE layer as well.
    ///
    /// # Errors
    /// Returns `MatchTimeout` if a match attempt exhausts the step budget.
    pub fn analyze(&self, sentence: &Sentence) -> Result<Annotation> {
        annotate_with(&self.registry(), &self.config, sentence)
    }

    /// Matches an ad-hoc pattern alone; see [`test_pattern`].
    ///
    /// # Errors
    /// Returns `PatternSyntax` for a malformed pattern or `MatchTimeout`.
    pub fn test_pattern(&self, pattern: &str, sentence: &Sentence) -> Result<Vec<MatchResult>> {
        test_pattern(&self.registry(), &self.config, pattern, sentence)
    }
}

/// Runs every level of `registry` over `sentence`.
///
/// # Errors
/// Returns `MatchTimeout` if a match attempt exhausts the step budget.
pub fn annotate_with(
    registry: &ConstructionRegistry,
    config: &EngineConfig,
    sentence: &Sentence,
) -> Result<Annotation> {
    let mut annotation = Annotation::default();

    for level in ConstructionType::LEVELS {
        let entries = registry.level(level);
        if entries.is_empty() {
            continue;
        }

        let mut candidates = Vec::new();
        for entry in entries {
            candidates.extend(match_construction(entry, sentence, &annotation.ce_spans, config)?);
        }
        let raw = candidates.len();
        let accepted = resolve(candidates);
        debug!(
            level = level.as_str(),
            raw,
            accepted = accepted.len(),
            "level resolved"
        );

        let results = aggregate(
            accepted,
            entries,
            config.emit_synthetic,
            &mut annotation.ce_spans,
        );
        annotation.results.extend(results);
    }

    Ok(annotation)
}

/// Matches one construction and filters its candidates by constraints and
/// lookahead.
///
/// # Errors
/// Returns `MatchTimeout` if a match attempt exhausts the step budget.
pub fn match_construction(
    entry: &RegisteredConstruction,
    sentence: &Sentence,
    ce: &CeSpans,
    config: &EngineConfig,
) -> Result<Vec<MatchResult>> {
    let compiled = &entry.compiled;
    let construction = &compiled.construction;
    let mut budget = StepBudget::new(config.step_budget).for_construction(&construction.name);

    // Sequential matchers with whether their bindings are merged in.
    let sequential: Vec<(&CompiledMatcher, bool)> = [
        compiled.flat.as_ref().map(|m| (m, true)),
        compiled.components.as_ref().map(|m| (m, compiled.flat.is_none())),
    ]
    .into_iter()
    .flatten()
    .collect();

    // The tree proposes spans when there is one, otherwise the first
    // sequential matcher does; every other matcher must cover the same span.
    let (proposed, checks): (Vec<(TokenSpan, Vec<Binding>)>, &[(&CompiledMatcher, bool)]) =
        match (&compiled.tree, sequential.split_first()) {
            (Some(tree), _) => (
                match_tree(tree, sentence, &mut budget)?
                    .into_iter()
                    .map(|c| (c.span, c.bindings))
                    .collect(),
                sequential.as_slice(),
            ),
            (None, Some(((first, _), rest))) => (
                match_all(first, sentence, ce, &mut budget)?
                    .into_iter()
                    .map(|c| (c.span, c.bindings))
                    .collect(),
                rest,
            ),
            (None, None) => return Ok(Vec::new()),
        };

    let mut spans: Vec<(TokenSpan, Vec<Binding>)> = Vec::with_capacity(proposed.len());
    'proposed: for (span, mut bindings) in proposed {
        if spans.iter().any(|(seen, _)| *seen == span) {
            continue;
        }
        for (matcher, merge) in checks {
            budget.reset();
            let Some(found) = match_spanning(matcher, sentence, ce, span, &mut budget)? else {
                continue 'proposed;
            };
            if *merge {
                bindings.extend(found.bindings);
            }
        }
        bindings.sort();
        bindings.dedup();
        spans.push((span, bindings));
    }

    if let Some(max) = config.max_candidates_per_construction {
        if spans.len() > max {
            trace!(construction = %construction.name, raw = spans.len(), max, "candidates capped");
            spans.truncate(max);
        }
    }

    let mut results = Vec::with_capacity(spans.len());
    for (span, bindings) in spans {
        if !satisfies_all(&compiled.constraints, &bindings, sentence) {
            trace!(construction = %construction.name, %span, "dropped by constraint");
            continue;
        }

        let lookahead = match (&compiled.lookahead, config.lookahead_enabled) {
            (Some(lookahead), true) => match lookahead.evaluate(span, sentence, ce, &mut budget)? {
                LookaheadVerdict::Confirmed => LookaheadOutcome::Confirmed,
                LookaheadVerdict::NotTriggered => LookaheadOutcome::NotTriggered,
                LookaheadVerdict::Invalidated => {
                    trace!(construction = %construction.name, %span, "dropped by lookahead");
                    continue;
                }
            },
            _ => LookaheadOutcome::Disabled,
        };

        results.push(MatchResult {
            construction_id: construction.id,
            construction_name: Arc::clone(&compiled.name),
            construction_type: construction.construction_type,
            span,
            bindings,
            ce_label: None,
            synthetic: false,
            semantic_type: None,
            semantics: None,
            lookahead,
            priority: construction.priority,
            declaration_order: entry.order,
        });
    }
    Ok(results)
}

/// Compiles `pattern` against the registry's vocabulary and reports every
/// raw flat candidate, without lookahead or conflict resolution.
///
/// CE references see the spans the registry's own constructions accept on
/// the sentence.
///
/// # Errors
/// Returns `PatternSyntax` for a malformed pattern or `MatchTimeout`.
pub fn test_pattern(
    registry: &ConstructionRegistry,
    config: &EngineConfig,
    pattern: &str,
    sentence: &Sentence,
) -> Result<Vec<MatchResult>> {
    let matcher = compile_pattern(pattern, registry.vocabulary())?;
    let ce = if matcher.uses_ce() {
        annotate_with(registry, config, sentence)?.ce_spans
    } else {
        CeSpans::new()
    };

    let mut budget = StepBudget::new(config.step_budget).for_construction(TEST_PATTERN_NAME);
    let name: Arc<str> = Arc::from(TEST_PATTERN_NAME);
    Ok(match_all(&matcher, sentence, &ce, &mut budget)?
        .into_iter()
        .map(|candidate| MatchResult {
            construction_id: ConstructionId(0),
            construction_name: Arc::clone(&name),
            construction_type: ConstructionType::Phrasal,
            span: candidate.span,
            bindings: candidate.bindings,
            ce_label: None,
            synthetic: false,
            semantic_type: None,
            semantics: None,
            lookahead: LookaheadOutcome::Disabled,
            priority: 0,
            declaration_order: 0,
        })
        .collect())
}
