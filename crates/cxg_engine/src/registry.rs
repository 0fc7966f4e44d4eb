//! The construction registry.
//!
//! A [`ConstructionRegistry`] holds every enabled construction of one
//! grammar graph in compiled form, grouped by level and ordered by
//! descending priority. Registries are immutable; an edit to the graph
//! produces a new registry which replaces the old one through a
//! [`RegistryHandle`].

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use cxg_foundation::{
    Construction, ConstructionId, ConstructionType, Error, ErrorContext, GrammarGraph, GrammarId,
    MweComponent, Result, Vocabulary,
};
use cxg_pattern::{
    CompiledConstraint, CompiledMatcher, DependencyTree, compile_constraints, compile_pattern,
    components_to_matcher,
};
use tracing::debug;

use crate::lookahead::Lookahead;

// =============================================================================
// Compiled Constructions
// =============================================================================

/// A construction with every matcher it declares, compiled.
#[derive(Clone, Debug)]
pub struct CompiledConstruction {
    /// The source definition.
    pub construction: Construction,
    /// Shared name for results.
    pub name: Arc<str>,
    /// Matcher compiled from `pattern`; absent when the pattern is blank and
    /// another matcher is declared.
    pub flat: Option<CompiledMatcher>,
    /// Matcher built from the MWE component list.
    pub components: Option<CompiledMatcher>,
    /// Dependency sub-pattern.
    pub tree: Option<DependencyTree>,
    /// Checked constraints.
    pub constraints: Vec<CompiledConstraint>,
    /// Lookahead patterns, when lookahead is enabled.
    pub lookahead: Option<Lookahead>,
}

impl CompiledConstruction {
    /// Construction id.
    #[must_use]
    pub fn id(&self) -> ConstructionId {
        self.construction.id
    }

    /// Construction priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.construction.priority
    }

    /// Construction level.
    #[must_use]
    pub fn construction_type(&self) -> ConstructionType {
        self.construction.construction_type
    }
}

/// Compiles a construction against a vocabulary.
///
/// # Errors
/// Returns a `Validation`, `PatternSyntax`, or `ConstraintDeclaration`
/// error carrying the construction name as context.
pub fn compile(construction: &Construction, vocabulary: &Vocabulary) -> Result<CompiledConstruction> {
    let context = || ErrorContext::new().with_source(construction.name.clone());
    compile_inner(construction, vocabulary).map_err(|e| match e.context {
        Some(_) => e,
        None => e.with_context(context()),
    })
}

fn compile_inner(construction: &Construction, vocabulary: &Vocabulary) -> Result<CompiledConstruction> {
    validate_fields(construction)?;

    let has_other_matcher = construction.components.is_some() || construction.dependency.is_some();
    let flat = if construction.pattern.trim().is_empty() && has_other_matcher {
        None
    } else {
        Some(compile_pattern(&construction.pattern, vocabulary)?)
    };

    let components = construction
        .components
        .as_deref()
        .map(|list| check_components(list, vocabulary).map(|()| components_to_matcher(list)))
        .transpose()?;

    let tree = construction
        .dependency
        .as_ref()
        .map(DependencyTree::compile)
        .transpose()?;

    let steps = flat.as_ref().or(components.as_ref()).map(CompiledMatcher::len);
    let constraints = compile_constraints(
        &construction.constraints,
        steps,
        tree.as_ref().map(DependencyTree::len),
    )?;

    let lookahead = Lookahead::compile(construction, vocabulary)?;

    debug!(
        construction = %construction.name,
        id = %construction.id,
        kind = construction.construction_type.as_str(),
        "compiled construction"
    );

    Ok(CompiledConstruction {
        name: Arc::from(construction.name.as_str()),
        construction: construction.clone(),
        flat,
        components,
        tree,
        constraints,
        lookahead,
    })
}

fn validate_fields(construction: &Construction) -> Result<()> {
    let name_len = construction.name.chars().count();
    if !(3..=100).contains(&name_len) {
        return Err(Error::validation(
            None,
            format!("name must be 3-100 characters, found {name_len}"),
        ));
    }
    if !Construction::PRIORITY_RANGE.contains(&construction.priority) {
        return Err(Error::validation(
            None,
            format!("priority must be in 1-199, found {}", construction.priority),
        ));
    }
    if construction.lookahead_max_distance > Construction::MAX_LOOKAHEAD {
        return Err(Error::validation(
            None,
            format!(
                "lookahead distance must be at most {}, found {}",
                Construction::MAX_LOOKAHEAD,
                construction.lookahead_max_distance
            ),
        ));
    }
    for label in construction.exposed_labels() {
        let len = label.chars().count();
        if len == 0 || len > Construction::MAX_LABEL_LEN {
            return Err(Error::validation(
                None,
                format!(
                    "CE label {label:?} must be 1-{} characters",
                    Construction::MAX_LABEL_LEN
                ),
            ));
        }
    }
    Ok(())
}

/// Re-checks a typed component list; lists built in code skip the JSON gate.
fn check_components(components: &[MweComponent], vocabulary: &Vocabulary) -> Result<()> {
    if components.len() < 2 {
        return Err(Error::validation(
            None,
            format!(
                "component list must have at least 2 entries, found {}",
                components.len()
            ),
        ));
    }
    let simple = matches!(components[0], MweComponent::Simple(_));
    for (index, component) in components.iter().enumerate() {
        if matches!(component, MweComponent::Simple(_)) != simple {
            return Err(Error::validation(
                Some(index),
                "list mixes simple and extended formats",
            ));
        }
        match component {
            MweComponent::Simple(v) | MweComponent::Word(v) | MweComponent::Lemma(v)
                if v.trim().is_empty() =>
            {
                return Err(Error::validation(Some(index), "value must be a non-empty string"));
            }
            MweComponent::Ce(label) if !vocabulary.is_ce_label(label) => {
                return Err(Error::validation(
                    Some(index),
                    format!("{label:?} is not a known CE label"),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

// =============================================================================
// Compile Cache
// =============================================================================

/// Compiled constructions keyed by `(id, fingerprint)`.
///
/// The fingerprint covers every compile-relevant construction field and the
/// CE labels of the vocabulary, so any edit misses the cache.
#[derive(Debug, Default)]
pub struct CompileCache {
    entries: HashMap<(ConstructionId, u64), Arc<CompiledConstruction>>,
    hits: u64,
    misses: u64,
}

impl CompileCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached compilation or compiles and stores it.
    ///
    /// # Errors
    /// Propagates compile errors; failures are not cached.
    pub fn get_or_compile(
        &mut self,
        construction: &Construction,
        vocabulary: &Vocabulary,
    ) -> Result<Arc<CompiledConstruction>> {
        let key = (construction.id, fingerprint(construction, vocabulary));
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            debug!(construction = %construction.name, "compile cache hit");
            return Ok(Arc::clone(hit));
        }
        self.misses += 1;
        debug!(construction = %construction.name, "compile cache miss");
        let compiled = Arc::new(compile(construction, vocabulary)?);
        self.entries.insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Drops every entry whose key is not in `live`.
    pub fn retain(&mut self, live: &HashSet<(ConstructionId, u64)>) {
        self.entries.retain(|key, _| live.contains(key));
    }

    /// Number of cached compilations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

/// Cache fingerprint of a construction compiled against a vocabulary.
#[must_use]
pub fn fingerprint(construction: &Construction, vocabulary: &Vocabulary) -> u64 {
    let mut hasher = DefaultHasher::new();
    construction.fingerprint().hash(&mut hasher);
    for label in vocabulary.ce_labels() {
        label.hash(&mut hasher);
    }
    hasher.finish()
}

// =============================================================================
// Registry
// =============================================================================

/// A compiled construction with its declaration order in the graph.
#[derive(Clone, Debug)]
pub struct RegisteredConstruction {
    /// The compiled construction, shared with the compile cache.
    pub compiled: Arc<CompiledConstruction>,
    /// Index of the construction in its graph.
    pub order: usize,
}

/// Every enabled construction of a graph, compiled and grouped by level.
#[derive(Clone, Debug)]
pub struct ConstructionRegistry {
    graph_id: GrammarId,
    vocabulary: Vocabulary,
    levels: [Vec<RegisteredConstruction>; 4],
}

impl ConstructionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            graph_id: GrammarId(0),
            vocabulary: Vocabulary::new(),
            levels: Default::default(),
        }
    }

    /// Compiles every enabled construction of `graph`.
    ///
    /// # Errors
    /// Fails on the first construction that does not compile.
    pub fn build(graph: &GrammarGraph, base: &Vocabulary, cache: &mut CompileCache) -> Result<Self> {
        let vocabulary = graph.vocabulary(base);
        let mut levels: [Vec<RegisteredConstruction>; 4] = Default::default();
        let mut live = HashSet::new();

        for (order, construction) in graph.iter().enumerate() {
            if !construction.enabled {
                continue;
            }
            live.insert((construction.id, fingerprint(construction, &vocabulary)));
            let compiled = cache.get_or_compile(construction, &vocabulary)?;
            levels[level_index(construction.construction_type)]
                .push(RegisteredConstruction { compiled, order });
        }

        for level in &mut levels {
            level.sort_by(|a, b| {
                b.compiled
                    .priority()
                    .cmp(&a.compiled.priority())
                    .then(a.order.cmp(&b.order))
            });
        }
        cache.retain(&live);

        let registry = Self {
            graph_id: graph.id,
            vocabulary,
            levels,
        };
        debug!(
            graph = %graph.name,
            constructions = registry.len(),
            "built construction registry"
        );
        Ok(registry)
    }

    /// The graph this registry was built from.
    #[must_use]
    pub fn graph_id(&self) -> GrammarId {
        self.graph_id
    }

    /// The vocabulary patterns were compiled against.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Constructions of one level, highest priority first.
    #[must_use]
    pub fn level(&self, construction_type: ConstructionType) -> &[RegisteredConstruction] {
        &self.levels[level_index(construction_type)]
    }

    /// Looks up a registered construction by id.
    #[must_use]
    pub fn get(&self, id: ConstructionId) -> Option<&RegisteredConstruction> {
        self.levels
            .iter()
            .flatten()
            .find(|entry| entry.compiled.id() == id)
    }

    /// Number of registered constructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Returns true if no construction is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }
}

impl Default for ConstructionRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

fn level_index(construction_type: ConstructionType) -> usize {
    match construction_type {
        ConstructionType::Mwe => 0,
        ConstructionType::Phrasal => 1,
        ConstructionType::Clausal => 2,
        ConstructionType::Sentential => 3,
    }
}

/// Shared, atomically swappable registry.
#[derive(Debug, Default)]
pub struct RegistryHandle {
    current: RwLock<Arc<ConstructionRegistry>>,
}

impl RegistryHandle {
    /// Wraps a registry.
    #[must_use]
    pub fn new(registry: ConstructionRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    /// The registry in effect now. Callers keep using their snapshot even
    /// if a swap happens meanwhile.
    #[must_use]
    pub fn current(&self) -> Arc<ConstructionRegistry> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Installs `registry` and returns the one it replaced.
    pub fn swap(&self, registry: ConstructionRegistry) -> Arc<ConstructionRegistry> {
        let next = Arc::new(registry);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        debug!(constructions = next.len(), "registry swapped");
        std::mem::replace(&mut *guard, next)
    }
}
