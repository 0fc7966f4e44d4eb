//! The construction data model.
//!
//! A [`GrammarGraph`] owns an ordered collection of [`Construction`]s. The
//! graph is persistent: every edit returns a new graph and leaves the old
//! one untouched, so a registry compiled from an older graph keeps working
//! until it is swapped out.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use im::Vector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vocab::{PosTag, Vocabulary};

/// Grammar graph identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrammarId(pub u32);

/// Construction identifier, unique within its grammar graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstructionId(pub u32);

impl fmt::Display for ConstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The level a construction operates at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConstructionType {
    /// Multi-word expression.
    #[default]
    Mwe,
    /// Phrase-level construction.
    Phrasal,
    /// Clause-level construction.
    Clausal,
    /// Sentence-level construction.
    Sentential,
}

impl ConstructionType {
    /// All levels, lowest first. This is also the matching order.
    pub const LEVELS: [ConstructionType; 4] = [
        ConstructionType::Mwe,
        ConstructionType::Phrasal,
        ConstructionType::Clausal,
        ConstructionType::Sentential,
    ];

    /// Returns the lowercase name used in grammar files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mwe => "mwe",
            Self::Phrasal => "phrasal",
            Self::Clausal => "clausal",
            Self::Sentential => "sentential",
        }
    }

    /// Parses a lowercase type name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::LEVELS.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for ConstructionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an MWE component list, after validation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MweComponent {
    /// Simple format: a bare word form.
    Simple(String),
    /// `W`: word form.
    Word(String),
    /// `L`: lemma.
    Lemma(String),
    /// `P`: POS tag.
    Pos(PosTag),
    /// `C`: construction-element label.
    Ce(String),
    /// `*`: any single token.
    Wildcard,
}

/// One node of a dependency sub-pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PatternNode {
    /// Position of the node within its pattern.
    pub position: usize,
    /// Required lemma.
    pub lemma: Option<String>,
    /// Required word form.
    pub word: Option<String>,
    /// Required POS tag.
    pub pos: Option<PosTag>,
    /// Exactly one node per dependency pattern is the root.
    pub is_root: bool,
    /// Optional nodes may go unbound without failing the match.
    pub is_required: bool,
}

impl Default for PatternNode {
    fn default() -> Self {
        Self {
            position: 0,
            lemma: None,
            word: None,
            pos: None,
            is_root: false,
            is_required: true,
        }
    }
}

impl PatternNode {
    /// Creates a required, non-root node at `position`.
    #[must_use]
    pub fn new(position: usize) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Marks this node as the root.
    #[must_use]
    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    /// Marks this node as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    /// Requires a POS tag.
    #[must_use]
    pub fn with_pos(mut self, pos: PosTag) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Requires a lemma.
    #[must_use]
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    /// Requires a word form.
    #[must_use]
    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }
}

/// A head → dependent expectation between two nodes (indices into the node list).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternEdge {
    /// Head node index.
    pub head: usize,
    /// Dependent node index.
    pub dependent: usize,
    /// Required dependency relation label.
    pub relation: String,
}

impl PatternEdge {
    /// Creates an edge.
    #[must_use]
    pub fn new(head: usize, dependent: usize, relation: impl Into<String>) -> Self {
        Self {
            head,
            dependent,
            relation: relation.into(),
        }
    }
}

/// A dependency sub-pattern as authored (nodes and edges).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DependencyPattern {
    /// Pattern nodes.
    pub nodes: Vec<PatternNode>,
    /// Pattern edges.
    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Vec<PatternEdge>,
}

/// A role a constraint can refer to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    /// The tokens consumed by the i-th top-level step of the flat pattern.
    Step(usize),
    /// The token bound to the i-th dependency node.
    Node(usize),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(i) => write!(f, "step {i}"),
            Self::Node(i) => write!(f, "node {i}"),
        }
    }
}

/// A constraint as declared on a construction.
///
/// Names are kept as strings so that unknown features or tags are
/// reported when the construction is compiled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ConstraintDecl {
    /// Bound tokens carrying any of `features` must agree on their values.
    Agreement {
        /// Feature names.
        features: Vec<String>,
        /// Roles to check; empty means every bound token.
        #[cfg_attr(feature = "serde", serde(default))]
        targets: Vec<Role>,
    },
    /// The first tokens of two roles are at most `max` tokens apart.
    MaxDistance {
        /// First role.
        from: Role,
        /// Second role.
        to: Role,
        /// Maximum token distance.
        max: usize,
    },
    /// Every token bound to `target` has this POS tag.
    RequirePos {
        /// Constrained role.
        target: Role,
        /// POS tag name.
        pos: String,
    },
    /// Every token bound to `target` carries `feature=value`.
    RequireFeature {
        /// Constrained role.
        target: Role,
        /// Feature name.
        feature: String,
        /// Required value.
        value: String,
    },
}

/// A construction definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Construction {
    /// Identifier assigned by the owning graph.
    pub id: ConstructionId,
    /// Display name (3–100 chars).
    pub name: String,
    /// Level this construction operates at.
    #[cfg_attr(feature = "serde", serde(alias = "type"))]
    pub construction_type: ConstructionType,
    /// Surface pattern source.
    pub pattern: String,
    /// Priority (1–199, higher wins).
    pub priority: i32,
    /// Disabled constructions are never compiled.
    pub enabled: bool,
    /// CE label at the phrasal level.
    pub phrasal_ce: Option<String>,
    /// CE label at the clausal level.
    pub clausal_ce: Option<String>,
    /// CE label at the sentential level.
    pub sentential_ce: Option<String>,
    /// Declared constraints.
    pub constraints: Vec<ConstraintDecl>,
    /// Label of the synthetic aggregate span.
    pub aggregate_as: Option<String>,
    /// Opaque semantic type annotation.
    pub semantic_type: Option<String>,
    /// Opaque semantics annotation.
    pub semantics: Option<String>,
    /// Whether lookahead confirmation/invalidation applies.
    pub lookahead_enabled: bool,
    /// Lookahead window in tokens (0–10).
    pub lookahead_max_distance: usize,
    /// Patterns that drop a match when found in the window.
    pub invalidation_patterns: Vec<String>,
    /// Patterns that confirm a match when found in the window.
    pub confirmation_patterns: Vec<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Sample sentences.
    pub examples: Vec<String>,
    /// Validated MWE component list.
    pub components: Option<Vec<MweComponent>>,
    /// Dependency sub-pattern.
    pub dependency: Option<DependencyPattern>,
}

impl Default for Construction {
    fn default() -> Self {
        Self {
            id: ConstructionId::default(),
            name: String::new(),
            construction_type: ConstructionType::Mwe,
            pattern: String::new(),
            priority: Self::DEFAULT_PRIORITY,
            enabled: true,
            phrasal_ce: None,
            clausal_ce: None,
            sentential_ce: None,
            constraints: Vec::new(),
            aggregate_as: None,
            semantic_type: None,
            semantics: None,
            lookahead_enabled: false,
            lookahead_max_distance: 0,
            invalidation_patterns: Vec::new(),
            confirmation_patterns: Vec::new(),
            description: None,
            examples: Vec::new(),
            components: None,
            dependency: None,
        }
    }
}

impl Construction {
    /// Default priority.
    pub const DEFAULT_PRIORITY: i32 = 50;
    /// Allowed priority range.
    pub const PRIORITY_RANGE: std::ops::RangeInclusive<i32> = 1..=199;
    /// Maximum lookahead window.
    pub const MAX_LOOKAHEAD: usize = 10;
    /// Maximum CE label length.
    pub const MAX_LABEL_LEN: usize = 100;

    /// Creates an enabled construction with default priority.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        construction_type: ConstructionType,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            construction_type,
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Adds a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: ConstraintDecl) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Enables lookahead with the given window.
    #[must_use]
    pub fn with_lookahead(mut self, max_distance: usize) -> Self {
        self.lookahead_enabled = true;
        self.lookahead_max_distance = max_distance;
        self
    }

    /// Adds an invalidation pattern.
    #[must_use]
    pub fn with_invalidation(mut self, pattern: impl Into<String>) -> Self {
        self.invalidation_patterns.push(pattern.into());
        self
    }

    /// Adds a confirmation pattern.
    #[must_use]
    pub fn with_confirmation(mut self, pattern: impl Into<String>) -> Self {
        self.confirmation_patterns.push(pattern.into());
        self
    }

    /// Sets the phrasal CE label.
    #[must_use]
    pub fn with_phrasal_ce(mut self, label: impl Into<String>) -> Self {
        self.phrasal_ce = Some(label.into());
        self
    }

    /// Sets the clausal CE label.
    #[must_use]
    pub fn with_clausal_ce(mut self, label: impl Into<String>) -> Self {
        self.clausal_ce = Some(label.into());
        self
    }

    /// Sets the sentential CE label.
    #[must_use]
    pub fn with_sentential_ce(mut self, label: impl Into<String>) -> Self {
        self.sentential_ce = Some(label.into());
        self
    }

    /// Sets the aggregate label.
    #[must_use]
    pub fn with_aggregate_as(mut self, label: impl Into<String>) -> Self {
        self.aggregate_as = Some(label.into());
        self
    }

    /// Sets the semantic annotations.
    #[must_use]
    pub fn with_semantics(
        mut self,
        semantic_type: impl Into<String>,
        semantics: Option<String>,
    ) -> Self {
        self.semantic_type = Some(semantic_type.into());
        self.semantics = semantics;
        self
    }

    /// Sets the MWE component list.
    #[must_use]
    pub fn with_components(mut self, components: Vec<MweComponent>) -> Self {
        self.components = Some(components);
        self
    }

    /// Sets the dependency sub-pattern.
    #[must_use]
    pub fn with_dependency(mut self, dependency: DependencyPattern) -> Self {
        self.dependency = Some(dependency);
        self
    }

    /// The CE label this construction's own span carries.
    ///
    /// MWEs have no level of their own to label, so they use the phrasal label.
    #[must_use]
    pub fn ce_label(&self) -> Option<&str> {
        match self.construction_type {
            ConstructionType::Mwe | ConstructionType::Phrasal => self.phrasal_ce.as_deref(),
            ConstructionType::Clausal => self.clausal_ce.as_deref(),
            ConstructionType::Sentential => self.sentential_ce.as_deref(),
        }
    }

    /// Every label under which an accepted span of this construction is
    /// visible to higher-level patterns.
    pub fn exposed_labels(&self) -> impl Iterator<Item = &str> {
        [
            self.phrasal_ce.as_deref(),
            self.clausal_ce.as_deref(),
            self.sentential_ce.as_deref(),
            self.aggregate_as.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    /// Hash of every field that affects compilation.
    ///
    /// Any edit to the pattern, components, dependency pattern, constraints,
    /// lookahead settings, or labels changes the fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.name.hash(&mut hasher);
        self.construction_type.hash(&mut hasher);
        self.pattern.hash(&mut hasher);
        self.priority.hash(&mut hasher);
        self.phrasal_ce.hash(&mut hasher);
        self.clausal_ce.hash(&mut hasher);
        self.sentential_ce.hash(&mut hasher);
        self.aggregate_as.hash(&mut hasher);
        self.constraints.hash(&mut hasher);
        self.lookahead_enabled.hash(&mut hasher);
        self.lookahead_max_distance.hash(&mut hasher);
        self.invalidation_patterns.hash(&mut hasher);
        self.confirmation_patterns.hash(&mut hasher);
        self.components.hash(&mut hasher);
        self.dependency.hash(&mut hasher);
        self.semantic_type.hash(&mut hasher);
        self.semantics.hash(&mut hasher);
        hasher.finish()
    }
}

/// A named collection of constructions sharing one matching namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrammarGraph {
    /// Graph identifier.
    pub id: GrammarId,
    /// Graph name.
    pub name: String,
    constructions: Vector<Construction>,
    next_id: u32,
}

impl GrammarGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new(id: GrammarId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            constructions: Vector::new(),
            next_id: 1,
        }
    }

    /// Adds a construction, assigning it a fresh id.
    #[must_use]
    pub fn add(&self, mut construction: Construction) -> (Self, ConstructionId) {
        let id = ConstructionId(self.next_id);
        construction.id = id;
        let mut graph = self.clone();
        graph.constructions.push_back(construction);
        graph.next_id += 1;
        (graph, id)
    }

    /// Replaces the construction with the same id, keeping its declaration slot.
    ///
    /// # Errors
    /// Returns an error if no construction has that id.
    pub fn replace(&self, construction: Construction) -> Result<Self> {
        let index = self
            .position(construction.id)
            .ok_or_else(|| Error::internal(format!("no construction {}", construction.id)))?;
        let mut graph = self.clone();
        graph.constructions.set(index, construction);
        Ok(graph)
    }

    /// Enables or disables a construction.
    ///
    /// # Errors
    /// Returns an error if no construction has that id.
    pub fn set_enabled(&self, id: ConstructionId, enabled: bool) -> Result<Self> {
        let mut construction = self
            .get(id)
            .cloned()
            .ok_or_else(|| Error::internal(format!("no construction {id}")))?;
        construction.enabled = enabled;
        self.replace(construction)
    }

    /// Removes a construction.
    #[must_use]
    pub fn remove(&self, id: ConstructionId) -> Self {
        let mut graph = self.clone();
        graph.constructions.retain(|c| c.id != id);
        graph
    }

    /// Looks up a construction by id.
    #[must_use]
    pub fn get(&self, id: ConstructionId) -> Option<&Construction> {
        self.constructions.iter().find(|c| c.id == id)
    }

    /// Looks up a construction by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Construction> {
        self.constructions.iter().find(|c| c.name == name)
    }

    /// Declaration order of a construction (its index in the graph).
    #[must_use]
    pub fn position(&self, id: ConstructionId) -> Option<usize> {
        self.constructions.iter().position(|c| c.id == id)
    }

    /// Iterates constructions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Construction> {
        self.constructions.iter()
    }

    /// Number of constructions (enabled or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructions.len()
    }

    /// Returns true if the graph has no constructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructions.is_empty()
    }

    /// The vocabulary patterns of this graph compile against: `base` plus
    /// every CE or aggregate label the graph's constructions declare.
    #[must_use]
    pub fn vocabulary(&self, base: &Vocabulary) -> Vocabulary {
        self.constructions
            .iter()
            .flat_map(Construction::exposed_labels)
            .fold(base.clone(), |vocab, label| vocab.with_ce_label(label))
    }
}
