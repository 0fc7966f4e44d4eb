//! Pattern compiler.
//!
//! Lowers a parsed [`PatternAst`] into a [`CompiledMatcher`], resolving
//! every `{NAME}` class against the grammar's [`Vocabulary`]. Compilation is
//! pure: the same source and vocabulary always yield an identical matcher.

use cxg_foundation::{Error, PosTag, Result, Vocabulary};
use tracing::debug;

use crate::ast::PatternAst;
use crate::parser::parse;
use crate::step::{CompiledMatcher, Step};

/// Compiles pattern source into matchers.
pub struct PatternCompiler<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> PatternCompiler<'v> {
    /// Creates a compiler resolving classes against `vocabulary`.
    #[must_use]
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Parses and compiles a pattern string.
    ///
    /// # Errors
    /// Returns a `PatternSyntax` error with the byte offset of the first problem.
    pub fn compile(&self, source: &str) -> Result<CompiledMatcher> {
        let ast = parse(source)?;
        let steps = self.compile_sequence(&ast)?;
        debug!(pattern = source, steps = steps.len(), "compiled pattern");
        Ok(CompiledMatcher::new(source, steps))
    }

    fn compile_sequence(&self, nodes: &[PatternAst]) -> Result<Vec<Step>> {
        nodes.iter().map(|node| self.compile_node(node)).collect()
    }

    fn compile_node(&self, node: &PatternAst) -> Result<Step> {
        Ok(match node {
            PatternAst::Word(w, _) => Step::Literal(w.to_lowercase()),
            PatternAst::Lemma(l, _) => Step::Lemma(l.to_lowercase()),
            PatternAst::Wildcard(_) => Step::Wildcard,
            PatternAst::Class(name, span) => self.resolve_class(name, span.start)?,
            PatternAst::Group {
                alternatives,
                optional,
                ..
            } => {
                let alternatives = alternatives
                    .iter()
                    .map(|alt| self.compile_sequence(alt))
                    .collect::<Result<Vec<_>>>()?;
                let group = Step::Group(alternatives);
                if *optional {
                    Step::Repeat {
                        min: 0,
                        max: Some(1),
                        inner: Box::new(group),
                    }
                } else {
                    group
                }
            }
            PatternAst::Repeat { inner, min, .. } => Step::Repeat {
                min: *min,
                max: None,
                inner: Box::new(self.compile_node(inner)?),
            },
        })
    }

    fn resolve_class(&self, name: &str, offset: usize) -> Result<Step> {
        if let Some(pos) = PosTag::lookup(name) {
            return Ok(Step::Pos(pos));
        }
        if self.vocabulary.is_ce_label(name) {
            return Ok(Step::Ce(name.to_string()));
        }
        Err(Error::pattern_syntax(
            offset,
            format!("unknown POS class {{{name}}}"),
        ))
    }
}

/// Compiles a pattern string against a vocabulary.
///
/// # Errors
/// Returns a `PatternSyntax` error if the pattern is malformed.
pub fn compile_pattern(source: &str, vocabulary: &Vocabulary) -> Result<CompiledMatcher> {
    PatternCompiler::new(vocabulary).compile(source)
}
