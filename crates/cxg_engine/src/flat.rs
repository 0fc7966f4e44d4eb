//! Flat matching over token sequences.
//!
//! A compiled matcher is run from every start offset with backtracking.
//! Alternatives are tried in declaration order and repetitions are greedy,
//! so the first successful run from a start offset is the candidate for
//! that offset. Runs that consume no tokens are not matches.

use cxg_foundation::{Result, Role, Sentence, Token, TokenSpan};
use cxg_pattern::{CompiledMatcher, Step};

use crate::budget::StepBudget;
use crate::result::{Binding, CeSpans};

/// A raw flat match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatCandidate {
    /// Matched tokens.
    pub span: TokenSpan,
    /// `Role::Step` bindings in token order.
    pub bindings: Vec<Binding>,
}

/// Runs `matcher` from every start offset, one candidate per offset at most.
///
/// The budget is reset before each start offset.
///
/// # Errors
/// Returns `MatchTimeout` if one attempt exhausts the budget.
pub fn match_all(
    matcher: &CompiledMatcher,
    sentence: &Sentence,
    ce: &CeSpans,
    budget: &mut StepBudget<'_>,
) -> Result<Vec<FlatCandidate>> {
    let mut candidates = Vec::new();
    for start in 0..sentence.len() {
        budget.reset();
        if let Some(candidate) = match_at(matcher, sentence, ce, start, budget)? {
            candidates.push(candidate);
        }
    }
    Ok(candidates)
}

/// Runs `matcher` from one start offset.
///
/// # Errors
/// Returns `MatchTimeout` if the attempt exhausts the budget.
pub fn match_at(
    matcher: &CompiledMatcher,
    sentence: &Sentence,
    ce: &CeSpans,
    start: usize,
    budget: &mut StepBudget<'_>,
) -> Result<Option<FlatCandidate>> {
    run_matcher(matcher, sentence, ce, start, None, budget)
}

/// Runs `matcher` over exactly `span`.
///
/// Unlike [`match_at`] this accepts a run shorter than the greedy one, as
/// long as it ends on `span.end`.
///
/// # Errors
/// Returns `MatchTimeout` if the attempt exhausts the budget.
pub fn match_spanning(
    matcher: &CompiledMatcher,
    sentence: &Sentence,
    ce: &CeSpans,
    span: TokenSpan,
    budget: &mut StepBudget<'_>,
) -> Result<Option<FlatCandidate>> {
    run_matcher(matcher, sentence, ce, span.start, Some(span.end + 1), budget)
}

fn run_matcher(
    matcher: &CompiledMatcher,
    sentence: &Sentence,
    ce: &CeSpans,
    start: usize,
    end: Option<usize>,
    budget: &mut StepBudget<'_>,
) -> Result<Option<FlatCandidate>> {
    let mut run = Run {
        sentence,
        ce,
        budget,
        start,
        end,
        trail: Vec::new(),
    };
    let done = Cont::Done;
    let top = Cont::Seq {
        steps: &matcher.steps,
        top: Top::Counting(0),
        next: &done,
    };
    let Some(end) = run.resume(&top, start)? else {
        return Ok(None);
    };

    let mut bindings: Vec<Binding> = run
        .trail
        .into_iter()
        .map(|(token, step)| Binding::new(token, Role::Step(step)))
        .collect();
    bindings.sort();
    Ok(Some(FlatCandidate {
        span: TokenSpan::new(start, end - 1),
        bindings,
    }))
}

/// Top-level step index for bindings made inside a sequence.
#[derive(Copy, Clone, Debug)]
enum Top {
    /// The top-level sequence itself: each step is its own role.
    Counting(usize),
    /// A nested sequence: everything binds to the enclosing top-level step.
    Fixed(usize),
}

impl Top {
    fn current(self) -> usize {
        match self {
            Self::Counting(i) | Self::Fixed(i) => i,
        }
    }

    fn advance(self) -> Self {
        match self {
            Self::Counting(i) => Self::Counting(i + 1),
            fixed @ Self::Fixed(_) => fixed,
        }
    }
}

/// What remains to be matched after the current step.
enum Cont<'c> {
    Done,
    Seq {
        steps: &'c [Step],
        top: Top,
        next: &'c Cont<'c>,
    },
    /// Another iteration of a repetition has just been matched.
    Repeat {
        inner: &'c Step,
        min: usize,
        max: Option<usize>,
        count: usize,
        from: usize,
        top: usize,
        next: &'c Cont<'c>,
    },
}

struct Run<'r, 'b> {
    sentence: &'r Sentence,
    ce: &'r CeSpans,
    budget: &'r mut StepBudget<'b>,
    start: usize,
    /// Required exclusive end, if any.
    end: Option<usize>,
    /// `(token, top-level step)` pairs bound so far.
    trail: Vec<(usize, usize)>,
}

impl Run<'_, '_> {
    /// Continues matching at `pos`; returns the exclusive end on success.
    fn resume(&mut self, cont: &Cont<'_>, pos: usize) -> Result<Option<usize>> {
        match *cont {
            Cont::Done => {
                let complete = pos > self.start && self.end.is_none_or(|end| pos == end);
                Ok(complete.then_some(pos))
            }
            Cont::Seq { steps, top, next } => match steps.split_first() {
                None => self.resume(next, pos),
                Some((first, rest)) => {
                    let frame = Cont::Seq {
                        steps: rest,
                        top: top.advance(),
                        next,
                    };
                    self.step(first, pos, top.current(), &frame)
                }
            },
            Cont::Repeat {
                inner,
                min,
                max,
                count,
                from,
                top,
                next,
            } => {
                // Past `min`, an iteration that consumed nothing would loop forever.
                if pos == from && count > min {
                    return Ok(None);
                }
                self.repeat(inner, min, max, count, pos, top, next)
            }
        }
    }

    fn step(&mut self, step: &Step, pos: usize, top: usize, cont: &Cont<'_>) -> Result<Option<usize>> {
        self.budget.tick()?;
        match step {
            Step::Literal(word) => self.token(pos, top, cont, |t| t.word_is(word)),
            Step::Lemma(lemma) => self.token(pos, top, cont, |t| t.lemma_is(lemma)),
            Step::Pos(pos_tag) => self.token(pos, top, cont, |t| t.pos == *pos_tag),
            Step::Wildcard => self.token(pos, top, cont, |_| true),
            Step::Ce(label) => {
                for end in self.ce.ends(pos, label) {
                    let mark = self.trail.len();
                    self.trail.extend((pos..=end).map(|t| (t, top)));
                    if let Some(done) = self.resume(cont, end + 1)? {
                        return Ok(Some(done));
                    }
                    self.trail.truncate(mark);
                }
                Ok(None)
            }
            Step::Group(alternatives) => {
                for alternative in alternatives {
                    let frame = Cont::Seq {
                        steps: alternative,
                        top: Top::Fixed(top),
                        next: cont,
                    };
                    if let Some(done) = self.resume(&frame, pos)? {
                        return Ok(Some(done));
                    }
                }
                Ok(None)
            }
            Step::Repeat { min, max, inner } => self.repeat(inner, *min, *max, 0, pos, top, cont),
        }
    }

    fn token(
        &mut self,
        pos: usize,
        top: usize,
        cont: &Cont<'_>,
        fits: impl Fn(&Token) -> bool,
    ) -> Result<Option<usize>> {
        let sentence = self.sentence;
        match sentence.token(pos) {
            Some(token) if fits(token) => {}
            _ => return Ok(None),
        }
        self.trail.push((pos, top));
        let done = self.resume(cont, pos + 1)?;
        if done.is_none() {
            self.trail.pop();
        }
        Ok(done)
    }

    #[allow(clippy::too_many_arguments)]
    fn repeat(
        &mut self,
        inner: &Step,
        min: usize,
        max: Option<usize>,
        count: usize,
        pos: usize,
        top: usize,
        cont: &Cont<'_>,
    ) -> Result<Option<usize>> {
        if max.is_none_or(|max| count < max) {
            let frame = Cont::Repeat {
                inner,
                min,
                max,
                count: count + 1,
                from: pos,
                top,
                next: cont,
            };
            if let Some(done) = self.step(inner, pos, top, &frame)? {
                return Ok(Some(done));
            }
        }
        if count >= min {
            return self.resume(cont, pos);
        }
        Ok(None)
    }
}
