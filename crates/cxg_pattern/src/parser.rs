//! Parser for the pattern language.
//!
//! The parser converts a stream of tokens into a top-level sequence of
//! [`PatternAst`] nodes. A top-level alternation becomes a single group.

use cxg_foundation::{Error, Result};

use crate::ast::PatternAst;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser for pattern source.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Source text (for the empty-pattern check).
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source,
        }
    }

    /// Parses the whole pattern.
    ///
    /// # Errors
    /// Returns a `PatternSyntax` error carrying the byte offset of the problem.
    pub fn parse(&mut self) -> Result<Vec<PatternAst>> {
        if self.source.trim().is_empty() {
            return Err(Error::pattern_syntax(0, "empty pattern"));
        }

        let start = self.current.span;
        let mut alternatives = self.parse_alternatives()?;

        match &self.current.kind {
            TokenKind::Eof => {}
            TokenKind::RParen => return Err(self.error("unmatched ')'")),
            TokenKind::RBracket => return Err(self.error("unmatched ']'")),
            kind => return Err(self.error(&format!("unexpected {}", kind.name()))),
        }

        if alternatives.len() == 1 {
            return Ok(alternatives.remove(0));
        }
        Ok(vec![PatternAst::Group {
            alternatives,
            optional: false,
            span: start.to(self.current.span),
        }])
    }

    /// Parses `sequence ('|' sequence)*`.
    fn parse_alternatives(&mut self) -> Result<Vec<Vec<PatternAst>>> {
        let mut alternatives = Vec::new();
        loop {
            let sequence = self.parse_sequence()?;
            if sequence.is_empty() {
                return Err(self.error("empty alternative"));
            }
            alternatives.push(sequence);

            if self.current.kind == TokenKind::Pipe {
                self.advance();
            } else {
                return Ok(alternatives);
            }
        }
    }

    /// Parses `repeated+`, stopping at `|`, a closer, or end of input.
    fn parse_sequence(&mut self) -> Result<Vec<PatternAst>> {
        let mut sequence = Vec::new();
        loop {
            match &self.current.kind {
                TokenKind::Star | TokenKind::Plus => {
                    return Err(self.error("repetition operator with no preceding atom"));
                }
                TokenKind::Error(message) => {
                    let message = message.clone();
                    return Err(self.error(&message));
                }
                _ if self.current.starts_atom() => sequence.push(self.parse_repeated()?),
                _ => return Ok(sequence),
            }
        }
    }

    /// Parses `atom ('*' | '+')*`.
    fn parse_repeated(&mut self) -> Result<PatternAst> {
        let mut node = self.parse_atom()?;
        loop {
            let min = match self.current.kind {
                TokenKind::Star => 0,
                TokenKind::Plus => 1,
                _ => return Ok(node),
            };
            let span = node.span().to(self.current.span);
            self.advance();
            node = PatternAst::Repeat {
                inner: Box::new(node),
                min,
                span,
            };
        }
    }

    /// Parses a single atom or bracketed group.
    fn parse_atom(&mut self) -> Result<PatternAst> {
        let span = self.current.span;
        let node = match &self.current.kind {
            TokenKind::Word(w) => PatternAst::Word(w.clone(), span),
            TokenKind::Lemma(l) => PatternAst::Lemma(l.clone(), span),
            TokenKind::Class(c) => PatternAst::Class(c.clone(), span),
            TokenKind::Wildcard => PatternAst::Wildcard(span),
            TokenKind::LParen => return self.parse_group(TokenKind::RParen, false),
            TokenKind::LBracket => return self.parse_group(TokenKind::RBracket, true),
            kind => return Err(self.error(&format!("unexpected {}", kind.name()))),
        };
        self.advance();
        Ok(node)
    }

    /// Parses `( ... )` or `[ ... ]`.
    fn parse_group(&mut self, closer: TokenKind, optional: bool) -> Result<PatternAst> {
        let open = self.current.span;
        let open_name = if optional { "'['" } else { "'('" };
        self.advance();

        let alternatives = self.parse_alternatives()?;

        if self.current.kind == closer {
            let span = open.to(self.current.span);
            self.advance();
            return Ok(PatternAst::Group {
                alternatives,
                optional,
                span,
            });
        }

        match &self.current.kind {
            TokenKind::Eof => Err(self.error_at(
                open,
                &format!("unbalanced {open_name}: missing {}", closer.name()),
            )),
            kind => Err(self.error(&format!(
                "expected {} to close {open_name} at offset {}, found {}",
                closer.name(),
                open.start,
                kind.name()
            ))),
        }
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Creates a syntax error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    /// Creates a syntax error at a specific span.
    #[allow(clippy::unused_self)]
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::pattern_syntax(span.start, message)
    }
}

/// Parses pattern source into its top-level sequence.
///
/// # Errors
/// Returns a `PatternSyntax` error if the source cannot be parsed.
pub fn parse(source: &str) -> Result<Vec<PatternAst>> {
    Parser::new(source).parse()
}
