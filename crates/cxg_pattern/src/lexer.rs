//! Lexer for the pattern language.
//!
//! The lexer converts a pattern string into a stream of tokens.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Characters that end a bare word.
fn is_delimiter(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | '(' | ')' | '|' | '*' | '+' | '~') || c.is_whitespace()
}

/// Lexer for pattern source.
pub struct Lexer<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, Span::at(start));
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '|' => self.single(TokenKind::Pipe),
            '*' => self.single(TokenKind::Star),
            '+' => self.single(TokenKind::Plus),
            '{' => self.scan_class(),
            '}' => self.single(TokenKind::Error("unmatched '}'".to_string())),
            '~' => {
                self.advance();
                let lemma = self.scan_word();
                if lemma.is_empty() {
                    TokenKind::Error("expected lemma after '~'".to_string())
                } else {
                    TokenKind::Lemma(lemma)
                }
            }
            _ => {
                let word = self.scan_word();
                if word == "_" {
                    TokenKind::Wildcard
                } else {
                    TokenKind::Word(word)
                }
            }
        };

        Token::new(kind, Span::new(start, self.position))
    }

    /// Tokenizes all source and returns a vector of tokens ending in `Eof`.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
        }
    }

    /// Consumes one character and yields `kind`.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans a bare word up to the next delimiter.
    fn scan_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek_char() {
            if is_delimiter(c) {
                break;
            }
            word.push(c);
            self.advance();
        }
        word
    }

    /// Scans a class reference `{NAME}`.
    fn scan_class(&mut self) -> TokenKind {
        self.advance(); // {
        let mut name = String::new();
        loop {
            match self.peek_char() {
                Some('}') => {
                    self.advance();
                    break;
                }
                Some(c) if c.is_alphanumeric() || c == '_' || c == '-' => {
                    name.push(c);
                    self.advance();
                }
                Some(c) => {
                    return TokenKind::Error(format!("unexpected character {c:?} in class name"));
                }
                None => return TokenKind::Error("unbalanced '{'".to_string()),
            }
        }
        if name.is_empty() {
            TokenKind::Error("empty class name".to_string())
        } else {
            TokenKind::Class(name)
        }
    }
}
