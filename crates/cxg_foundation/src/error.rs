//! Error types for the cxg system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for cxg operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a validation error for a component list entry or a field.
    #[must_use]
    pub fn validation(index: Option<usize>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation {
            index,
            message: message.into(),
        })
    }

    /// Creates a pattern syntax error at a byte offset.
    #[must_use]
    pub fn pattern_syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PatternSyntax {
            offset,
            message: message.into(),
        })
    }

    /// Creates a constraint declaration error.
    #[must_use]
    pub fn constraint_declaration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConstraintDeclaration(message.into()))
    }

    /// Creates a match timeout error.
    #[must_use]
    pub fn match_timeout(budget: usize, construction: Option<String>) -> Self {
        Self::new(ErrorKind::MatchTimeout {
            budget,
            construction,
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns the short kind name used in reports (e.g. `PatternSyntaxError`).
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Categorized error kinds.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed MWE component list or out-of-range construction field.
    #[error("validation error{}: {message}", index.map(|i| format!(" at index {i}")).unwrap_or_default())]
    Validation {
        /// Offending component index, if the error concerns a list entry.
        index: Option<usize>,
        /// The rule that was broken.
        message: String,
    },

    /// Malformed pattern string.
    #[error("pattern syntax error at offset {offset}: {message}")]
    PatternSyntax {
        /// Byte offset into the pattern source.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// A constraint references an unknown feature, role, or vocabulary entry.
    #[error("constraint declaration error: {0}")]
    ConstraintDeclaration(String),

    /// The per-attempt step budget was exhausted.
    #[error("match timeout: step budget of {budget} exceeded{}", construction.as_ref().map(|c| format!(" in construction {c}")).unwrap_or_default())]
    MatchTimeout {
        /// The configured step budget.
        budget: usize,
        /// The construction being matched, when known.
        construction: Option<String>,
    },

    /// Malformed import file (not a row-level error).
    #[error("import error: {0}")]
    Import(String),

    /// Malformed UD parse input.
    #[error("UD parse error at line {line}: {message}")]
    UdParse {
        /// Line number (1-indexed).
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns the short kind name used in reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::PatternSyntax { .. } => "PatternSyntaxError",
            Self::ConstraintDeclaration(_) => "ConstraintDeclarationError",
            Self::MatchTimeout { .. } => "MatchTimeout",
            Self::Import(_) => "ImportError",
            Self::UdParse { .. } => "UdParseError",
            Self::IoError(_) => "IoError",
            Self::SerializationError(_) => "SerializationError",
            Self::Internal(_) => "InternalError",
        }
    }
}

/// Result type alias for cxg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Context about where an error occurred.
#[derive(Clone, Debug, Default)]
pub struct ErrorContext {
    /// Construction name, file, or other source label.
    pub source: Option<String>,
    /// Import row (1-indexed).
    pub row: Option<usize>,
    /// Stack of enclosing operations.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source label.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the import row.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if let Some(row) = self.row {
            write!(f, " (row {row})")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
