//! The single error type of the parser.

use std::fmt;
use std::path::PathBuf;

use rulelog_core::{ModelError, PrefixError};

/// Line and column (both 1-based) of the token where parsing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Location {
    /// The location of byte `offset` in `source`.
    #[must_use]
    pub fn of_offset(source: &str, offset: usize) -> Self {
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before, |newline| &before[newline + 1..])
            .chars()
            .count()
            + 1;
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// What went wrong while parsing.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Input that is not a token of the language, e.g. `$X` or an
    /// unterminated string.
    #[error("unrecognized input `{0}`")]
    Lexical(String),

    /// A token that the grammar does not allow here.
    #[error("unexpected `{found}`, expected {expected}")]
    UnexpectedToken {
        /// The offending token text.
        found: String,
        /// Description of what would have been accepted.
        expected: String,
    },

    /// The input ended early.
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(String),

    /// A string or name with an invalid escape, or a malformed number.
    #[error("malformed literal: {0}")]
    MalformedLiteral(String),

    /// A statement that is neither a fact nor a rule, e.g. `p(a), q(b) .`.
    #[error("invalid statement: {0}")]
    InvalidStatement(String),

    /// An undeclared prefix, a missing base, or a conflicting declaration.
    #[error("{0}")]
    Prefix(#[source] PrefixError),

    /// A model invariant was violated: an unsafe rule, a non-ground fact, a
    /// wrong arity.
    #[error("{0}")]
    Model(#[source] ModelError),

    /// A directive or data-source argument of the wrong shape.
    #[error("invalid {description}: {reason}")]
    InvalidArgument {
        /// What the argument stands for, e.g. `SPARQL endpoint`.
        description: String,
        /// Why it was rejected.
        reason: String,
    },

    /// `@source` names a data-source type nobody registered.
    #[error("no data source handler is registered for `{0}`")]
    UnknownDataSource(String),

    /// A directive nobody registered.
    #[error("no directive handler is registered for `@{0}`")]
    UnknownDirective(String),

    /// A handler name was registered twice, or a built-in directive name
    /// was used for a handler.
    #[error("a handler for `{0}` is already registered")]
    HandlerAlreadyRegistered(String),

    /// A handler rejected its input for a reason of its own.
    #[error("{handler}: {message}")]
    Handler {
        /// Name of the failing handler.
        handler: String,
        /// Human-readable cause.
        message: String,
    },

    /// An imported file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A file imports itself, directly or indirectly.
    #[error("import cycle: {} is already being imported", .0.display())]
    ImportCycle(PathBuf),

    /// An imported file failed to parse.
    #[error("in imported file {}: {source}", .path.display())]
    InImport {
        /// The imported file.
        path: PathBuf,
        /// The failure inside it.
        #[source]
        source: Box<ParsingError>,
    },
}

/// A parse failure. Parsing either succeeds completely or yields this error
/// and no statements.
#[derive(Debug)]
pub struct ParsingError {
    kind: ErrorKind,
    location: Option<Location>,
}

impl ParsingError {
    /// An error without location.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// An error at a location.
    #[must_use]
    pub fn at(kind: ErrorKind, location: Location) -> Self {
        Self {
            kind,
            location: Some(location),
        }
    }

    /// Attaches `location` unless the error already has one.
    #[must_use]
    pub fn or_at(mut self, location: Location) -> Self {
        self.location.get_or_insert(location);
        self
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Consumes the error, keeping what went wrong.
    #[must_use]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Where it went wrong, if known.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Shorthand for an [`ErrorKind::InvalidArgument`].
    #[must_use]
    pub fn invalid_argument(description: &str, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument {
            description: description.to_owned(),
            reason: reason.into(),
        })
    }

    /// Shorthand for an [`ErrorKind::Handler`].
    #[must_use]
    pub fn handler(handler: &str, message: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Handler {
            handler: handler.to_owned(),
            message: message.to_string(),
        })
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{location}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ParsingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<ErrorKind> for ParsingError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<ModelError> for ParsingError {
    fn from(error: ModelError) -> Self {
        Self::new(ErrorKind::Model(error))
    }
}

impl From<PrefixError> for ParsingError {
    fn from(error: PrefixError) -> Self {
        Self::new(ErrorKind::Prefix(error))
    }
}
