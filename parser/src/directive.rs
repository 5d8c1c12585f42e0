//! Directive arguments, the handler traits behind `@source` and other
//! directives, and the argument validators handlers share.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rulelog_core::model::iris::XSD_INTEGER;
use rulelog_core::{Constant, DataSource, PrefixDeclarations, Statement, Term};
use url::Url;

use crate::config::ParserConfiguration;
use crate::error::{ErrorKind, ParsingError};
use crate::grammar;

/// One argument of a directive or of a data-source call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveArgument {
    /// `<iri>`, resolved against the base when one is declared.
    Iri(String),
    /// A plain quoted string, unescaped.
    String(String),
    /// Any other term: a name, a number, a typed or tagged literal.
    Term(Term),
}

impl fmt::Display for DirectiveArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveArgument::Iri(iri) => write!(f, "<{iri}>"),
            DirectiveArgument::String(s) => write!(f, "\"{s}\""),
            DirectiveArgument::Term(t) => write!(f, "{t}"),
        }
    }
}

/// Builds the data source of an `@source pred(n) : name(args) .` declaration.
pub trait DataSourceDeclarationHandler: Send + Sync {
    /// Creates the source from the call's arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if the arguments have the wrong count or
    /// shape, or the source cannot be described.
    fn handle(
        &self,
        arguments: &[DirectiveArgument],
        context: &ParserContext<'_>,
    ) -> Result<Arc<dyn DataSource>, ParsingError>;
}

/// Handles a directive `@name args .` that is not one of the built-in
/// `@base`, `@prefix` and `@source`.
pub trait DirectiveHandler: Send + Sync {
    /// Runs the directive; returns the statements it contributes.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if the arguments are invalid or the
    /// directive fails.
    fn handle(
        &self,
        arguments: &[DirectiveArgument],
        context: &mut ParserContext<'_>,
    ) -> Result<Vec<Statement>, ParsingError>;
}

/// The state a document is parsed in; handed to handlers.
#[derive(Debug)]
pub struct ParserContext<'c> {
    configuration: &'c ParserConfiguration,
    prefixes: PrefixDeclarations,
    directory: Option<PathBuf>,
    imports: Vec<PathBuf>,
}

impl<'c> ParserContext<'c> {
    /// A context for a top-level document, resolving imports against the
    /// configured import directory.
    #[must_use]
    pub fn new(configuration: &'c ParserConfiguration) -> Self {
        Self {
            configuration,
            prefixes: PrefixDeclarations::new(),
            directory: configuration.import_directory().map(Path::to_path_buf),
            imports: Vec::new(),
        }
    }

    /// The configuration in effect.
    #[must_use]
    pub fn configuration(&self) -> &'c ParserConfiguration {
        self.configuration
    }

    /// Prefixes and base declared so far.
    #[must_use]
    pub fn prefixes(&self) -> &PrefixDeclarations {
        &self.prefixes
    }

    /// Mutable access to the declarations, for directives that declare.
    pub fn prefixes_mut(&mut self) -> &mut PrefixDeclarations {
        &mut self.prefixes
    }

    pub(crate) fn into_prefixes(self) -> PrefixDeclarations {
        self.prefixes
    }

    /// Directory relative paths are resolved against: the importing file's
    /// directory, or the configured import directory.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Resolves `path` against [`Self::directory`].
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.directory {
            Some(directory) if path.is_relative() => directory.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Parses the file at `path` and returns its statements.
    ///
    /// With `share_prefixes` the file sees and extends this context's
    /// prefixes and base; otherwise it starts from none and its declarations
    /// stay local to it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Io`] if the file cannot be read,
    /// [`ErrorKind::ImportCycle`] if it is already being imported, and
    /// [`ErrorKind::InImport`] wrapping any failure inside it.
    pub fn import_file(
        &mut self,
        path: &Path,
        share_prefixes: bool,
    ) -> Result<Vec<Statement>, ParsingError> {
        let resolved = self.resolve_path(path);
        let canonical = resolved.canonicalize().map_err(|source| ErrorKind::Io {
            path: resolved.clone(),
            source,
        })?;
        if self.imports.contains(&canonical) {
            return Err(ErrorKind::ImportCycle(canonical).into());
        }
        let text = std::fs::read_to_string(&canonical).map_err(|source| ErrorKind::Io {
            path: canonical.clone(),
            source,
        })?;
        tracing::debug!(path = %canonical.display(), share_prefixes, "importing file");

        let mut imports = self.imports.clone();
        imports.push(canonical.clone());
        let mut child = ParserContext {
            configuration: self.configuration,
            prefixes: if share_prefixes {
                std::mem::take(&mut self.prefixes)
            } else {
                PrefixDeclarations::new()
            },
            directory: canonical.parent().map(Path::to_path_buf),
            imports,
        };
        let result = grammar::parse_document(&text, &mut child);
        if share_prefixes {
            self.prefixes = child.prefixes;
        }
        result.map_err(|source| {
            ErrorKind::InImport {
                path: canonical,
                source: Box::new(source),
            }
            .into()
        })
    }

    /// A context for the top-level file at the canonical path `file`:
    /// relative imports resolve against its directory, and importing it
    /// again is a cycle.
    pub(crate) fn for_file(configuration: &'c ParserConfiguration, file: PathBuf) -> Self {
        Self {
            configuration,
            prefixes: PrefixDeclarations::new(),
            directory: file.parent().map(Path::to_path_buf),
            imports: vec![file],
        }
    }
}

/// Checks the argument count.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidArgument`] if `arguments.len() != expected`.
pub fn validate_number_of_arguments(
    arguments: &[DirectiveArgument],
    expected: usize,
) -> Result<(), ParsingError> {
    if arguments.len() == expected {
        Ok(())
    } else {
        Err(ParsingError::invalid_argument(
            "argument list",
            format!("expected {expected} argument(s), found {}", arguments.len()),
        ))
    }
}

/// Reads a plain string argument.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidArgument`] for any other argument kind.
pub fn validate_string_argument<'a>(
    argument: &'a DirectiveArgument,
    description: &str,
) -> Result<&'a str, ParsingError> {
    match argument {
        DirectiveArgument::String(s) => Ok(s),
        other => Err(ParsingError::invalid_argument(
            description,
            format!("expected a string, found {other}"),
        )),
    }
}

/// Reads an absolute URL given as `<iri>` or as a string.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidArgument`] for other arguments or text that
/// is not an absolute URL.
pub fn validate_url_argument(
    argument: &DirectiveArgument,
    description: &str,
) -> Result<Url, ParsingError> {
    let text = match argument {
        DirectiveArgument::Iri(iri) => iri,
        DirectiveArgument::String(s) => s,
        DirectiveArgument::Term(t) => {
            return Err(ParsingError::invalid_argument(
                description,
                format!("expected an IRI, found {t}"),
            ))
        }
    };
    Url::parse(text)
        .map_err(|e| ParsingError::invalid_argument(description, format!("<{text}>: {e}")))
}

/// Reads a non-negative `xsd:integer`.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidArgument`] for anything else.
pub fn validate_non_negative_integer(
    argument: &DirectiveArgument,
    description: &str,
) -> Result<u64, ParsingError> {
    if let DirectiveArgument::Term(Term::Constant(Constant::DatatypeLiteral {
        lexical,
        datatype,
    })) = argument
    {
        if datatype == XSD_INTEGER {
            return lexical.trim_start_matches('+').parse::<u64>().map_err(|_| {
                ParsingError::invalid_argument(
                    description,
                    format!("expected a non-negative integer, found {lexical}"),
                )
            });
        }
    }
    Err(ParsingError::invalid_argument(
        description,
        format!("expected a non-negative integer, found {argument}"),
    ))
}
