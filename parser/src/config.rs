//! The handler registries a [`RuleParser`](crate::RuleParser) dispatches to.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rulelog_core::datasource::{
    CSV_FILE_DATA_SOURCE, RDF_FILE_DATA_SOURCE, SPARQL_QUERY_RESULT_DATA_SOURCE,
};

use crate::directive::{DataSourceDeclarationHandler, DirectiveHandler};
use crate::error::{ErrorKind, ParsingError};
use crate::handlers::{
    CsvFileDataSourceDeclarationHandler, ImportFileDirectiveHandler,
    ImportFileRelativeDirectiveHandler, RdfFileDataSourceDeclarationHandler,
    SparqlQueryResultDataSourceDeclarationHandler, IMPORT_DIRECTIVE, IMPORT_RELATIVE_DIRECTIVE,
};

/// Directive names the grammar handles itself.
pub const RESERVED_DIRECTIVES: &[&str] = &["base", "prefix", "source"];

/// Data-source and directive handlers plus the import directory.
///
/// [`Default`] registers `load-csv`, `load-rdf`, `sparql`, `@import` and
/// `@import-relative`; [`ParserConfiguration::empty`] registers nothing.
#[derive(Clone)]
pub struct ParserConfiguration {
    data_sources: HashMap<String, Arc<dyn DataSourceDeclarationHandler>>,
    directives: HashMap<String, Arc<dyn DirectiveHandler>>,
    import_directory: Option<PathBuf>,
}

impl ParserConfiguration {
    /// A configuration without handlers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data_sources: HashMap::new(),
            directives: HashMap::new(),
            import_directory: None,
        }
    }

    /// Registers the handler for `@source p(n) : name(...) .`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::HandlerAlreadyRegistered`] if `name` is taken.
    pub fn register_data_source(
        &mut self,
        name: impl Into<String>,
        handler: impl DataSourceDeclarationHandler + 'static,
    ) -> Result<&mut Self, ParsingError> {
        let name = name.into();
        if self.data_sources.contains_key(&name) {
            return Err(ErrorKind::HandlerAlreadyRegistered(name).into());
        }
        tracing::trace!(%name, "data source handler registered");
        self.data_sources.insert(name, Arc::new(handler));
        Ok(self)
    }

    /// Registers the handler for `@name ... .`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::HandlerAlreadyRegistered`] if `name` is taken or
    /// is one of [`RESERVED_DIRECTIVES`].
    pub fn register_directive(
        &mut self,
        name: impl Into<String>,
        handler: impl DirectiveHandler + 'static,
    ) -> Result<&mut Self, ParsingError> {
        let name = name.into();
        if RESERVED_DIRECTIVES.contains(&name.as_str()) || self.directives.contains_key(&name) {
            return Err(ErrorKind::HandlerAlreadyRegistered(name).into());
        }
        tracing::trace!(%name, "directive handler registered");
        self.directives.insert(name, Arc::new(handler));
        Ok(self)
    }

    /// Sets the directory relative import paths of top-level documents are
    /// resolved against. Without it they resolve against the working
    /// directory.
    #[must_use]
    pub fn with_import_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.import_directory = Some(directory.into());
        self
    }

    /// The configured import directory.
    #[must_use]
    pub fn import_directory(&self) -> Option<&Path> {
        self.import_directory.as_deref()
    }

    /// The data-source handler registered under `name`.
    #[must_use]
    pub fn data_source_handler(&self, name: &str) -> Option<&dyn DataSourceDeclarationHandler> {
        self.data_sources.get(name).map(AsRef::as_ref)
    }

    /// The directive handler registered under `name`.
    #[must_use]
    pub fn directive_handler(&self, name: &str) -> Option<Arc<dyn DirectiveHandler>> {
        self.directives.get(name).cloned()
    }

    /// Names of the registered data-source handlers, sorted.
    #[must_use]
    pub fn data_source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.data_sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names of the registered directive handlers, sorted.
    #[must_use]
    pub fn directive_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.directives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ParserConfiguration {
    fn default() -> Self {
        let mut data_sources: HashMap<String, Arc<dyn DataSourceDeclarationHandler>> =
            HashMap::new();
        data_sources.insert(
            CSV_FILE_DATA_SOURCE.to_owned(),
            Arc::new(CsvFileDataSourceDeclarationHandler),
        );
        data_sources.insert(
            RDF_FILE_DATA_SOURCE.to_owned(),
            Arc::new(RdfFileDataSourceDeclarationHandler),
        );
        data_sources.insert(
            SPARQL_QUERY_RESULT_DATA_SOURCE.to_owned(),
            Arc::new(SparqlQueryResultDataSourceDeclarationHandler),
        );

        let mut directives: HashMap<String, Arc<dyn DirectiveHandler>> = HashMap::new();
        directives.insert(
            IMPORT_DIRECTIVE.to_owned(),
            Arc::new(ImportFileDirectiveHandler),
        );
        directives.insert(
            IMPORT_RELATIVE_DIRECTIVE.to_owned(),
            Arc::new(ImportFileRelativeDirectiveHandler),
        );

        Self {
            data_sources,
            directives,
            import_directory: None,
        }
    }
}

impl fmt::Debug for ParserConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfiguration")
            .field("data_sources", &self.data_source_names())
            .field("directives", &self.directive_names())
            .field("import_directory", &self.import_directory)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::directive::{DirectiveArgument, ParserContext};
    use rulelog_core::Statement;

    struct Nothing;

    impl DirectiveHandler for Nothing {
        fn handle(
            &self,
            _arguments: &[DirectiveArgument],
            _context: &mut ParserContext<'_>,
        ) -> Result<Vec<Statement>, ParsingError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn defaults() {
        let configuration = ParserConfiguration::default();
        assert_eq!(
            configuration.data_source_names(),
            vec!["load-csv", "load-rdf", "sparql"]
        );
        assert_eq!(
            configuration.directive_names(),
            vec!["import", "import-relative"]
        );
        assert!(ParserConfiguration::empty().data_source_names().is_empty());
    }

    #[test]
    fn duplicate_and_reserved_names_are_refused() {
        let mut configuration = ParserConfiguration::default();
        for name in ["import", "prefix", "base", "source"] {
            assert!(matches!(
                configuration.register_directive(name, Nothing).unwrap_err().kind(),
                ErrorKind::HandlerAlreadyRegistered(n) if n == name
            ));
        }
        assert!(configuration
            .register_data_source("sparql", SparqlQueryResultDataSourceDeclarationHandler)
            .is_err());

        configuration.register_directive("noop", Nothing).unwrap();
        assert!(configuration.directive_handler("noop").is_some());
    }

    #[test]
    fn debug_lists_handler_names() {
        let rendered = format!("{:?}", ParserConfiguration::default());
        assert!(rendered.contains("load-csv"));
        assert!(rendered.contains("import-relative"));
    }
}
