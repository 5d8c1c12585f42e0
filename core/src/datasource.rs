//! Data-source capabilities and the built-in source descriptors.
//!
//! A data source is only a description: it knows how to render the
//! configuration the reasoning engine needs and how to write itself back in
//! the rule language. Reading files or querying endpoints is the engine's job.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::ModelError;
use crate::serializer::rls;

/// Handler name of [`CsvFileDataSource`] in `@source` declarations.
pub const CSV_FILE_DATA_SOURCE: &str = "load-csv";
/// Handler name of [`RdfFileDataSource`] in `@source` declarations.
pub const RDF_FILE_DATA_SOURCE: &str = "load-rdf";
/// Handler name of [`SparqlQueryResultDataSource`] in `@source` declarations.
pub const SPARQL_QUERY_RESULT_DATA_SOURCE: &str = "sparql";

/// First line of every source configuration: `%1$d` is the source index and
/// `%2$s` the engine-side predicate name.
pub const PREDICATE_NAME_CONFIG_LINE: &str = "EDB%1$d_predname=%2$s\n";
/// Key of the source-type parameter.
pub const DATASOURCE_TYPE_CONFIG_PARAM: &str = "EDB%1$d_type";

/// Structural identity for trait objects.
///
/// Blanket-implemented for every `PartialEq + Hash` type, so implementors of
/// [`DataSource`] only need to derive those traits.
pub trait SourceIdentity {
    /// Upcasts to [`Any`] for downcasting in comparisons.
    fn as_any(&self) -> &dyn Any;

    /// Compares with another source of possibly different concrete type.
    fn eq_source(&self, other: &dyn Any) -> bool;

    /// Feeds the concrete type and value into a hasher.
    fn hash_source(&self, state: &mut dyn Hasher);
}

impl<T: Any + PartialEq + Hash> SourceIdentity for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_source(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn hash_source(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

/// A description of where a predicate's tuples come from.
pub trait DataSource: fmt::Debug + Send + Sync + SourceIdentity {
    /// Engine configuration template using the `%1$d`/`%2$s` placeholders of
    /// [`PREDICATE_NAME_CONFIG_LINE`].
    fn to_config_string(&self) -> String;

    /// The rule-language form used after the colon of an `@source`
    /// declaration, e.g. `load-csv("facts.csv")`.
    fn syntactic_form(&self) -> String;

    /// The tuple arity this source produces, if it is fixed.
    fn required_arity(&self) -> Option<usize> {
        None
    }
}

impl PartialEq for dyn DataSource + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.eq_source(other.as_any())
    }
}

impl Eq for dyn DataSource + '_ {}

impl Hash for dyn DataSource + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_source(state);
    }
}

fn check_extension(path: &Path, extensions: &[&str]) -> Result<(), ModelError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if extensions.iter().any(|ext| name.ends_with(ext) && name.len() > ext.len()) {
        Ok(())
    } else {
        Err(ModelError::InvalidArgument(format!(
            "expected a file ending in {}, got {}",
            extensions.join(" or "),
            path.display()
        )))
    }
}

/// Splits a file path into its directory and the file name without the
/// given extension, as the engine's in-memory loader expects.
fn file_config(path: &Path, extensions: &[&str]) -> String {
    let dir = path
        .parent()
        .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = extensions
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name);
    format!(
        "{PREDICATE_NAME_CONFIG_LINE}{DATASOURCE_TYPE_CONFIG_PARAM}=INMEMORY\nEDB%1$d_param0={}\nEDB%1$d_param1={}\n",
        dir.display(),
        stem
    )
}

const CSV_EXTENSIONS: &[&str] = &[".csv.gz", ".csv"];
const RDF_EXTENSIONS: &[&str] = &[".nt.gz", ".nt"];

/// Tuples read from a CSV file, one tuple per row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CsvFileDataSource {
    path: PathBuf,
}

impl CsvFileDataSource {
    /// Describes a `.csv` or `.csv.gz` file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for any other file name.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ModelError> {
        let path = path.into();
        check_extension(&path, CSV_EXTENSIONS)?;
        Ok(Self { path })
    }

    /// The file path as given.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for CsvFileDataSource {
    fn to_config_string(&self) -> String {
        file_config(&self.path, CSV_EXTENSIONS)
    }

    fn syntactic_form(&self) -> String {
        format!(
            "{CSV_FILE_DATA_SOURCE}({})",
            rls::string_literal(&self.path.to_string_lossy())
        )
    }
}

/// Triples read from an N-Triples file; always ternary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfFileDataSource {
    path: PathBuf,
}

impl RdfFileDataSource {
    /// Describes a `.nt` or `.nt.gz` file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] for any other file name.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ModelError> {
        let path = path.into();
        check_extension(&path, RDF_EXTENSIONS)?;
        Ok(Self { path })
    }

    /// The file path as given.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for RdfFileDataSource {
    fn to_config_string(&self) -> String {
        file_config(&self.path, RDF_EXTENSIONS)
    }

    fn syntactic_form(&self) -> String {
        format!(
            "{RDF_FILE_DATA_SOURCE}({})",
            rls::string_literal(&self.path.to_string_lossy())
        )
    }

    fn required_arity(&self) -> Option<usize> {
        Some(3)
    }
}

/// Tuples answering a SPARQL `SELECT` against a remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SparqlQueryResultDataSource {
    endpoint: Url,
    variables: String,
    query: String,
}

impl SparqlQueryResultDataSource {
    /// Describes the query `SELECT variables WHERE { query }`.
    ///
    /// `variables` is a comma-separated list of variable names without `?`;
    /// its length fixes the arity of the source.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if the variable list or the
    /// query body is empty.
    pub fn new(
        endpoint: Url,
        variables: impl Into<String>,
        query: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let variables = variables.into();
        let query = query.into();
        if variables.split(',').any(|v| v.trim().is_empty()) {
            return Err(ModelError::InvalidArgument(format!(
                "malformed SPARQL variable list \"{variables}\""
            )));
        }
        if query.trim().is_empty() {
            return Err(ModelError::InvalidArgument(
                "SPARQL query body must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            endpoint,
            variables,
            query,
        })
    }

    /// The endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The comma-separated variable list.
    #[must_use]
    pub fn variables(&self) -> &str {
        &self.variables
    }

    /// The query body.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl DataSource for SparqlQueryResultDataSource {
    fn to_config_string(&self) -> String {
        format!(
            "{PREDICATE_NAME_CONFIG_LINE}{DATASOURCE_TYPE_CONFIG_PARAM}=SPARQL\nEDB%1$d_param0={}\nEDB%1$d_param1={}\nEDB%1$d_param2={}\n",
            self.endpoint, self.variables, self.query
        )
    }

    fn syntactic_form(&self) -> String {
        format!(
            "{SPARQL_QUERY_RESULT_DATA_SOURCE}(<{}>, {}, {})",
            self.endpoint,
            rls::string_literal(&self.variables),
            rls::string_literal(&self.query)
        )
    }

    fn required_arity(&self) -> Option<usize> {
        Some(self.variables.split(',').count())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::sync::Arc;

    fn hash_of(source: &dyn DataSource) -> u64 {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn file_extensions_are_checked() {
        assert!(CsvFileDataSource::new("data/example.csv").is_ok());
        assert!(CsvFileDataSource::new("data/example.csv.gz").is_ok());
        assert!(CsvFileDataSource::new("data/example.nt").is_err());
        assert!(CsvFileDataSource::new(".csv").is_err());
        assert!(RdfFileDataSource::new("data/example.nt.gz").is_ok());
        assert!(RdfFileDataSource::new("data/example.csv").is_err());
    }

    #[test]
    fn structural_equality_across_trait_objects() {
        let a: Arc<dyn DataSource> = Arc::new(CsvFileDataSource::new("a.csv").unwrap());
        let b: Arc<dyn DataSource> = Arc::new(CsvFileDataSource::new("a.csv").unwrap());
        let c: Arc<dyn DataSource> = Arc::new(CsvFileDataSource::new("c.csv").unwrap());
        assert!(*a == *b);
        assert!(*a != *c);
        assert_eq!(hash_of(a.as_ref()), hash_of(b.as_ref()));
    }

    #[test]
    fn different_source_types_are_never_equal() {
        let csv: Arc<dyn DataSource> = Arc::new(CsvFileDataSource::new("x.csv").unwrap());
        let rdf: Arc<dyn DataSource> = Arc::new(RdfFileDataSource::new("x.nt").unwrap());
        assert!(*csv != *rdf);
    }

    #[test]
    fn csv_config_string() {
        let source = CsvFileDataSource::new("data/input/example.csv.gz").unwrap();
        assert_eq!(
            source.to_config_string(),
            "EDB%1$d_predname=%2$s\nEDB%1$d_type=INMEMORY\nEDB%1$d_param0=data/input\nEDB%1$d_param1=example\n"
        );
        assert_eq!(source.syntactic_form(), "load-csv(\"data/input/example.csv.gz\")");
    }

    #[test]
    fn sparql_source() {
        let source = SparqlQueryResultDataSource::new(
            Url::parse("https://query.wikidata.org/sparql").unwrap(),
            "disease, doid",
            "?disease wdt:P699 ?doid .",
        )
        .unwrap();
        assert_eq!(source.required_arity(), Some(2));
        assert!(source
            .to_config_string()
            .contains("EDB%1$d_type=SPARQL\nEDB%1$d_param0=https://query.wikidata.org/sparql\n"));
        assert_eq!(
            source.syntactic_form(),
            "sparql(<https://query.wikidata.org/sparql>, \"disease, doid\", \"?disease wdt:P699 ?doid .\")"
        );
    }

    #[test]
    fn sparql_rejects_empty_variables() {
        let endpoint = Url::parse("https://example.org/sparql").unwrap();
        assert!(SparqlQueryResultDataSource::new(endpoint.clone(), "", "?x ?y ?z").is_err());
        assert!(SparqlQueryResultDataSource::new(endpoint, "a,,b", "?x ?y ?z").is_err());
    }
}
