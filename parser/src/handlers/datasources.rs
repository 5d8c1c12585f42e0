use std::sync::Arc;

use rulelog_core::datasource::{
    CsvFileDataSource, RdfFileDataSource, SparqlQueryResultDataSource, CSV_FILE_DATA_SOURCE,
    RDF_FILE_DATA_SOURCE, SPARQL_QUERY_RESULT_DATA_SOURCE,
};
use rulelog_core::DataSource;

use crate::directive::{
    validate_number_of_arguments, validate_string_argument, validate_url_argument,
    DataSourceDeclarationHandler, DirectiveArgument, ParserContext,
};
use crate::error::ParsingError;

/// `load-csv("file.csv")`
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFileDataSourceDeclarationHandler;

impl DataSourceDeclarationHandler for CsvFileDataSourceDeclarationHandler {
    fn handle(
        &self,
        arguments: &[DirectiveArgument],
        _context: &ParserContext<'_>,
    ) -> Result<Arc<dyn DataSource>, ParsingError> {
        validate_number_of_arguments(arguments, 1)?;
        let path = validate_string_argument(&arguments[0], "CSV file name")?;
        let source = CsvFileDataSource::new(path)
            .map_err(|e| ParsingError::handler(CSV_FILE_DATA_SOURCE, e))?;
        Ok(Arc::new(source))
    }
}

/// `load-rdf("file.nt")`
#[derive(Debug, Clone, Copy, Default)]
pub struct RdfFileDataSourceDeclarationHandler;

impl DataSourceDeclarationHandler for RdfFileDataSourceDeclarationHandler {
    fn handle(
        &self,
        arguments: &[DirectiveArgument],
        _context: &ParserContext<'_>,
    ) -> Result<Arc<dyn DataSource>, ParsingError> {
        validate_number_of_arguments(arguments, 1)?;
        let path = validate_string_argument(&arguments[0], "RDF file name")?;
        let source = RdfFileDataSource::new(path)
            .map_err(|e| ParsingError::handler(RDF_FILE_DATA_SOURCE, e))?;
        Ok(Arc::new(source))
    }
}

/// `sparql(<endpoint>, "variables", "query fragment")`
#[derive(Debug, Clone, Copy, Default)]
pub struct SparqlQueryResultDataSourceDeclarationHandler;

impl DataSourceDeclarationHandler for SparqlQueryResultDataSourceDeclarationHandler {
    fn handle(
        &self,
        arguments: &[DirectiveArgument],
        _context: &ParserContext<'_>,
    ) -> Result<Arc<dyn DataSource>, ParsingError> {
        validate_number_of_arguments(arguments, 3)?;
        let endpoint = validate_url_argument(&arguments[0], "SPARQL endpoint")?;
        let variables = validate_string_argument(&arguments[1], "variables list")?;
        let query = validate_string_argument(&arguments[2], "query fragment")?;
        let source = SparqlQueryResultDataSource::new(endpoint, variables, query)
            .map_err(|e| ParsingError::handler(SPARQL_QUERY_RESULT_DATA_SOURCE, e))?;
        Ok(Arc::new(source))
    }
}
