//! The handlers [`ParserConfiguration::default`](crate::ParserConfiguration)
//! registers.

mod datasources;
mod import;

pub use datasources::{
    CsvFileDataSourceDeclarationHandler, RdfFileDataSourceDeclarationHandler,
    SparqlQueryResultDataSourceDeclarationHandler,
};
pub use import::{
    ImportFileDirectiveHandler, ImportFileRelativeDirectiveHandler, IMPORT_DIRECTIVE,
    IMPORT_RELATIVE_DIRECTIVE,
};
