use std::path::Path;

use rulelog_core::Statement;

use crate::directive::{
    validate_number_of_arguments, validate_string_argument, DirectiveArgument, DirectiveHandler,
    ParserContext,
};
use crate::error::ParsingError;

/// Keyword of [`ImportFileDirectiveHandler`].
pub const IMPORT_DIRECTIVE: &str = "import";
/// Keyword of [`ImportFileRelativeDirectiveHandler`].
pub const IMPORT_RELATIVE_DIRECTIVE: &str = "import-relative";

/// `@import "file.rls" .` parses the file as a document of its own: it
/// starts without prefixes or base, and its declarations do not leak back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportFileDirectiveHandler;

impl DirectiveHandler for ImportFileDirectiveHandler {
    fn handle(
        &self,
        arguments: &[DirectiveArgument],
        context: &mut ParserContext<'_>,
    ) -> Result<Vec<Statement>, ParsingError> {
        validate_number_of_arguments(arguments, 1)?;
        let file = validate_string_argument(&arguments[0], "rules file")?;
        context.import_file(Path::new(file), false)
    }
}

/// `@import-relative "file.rls" .` parses the file against the importing
/// document's prefixes and base; declarations it makes stay in effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportFileRelativeDirectiveHandler;

impl DirectiveHandler for ImportFileRelativeDirectiveHandler {
    fn handle(
        &self,
        arguments: &[DirectiveArgument],
        context: &mut ParserContext<'_>,
    ) -> Result<Vec<Statement>, ParsingError> {
        validate_number_of_arguments(arguments, 1)?;
        let file = validate_string_argument(&arguments[0], "rules file")?;
        context.import_file(Path::new(file), true)
    }
}
