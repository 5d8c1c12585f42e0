//! The public entry points.

use std::path::Path;

use rulelog_core::{
    Fact, KnowledgeBase, Literal, LiteralKind, PositiveLiteral, PrefixDeclarations, Rule,
    Statement,
};

use crate::config::ParserConfiguration;
use crate::directive::ParserContext;
use crate::error::{ErrorKind, ParsingError};
use crate::grammar::{self, Parser};

/// The statements of a document together with the prefixes and base it
/// declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Statements in document order, imports expanded in place.
    pub statements: Vec<Statement>,
    /// Declarations of the top-level document (and of files it pulled in
    /// with `@import-relative`).
    pub prefixes: PrefixDeclarations,
}

impl ParsedDocument {
    /// Collects the statements into a fresh knowledge base.
    #[must_use]
    pub fn into_knowledge_base(self) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.add_statements(self.statements);
        kb
    }
}

/// Parses rule-language text. Every call starts without prefixes or base.
///
/// Parsing is all or nothing: on error no statement is produced or added.
#[derive(Debug, Clone, Default)]
pub struct RuleParser {
    configuration: ParserConfiguration,
}

impl RuleParser {
    /// A parser with the default handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser dispatching to `configuration`.
    #[must_use]
    pub fn with_configuration(configuration: ParserConfiguration) -> Self {
        Self { configuration }
    }

    /// The handler registries in use.
    #[must_use]
    pub fn configuration(&self) -> &ParserConfiguration {
        &self.configuration
    }

    /// Mutable access to the registries, e.g. to register a handler.
    pub fn configuration_mut(&mut self) -> &mut ParserConfiguration {
        &mut self.configuration
    }

    /// Parses a document.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParsingError`] in the document.
    pub fn parse_document(&self, text: &str) -> Result<ParsedDocument, ParsingError> {
        let mut context = ParserContext::new(&self.configuration);
        let statements = grammar::parse_document(text, &mut context)?;
        Ok(ParsedDocument {
            statements,
            prefixes: context.into_prefixes(),
        })
    }

    /// Parses the file at `path`. Relative imports inside it resolve against
    /// its directory.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Io`] if the file cannot be read, otherwise the
    /// first [`ParsingError`] in it.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedDocument, ParsingError> {
        let path = path.as_ref();
        let io = |source| ErrorKind::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = path.canonicalize().map_err(io)?;
        let text = std::fs::read_to_string(&canonical).map_err(io)?;
        tracing::debug!(path = %canonical.display(), "parsing file");

        let mut context = ParserContext::for_file(&self.configuration, canonical);
        let statements = grammar::parse_document(&text, &mut context)?;
        Ok(ParsedDocument {
            statements,
            prefixes: context.into_prefixes(),
        })
    }

    /// Parses a document into a new knowledge base.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParsingError`] in the document.
    pub fn parse(&self, text: &str) -> Result<KnowledgeBase, ParsingError> {
        Ok(self.parse_document(text)?.into_knowledge_base())
    }

    /// Parses a document and adds its statements to `kb` in one batch.
    /// Returns the statements that were new to `kb`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParsingError`] in the document; `kb` is then left
    /// untouched.
    pub fn parse_into(
        &self,
        kb: &mut KnowledgeBase,
        text: &str,
    ) -> Result<Vec<Statement>, ParsingError> {
        let document = self.parse_document(text)?;
        Ok(kb.add_statements(document.statements))
    }

    /// Parses a single, possibly negated, literal such as `~p(?X, c)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if `text` is not exactly one literal.
    pub fn parse_literal(&self, text: &str) -> Result<Literal, ParsingError> {
        let mut context = ParserContext::new(&self.configuration);
        let mut parser = Parser::new(text, &mut context)?;
        let literal = parser.literal()?;
        parser.finish(false)?;
        Ok(literal)
    }

    /// Parses a single positive literal.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if `text` is not exactly one literal, or
    /// the literal is negated.
    pub fn parse_positive_literal(&self, text: &str) -> Result<PositiveLiteral, ParsingError> {
        let literal = self.parse_literal(text)?;
        literal.as_positive().ok_or_else(|| {
            ErrorKind::InvalidStatement(format!(
                "expected a positive literal, found negated `{}`",
                literal.atom()
            ))
            .into()
        })
    }

    /// Parses a single fact; the closing `.` is optional.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if `text` is not exactly one fact.
    pub fn parse_fact(&self, text: &str) -> Result<Fact, ParsingError> {
        match self.parse_clause(text)? {
            Statement::Fact(fact) => Ok(fact),
            other => Err(ErrorKind::InvalidStatement(format!(
                "expected a fact, found `{other}`"
            ))
            .into()),
        }
    }

    /// Parses a single rule; the closing `.` is optional.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if `text` is not exactly one rule, or the
    /// rule is unsafe.
    pub fn parse_rule(&self, text: &str) -> Result<Rule, ParsingError> {
        match self.parse_clause(text)? {
            Statement::Rule(rule) => Ok(rule),
            other => Err(ErrorKind::InvalidStatement(format!(
                "expected a rule, found `{other}`"
            ))
            .into()),
        }
    }

    fn parse_clause(&self, text: &str) -> Result<Statement, ParsingError> {
        let mut context = ParserContext::new(&self.configuration);
        let mut parser = Parser::new(text, &mut context)?;
        let statement = parser.clause()?;
        parser.finish(true)?;
        Ok(statement)
    }
}
