//! Parser for the rulelog rule language.
//!
//! A document is a sequence of facts, rules and directives:
//!
//! ```text
//! @base <http://example.org/> .
//! @prefix ex: <http://example.org/vocab#> .
//! @source ex:city(2) : load-csv("cities.csv") .
//!
//! ex:capital("Dresden"^^ex:name, 1206) .
//! ex:inCountry(?C, !Country) :- ex:city(?C, ?Pop) .   % comment
//! ```
//!
//! `@source` and every directive other than `@base` and `@prefix` dispatch to
//! handlers registered in a [`ParserConfiguration`]; the default one knows
//! `load-csv`, `load-rdf`, `sparql`, `@import` and `@import-relative`.
//!
//! ```
//! use rulelog_parser::RuleParser;
//!
//! let kb = RuleParser::new().parse(
//!     "@prefix ex: <http://example.org/> .
//!      ex:p(ex:a) .
//!      ex:q(?X) :- ex:p(?X) .",
//! )?;
//! assert_eq!(kb.facts().len(), 1);
//! assert_eq!(kb.rules().len(), 1);
//! # Ok::<(), rulelog_parser::ParsingError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod directive;
pub mod error;
mod grammar;
pub mod handlers;
mod lexer;
mod parser;

pub use config::ParserConfiguration;
pub use directive::{
    DataSourceDeclarationHandler, DirectiveArgument, DirectiveHandler, ParserContext,
};
pub use error::{ErrorKind, Location, ParsingError};
pub use parser::{ParsedDocument, RuleParser};
