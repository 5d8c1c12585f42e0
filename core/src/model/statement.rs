//! The closed set of statements a knowledge base stores.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::datasource::DataSource;
use crate::error::ModelError;
use crate::model::{Fact, Predicate, Rule};
use crate::serializer::rls;

/// Binds a predicate to the data source its tuples come from.
///
/// Two declarations are equal when their predicates are equal and their
/// sources are structurally equal.
#[derive(Debug, Clone)]
pub struct DataSourceDeclaration {
    predicate: Predicate,
    source: Arc<dyn DataSource>,
}

impl PartialEq for DataSourceDeclaration {
    fn eq(&self, other: &Self) -> bool {
        self.predicate == other.predicate && *self.source == *other.source
    }
}

impl Eq for DataSourceDeclaration {}

impl Hash for DataSourceDeclaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.predicate.hash(state);
        (*self.source).hash(state);
    }
}

impl DataSourceDeclaration {
    /// Creates a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DataSourceArity`] if the source produces tuples
    /// of a fixed arity different from the predicate's.
    pub fn new(predicate: Predicate, source: Arc<dyn DataSource>) -> Result<Self, ModelError> {
        match source.required_arity() {
            Some(required) if required != predicate.arity() => {
                Err(ModelError::DataSourceArity {
                    predicate,
                    required,
                })
            }
            _ => Ok(Self { predicate, source }),
        }
    }

    /// The declared predicate.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The data source.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }
}

/// A fact, a rule or a data-source declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// A ground positive literal.
    Fact(Fact),
    /// A safe rule.
    Rule(Rule),
    /// A predicate bound to a data source.
    DataSourceDeclaration(DataSourceDeclaration),
}

impl Statement {
    /// The fact, if this statement is one.
    #[must_use]
    pub fn as_fact(&self) -> Option<&Fact> {
        match self {
            Statement::Fact(fact) => Some(fact),
            _ => None,
        }
    }

    /// The rule, if this statement is one.
    #[must_use]
    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Statement::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    /// The declaration, if this statement is one.
    #[must_use]
    pub fn as_data_source_declaration(&self) -> Option<&DataSourceDeclaration> {
        match self {
            Statement::DataSourceDeclaration(declaration) => Some(declaration),
            _ => None,
        }
    }
}

impl From<Fact> for Statement {
    fn from(fact: Fact) -> Self {
        Statement::Fact(fact)
    }
}

impl From<Rule> for Statement {
    fn from(rule: Rule) -> Self {
        Statement::Rule(rule)
    }
}

impl From<DataSourceDeclaration> for Statement {
    fn from(declaration: DataSourceDeclaration) -> Self {
        Statement::DataSourceDeclaration(declaration)
    }
}

impl fmt::Display for DataSourceDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::data_source_declaration(self))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::statement(self))
    }
}
