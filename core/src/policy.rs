//! Caller-side restrictions layered over [`KnowledgeBase`].
//!
//! The store accepts any number of data sources per predicate. Callers whose
//! engine cannot combine sources wrap insertion in a policy instead.

use crate::error::PolicyError;
use crate::knowledge_base::{AddOutcome, KnowledgeBase};
use crate::model::Statement;

/// At most one data source per predicate, and no facts for a predicate that
/// has a data source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleSourcePerPredicate;

impl SingleSourcePerPredicate {
    /// Checks whether `statement` may be added to `kb`. Statements already
    /// present always pass.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::MultipleDataSources`] for a second source of a
    /// predicate and [`PolicyError::FactsAndDataSource`] when facts and a
    /// source would be mixed.
    pub fn check(&self, kb: &KnowledgeBase, statement: &Statement) -> Result<(), PolicyError> {
        if kb.contains(statement) {
            return Ok(());
        }
        match statement {
            Statement::DataSourceDeclaration(declaration) => {
                let predicate = declaration.predicate();
                if kb.data_sources_for_predicate(predicate).next().is_some() {
                    return Err(PolicyError::MultipleDataSources(predicate.clone()));
                }
                if kb.facts_for_predicate(predicate).next().is_some() {
                    return Err(PolicyError::FactsAndDataSource(predicate.clone()));
                }
                Ok(())
            }
            Statement::Fact(fact) => {
                if kb.data_sources_for_predicate(fact.predicate()).next().is_some() {
                    return Err(PolicyError::FactsAndDataSource(fact.predicate().clone()));
                }
                Ok(())
            }
            Statement::Rule(_) => Ok(()),
        }
    }

    /// Adds `statement` to `kb` if [`Self::check`] allows it.
    ///
    /// # Errors
    ///
    /// Returns the violation found by [`Self::check`]; `kb` is then unchanged.
    pub fn add(
        &self,
        kb: &mut KnowledgeBase,
        statement: impl Into<Statement>,
    ) -> Result<AddOutcome, PolicyError> {
        let statement = statement.into();
        self.check(kb, &statement)?;
        Ok(kb.add_statement(statement))
    }
}
