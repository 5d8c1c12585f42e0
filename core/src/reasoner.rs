//! The boundary to an external reasoning engine.
//!
//! This crate never evaluates rules. An engine receives the facts, rules and
//! data-source bindings of a knowledge base through [`ReasoningEngine::load`]
//! and answers queries through the returned [`ReasoningHandle`].

use std::sync::Arc;

use indexmap::IndexMap;

use crate::datasource::DataSource;
use crate::model::{Fact, PositiveLiteral, Predicate, Rule, Term};

/// Data-source bindings: every predicate with the sources declared for it.
pub type DataSourceBindings = IndexMap<Predicate, Vec<Arc<dyn DataSource>>>;

/// Everything an engine needs to materialize a knowledge base.
#[derive(Debug, Clone)]
pub struct LoadRequest<'a> {
    /// Facts in insertion order.
    pub facts: Vec<&'a Fact>,
    /// Rules in insertion order.
    pub rules: Vec<&'a Rule>,
    /// Per-predicate data sources in declaration order.
    pub data_sources: DataSourceBindings,
}

impl LoadRequest<'_> {
    /// The engine configuration text for [`Self::data_sources`].
    #[must_use]
    pub fn edb_configuration(&self) -> String {
        edb_configuration(&self.data_sources)
    }
}

/// What an engine reports about a loaded knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasoningStatus {
    /// Loaded, no reasoning performed yet.
    Loaded,
    /// Reasoning ran to completion.
    Completed,
    /// Reasoning stopped early, e.g. on a timeout.
    Interrupted,
    /// The engine failed; the message is engine-specific.
    Failed(String),
}

/// An engine that accepts knowledge bases.
pub trait ReasoningEngine {
    /// The handle of a loaded knowledge base.
    type Handle: ReasoningHandle;
    /// Engine-specific failure.
    type Error: std::error::Error;

    /// Loads a knowledge base.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the request is rejected, for example
    /// when a data source cannot be read.
    fn load(&mut self, request: &LoadRequest<'_>) -> Result<Self::Handle, Self::Error>;
}

/// A knowledge base loaded into an engine.
pub trait ReasoningHandle {
    /// Engine-specific failure.
    type Error: std::error::Error;

    /// Current reasoning status.
    fn status(&self) -> ReasoningStatus;

    /// Answers tuples matching `query`; variables in the query are free.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the query cannot be answered.
    fn query(
        &self,
        query: &PositiveLiteral,
    ) -> Result<Box<dyn Iterator<Item = Vec<Term>> + '_>, Self::Error>;
}

/// The engine-side predicate name: `name-arity`.
#[must_use]
pub fn engine_predicate_name(predicate: &Predicate) -> String {
    format!("{}-{}", predicate.name(), predicate.arity())
}

/// Renders the configuration of every bound source, numbering sources from 0
/// in binding order.
#[must_use]
pub fn edb_configuration(bindings: &DataSourceBindings) -> String {
    let mut out = String::new();
    let sources = bindings
        .iter()
        .flat_map(|(predicate, sources)| sources.iter().map(move |s| (predicate, s)));
    for (index, (predicate, source)) in sources.enumerate() {
        let rendered = source
            .to_config_string()
            .replace("%1$d", &index.to_string())
            .replace("%2$s", &engine_predicate_name(predicate));
        out.push_str(&rendered);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::datasource::{CsvFileDataSource, RdfFileDataSource};

    #[test]
    fn sources_are_numbered_across_predicates() {
        let mut bindings = DataSourceBindings::new();
        bindings.insert(
            Predicate::new("p", 2).unwrap(),
            vec![
                Arc::new(CsvFileDataSource::new("in/p.csv").unwrap()) as Arc<dyn DataSource>,
                Arc::new(CsvFileDataSource::new("in/p2.csv").unwrap()),
            ],
        );
        bindings.insert(
            Predicate::new("t", 3).unwrap(),
            vec![Arc::new(RdfFileDataSource::new("in/t.nt.gz").unwrap()) as Arc<dyn DataSource>],
        );
        assert_eq!(
            edb_configuration(&bindings),
            "EDB0_predname=p-2\nEDB0_type=INMEMORY\nEDB0_param0=in\nEDB0_param1=p\n\
             EDB1_predname=p-2\nEDB1_type=INMEMORY\nEDB1_param0=in\nEDB1_param1=p2\n\
             EDB2_predname=t-3\nEDB2_type=INMEMORY\nEDB2_param0=in\nEDB2_param1=t\n"
        );
    }

    #[test]
    fn empty_bindings_render_nothing() {
        assert!(edb_configuration(&DataSourceBindings::new()).is_empty());
    }
}
