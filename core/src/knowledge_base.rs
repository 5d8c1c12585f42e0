//! The knowledge base: an insertion-ordered, deduplicated statement store.
//!
//! Statements are only ever added. Adding never fails; adding a statement
//! that is already present is a no-op reported as [`AddOutcome::Unchanged`].
//! The store does not synchronize itself; share it behind a lock if several
//! threads write to it.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::datasource::DataSource;
use crate::listener::{KnowledgeBaseListener, Listeners, Subscription};
use crate::model::{DataSourceDeclaration, Fact, Predicate, Rule, Statement};
use crate::reasoner::{DataSourceBindings, LoadRequest, ReasoningEngine};

/// Result of [`KnowledgeBase::add_statement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The statement was new and has been stored.
    Added,
    /// An equal statement was already stored.
    Unchanged,
}

/// The facts, rules and declarations of a knowledge base, collected in one
/// pass and each in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StatementViews<'a> {
    /// Facts in insertion order.
    pub facts: Vec<&'a Fact>,
    /// Rules in insertion order.
    pub rules: Vec<&'a Rule>,
    /// Declarations in insertion order.
    pub data_source_declarations: Vec<&'a DataSourceDeclaration>,
}

/// Facts, rules and data-source declarations.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    statements: IndexSet<Statement>,
    facts_by_predicate: IndexMap<Predicate, IndexSet<Fact>>,
    sources_by_predicate: IndexMap<Predicate, IndexSet<DataSourceDeclaration>>,
    listeners: Listeners,
}

impl KnowledgeBase {
    /// An empty knowledge base.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a statement and notifies listeners if it is new.
    pub fn add_statement(&mut self, statement: impl Into<Statement>) -> AddOutcome {
        let statement = statement.into();
        if self.insert(statement.clone()) {
            self.listeners.statement_added(&statement);
            AddOutcome::Added
        } else {
            AddOutcome::Unchanged
        }
    }

    /// Adds every statement, then notifies listeners once with the batch.
    ///
    /// Listeners see one `on_statement_added` per new statement followed by
    /// a single `on_statements_added`, which is fired even if nothing was
    /// new. Returns the statements that were actually added.
    pub fn add_statements<I, S>(&mut self, statements: I) -> Vec<Statement>
    where
        I: IntoIterator<Item = S>,
        S: Into<Statement>,
    {
        let mut added = Vec::new();
        for statement in statements {
            let statement = statement.into();
            if self.insert(statement.clone()) {
                self.listeners.statement_added(&statement);
                added.push(statement);
            }
        }
        tracing::debug!(added = added.len(), "statement batch added");
        self.listeners.statements_added(&added);
        added
    }

    fn insert(&mut self, statement: Statement) -> bool {
        if self.statements.contains(&statement) {
            tracing::trace!(%statement, "duplicate statement ignored");
            return false;
        }
        match &statement {
            Statement::Fact(fact) => {
                self.facts_by_predicate
                    .entry(fact.predicate().clone())
                    .or_default()
                    .insert(fact.clone());
            }
            Statement::Rule(_) => {}
            Statement::DataSourceDeclaration(declaration) => {
                self.sources_by_predicate
                    .entry(declaration.predicate().clone())
                    .or_default()
                    .insert(declaration.clone());
            }
        }
        tracing::debug!(%statement, "statement added");
        self.statements.insert(statement);
        true
    }

    /// Registers a listener; it is called synchronously on every addition
    /// until the returned subscription is passed to [`Self::unsubscribe`].
    pub fn subscribe(&mut self, listener: Arc<dyn KnowledgeBaseListener>) -> Subscription {
        self.listeners.subscribe(listener)
    }

    /// Deregisters a listener. Returns false if the subscription belongs to
    /// another knowledge base.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.listeners.unsubscribe(subscription)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// All statements in insertion order.
    pub fn statements(&self) -> impl ExactSizeIterator<Item = &Statement> + '_ {
        self.statements.iter()
    }

    /// Number of distinct statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true if no statement has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Returns true if an equal statement is stored.
    #[must_use]
    pub fn contains(&self, statement: &Statement) -> bool {
        self.statements.contains(statement)
    }

    /// Splits the statements by kind in a single pass.
    #[must_use]
    pub fn views(&self) -> StatementViews<'_> {
        let mut views = StatementViews::default();
        for statement in &self.statements {
            match statement {
                Statement::Fact(fact) => views.facts.push(fact),
                Statement::Rule(rule) => views.rules.push(rule),
                Statement::DataSourceDeclaration(d) => views.data_source_declarations.push(d),
            }
        }
        views
    }

    /// Facts in insertion order.
    #[must_use]
    pub fn facts(&self) -> Vec<&Fact> {
        self.views().facts
    }

    /// Rules in insertion order.
    #[must_use]
    pub fn rules(&self) -> Vec<&Rule> {
        self.views().rules
    }

    /// Data-source declarations in insertion order.
    #[must_use]
    pub fn data_source_declarations(&self) -> Vec<&DataSourceDeclaration> {
        self.views().data_source_declarations
    }

    /// Facts of one predicate in insertion order, read from the index.
    pub fn facts_for_predicate<'a>(
        &'a self,
        predicate: &Predicate,
    ) -> impl Iterator<Item = &'a Fact> + 'a {
        self.facts_by_predicate
            .get(predicate)
            .into_iter()
            .flat_map(IndexSet::iter)
    }

    /// Data sources declared for one predicate, in declaration order, read
    /// from the index.
    pub fn data_sources_for_predicate<'a>(
        &'a self,
        predicate: &Predicate,
    ) -> impl Iterator<Item = &'a Arc<dyn DataSource>> + 'a {
        self.sources_by_predicate
            .get(predicate)
            .into_iter()
            .flat_map(IndexSet::iter)
            .map(DataSourceDeclaration::source)
    }

    /// Every predicate with its data sources; a predicate may have several.
    #[must_use]
    pub fn data_source_bindings(&self) -> DataSourceBindings {
        self.sources_by_predicate
            .iter()
            .map(|(predicate, declarations)| {
                let sources: Vec<_> =
                    declarations.iter().map(|d| Arc::clone(d.source())).collect();
                (predicate.clone(), sources)
            })
            .collect()
    }

    /// Predicates that have facts or a data source, in first-seen order.
    #[must_use]
    pub fn edb_predicates(&self) -> IndexSet<Predicate> {
        self.statements
            .iter()
            .filter_map(|s| match s {
                Statement::Fact(fact) => Some(fact.predicate().clone()),
                Statement::DataSourceDeclaration(d) => Some(d.predicate().clone()),
                Statement::Rule(_) => None,
            })
            .collect()
    }

    /// Predicates occurring in some rule head, in first-seen order.
    #[must_use]
    pub fn idb_predicates(&self) -> IndexSet<Predicate> {
        self.statements
            .iter()
            .filter_map(Statement::as_rule)
            .flat_map(Rule::head_predicates)
            .cloned()
            .collect()
    }

    /// Number of facts per predicate, in first-seen order.
    #[must_use]
    pub fn fact_counts(&self) -> IndexMap<&Predicate, usize> {
        self.facts_by_predicate
            .iter()
            .map(|(predicate, facts)| (predicate, facts.len()))
            .collect()
    }

    /// Builds the engine request for this knowledge base.
    #[must_use]
    pub fn load_request(&self) -> LoadRequest<'_> {
        let views = self.views();
        LoadRequest {
            facts: views.facts,
            rules: views.rules,
            data_sources: self.data_source_bindings(),
        }
    }

    /// Hands facts, rules and data-source bindings to `engine`.
    ///
    /// # Errors
    ///
    /// Returns the engine's load error.
    pub fn load_into<E: ReasoningEngine>(&self, engine: &mut E) -> Result<E::Handle, E::Error> {
        let request = self.load_request();
        tracing::debug!(
            facts = request.facts.len(),
            rules = request.rules.len(),
            sources = request.data_sources.len(),
            "loading knowledge base into engine"
        );
        engine.load(&request)
    }
}

impl<S: Into<Statement>> Extend<S> for KnowledgeBase {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.add_statements(iter);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Term;
    use std::sync::Mutex;

    fn fact(name: &str, args: &[&str]) -> Fact {
        Fact::new(
            Predicate::new(name, args.len()).unwrap(),
            args.iter().map(|a| Term::constant(*a).unwrap()).collect(),
        )
        .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        single: Mutex<Vec<Statement>>,
        batches: Mutex<Vec<usize>>,
    }

    impl KnowledgeBaseListener for Recorder {
        fn on_statement_added(&self, statement: &Statement) {
            self.single.lock().unwrap().push(statement.clone());
        }

        fn on_statements_added(&self, statements: &[Statement]) {
            self.batches.lock().unwrap().push(statements.len());
        }
    }

    #[test]
    fn adding_twice_is_unchanged() {
        let mut kb = KnowledgeBase::new();
        assert_eq!(kb.add_statement(fact("p", &["a"])), AddOutcome::Added);
        assert_eq!(kb.add_statement(fact("p", &["a"])), AddOutcome::Unchanged);
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.facts_for_predicate(&Predicate::new("p", 1).unwrap()).count(), 1);
    }

    #[test]
    fn facts_in_insertion_order_and_indexed() {
        let mut kb = KnowledgeBase::new();
        kb.add_statement(fact("p", &["b"]));
        kb.add_statement(fact("q", &["z"]));
        kb.add_statement(fact("p", &["a"]));
        let p = Predicate::new("p", 1).unwrap();
        assert_eq!(kb.facts(), vec![&fact("p", &["b"]), &fact("q", &["z"]), &fact("p", &["a"])]);
        assert_eq!(
            kb.facts_for_predicate(&p).collect::<Vec<_>>(),
            vec![&fact("p", &["b"]), &fact("p", &["a"])]
        );
        assert_eq!(kb.fact_counts().get(&p), Some(&2));
        assert!(kb.rules().is_empty());
    }

    #[test]
    fn listeners_see_single_and_batch_events() {
        let mut kb = KnowledgeBase::new();
        let recorder = Arc::new(Recorder::default());
        let subscription = kb.subscribe(recorder.clone());

        kb.add_statement(fact("p", &["a"]));
        let added = kb.add_statements(vec![fact("p", &["a"]), fact("p", &["b"])]);
        assert_eq!(added, vec![Statement::Fact(fact("p", &["b"]))]);
        assert_eq!(recorder.single.lock().unwrap().len(), 2);
        assert_eq!(*recorder.batches.lock().unwrap(), vec![1]);

        assert!(kb.unsubscribe(subscription));
        kb.add_statement(fact("p", &["c"]));
        assert_eq!(recorder.single.lock().unwrap().len(), 2);
        assert_eq!(kb.listener_count(), 0);
    }

    #[test]
    fn duplicates_do_not_notify() {
        let mut kb = KnowledgeBase::new();
        kb.add_statement(fact("p", &["a"]));
        let recorder = Arc::new(Recorder::default());
        let _subscription = kb.subscribe(recorder.clone());
        kb.add_statement(fact("p", &["a"]));
        kb.add_statements(Vec::<Statement>::new());
        assert!(recorder.single.lock().unwrap().is_empty());
        assert_eq!(*recorder.batches.lock().unwrap(), vec![0]);
    }

    #[test]
    fn subscription_of_another_knowledge_base_is_rejected() {
        let mut a = KnowledgeBase::new();
        let mut b = KnowledgeBase::new();
        let subscription = a.subscribe(Arc::new(Recorder::default()));
        assert!(!b.unsubscribe(subscription));
        assert_eq!(a.listener_count(), 1);
    }
}
