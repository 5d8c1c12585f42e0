//! Knowledge-base scenarios across the public API.

use std::convert::Infallible;
use std::sync::Arc;

use rulelog_core::datasource::{CsvFileDataSource, SparqlQueryResultDataSource};
use rulelog_core::reasoner::{LoadRequest, ReasoningEngine, ReasoningHandle, ReasoningStatus};
use rulelog_core::{
    AddOutcome, Atom, Conjunction, DataSourceDeclaration, Fact, KnowledgeBase, Literal,
    PositiveLiteral, Predicate, Rule, Statement, Term,
};
use url::Url;

fn fact(name: &str, args: &[&str]) -> anyhow::Result<Fact> {
    let terms = args
        .iter()
        .map(|a| Term::constant(*a))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Fact::new(Predicate::new(name, args.len())?, terms)?)
}

fn copy_rule(from: &str, to: &str) -> anyhow::Result<Rule> {
    let x = Term::universal("X")?;
    Ok(Rule::new(
        Conjunction::new(vec![PositiveLiteral::new(Atom::from_name(to, vec![x.clone()])?)])?,
        Conjunction::new(vec![Literal::positive(Atom::from_name(from, vec![x])?)])?,
    )?)
}

#[test]
fn two_facts_for_one_predicate() -> anyhow::Result<()> {
    let mut kb = KnowledgeBase::new();
    let first = fact("p", &["c"])?;
    let second = fact("p", &["d"])?;
    kb.add_statement(first.clone());
    kb.add_statement(second.clone());

    assert_eq!(kb.facts(), vec![&first, &second]);
    let p = Predicate::new("p", 1)?;
    assert_eq!(
        kb.facts_for_predicate(&p).collect::<Vec<_>>(),
        vec![&first, &second]
    );
    Ok(())
}

#[test]
fn views_keep_insertion_order_per_kind() -> anyhow::Result<()> {
    let mut kb = KnowledgeBase::new();
    let source = DataSourceDeclaration::new(
        Predicate::new("s", 1)?,
        Arc::new(CsvFileDataSource::new("s.csv")?),
    )?;
    let statements: Vec<Statement> = vec![
        copy_rule("p", "q")?.into(),
        fact("p", &["a"])?.into(),
        source.clone().into(),
        copy_rule("s", "p")?.into(),
    ];
    kb.add_statements(statements.clone());

    assert_eq!(kb.statements().cloned().collect::<Vec<_>>(), statements);
    let views = kb.views();
    assert_eq!(views.rules.len(), 2);
    assert_eq!(views.facts, vec![&fact("p", &["a"])?]);
    assert_eq!(views.data_source_declarations, vec![&source]);
    Ok(())
}

#[test]
fn data_sources_are_indexed_per_predicate() -> anyhow::Result<()> {
    let csv = |file: &str| -> anyhow::Result<Arc<CsvFileDataSource>> {
        Ok(Arc::new(CsvFileDataSource::new(file)?))
    };
    let p = Predicate::new("p", 2)?;
    let q = Predicate::new("q", 2)?;
    let mut kb = KnowledgeBase::new();
    kb.add_statement(DataSourceDeclaration::new(p.clone(), csv("p1.csv")?)?);
    kb.add_statement(DataSourceDeclaration::new(q.clone(), csv("q.csv")?)?);
    kb.add_statement(DataSourceDeclaration::new(p.clone(), csv("p2.csv")?)?);

    // Equal declarations built from separate sources are one statement.
    let again = kb.add_statement(DataSourceDeclaration::new(p.clone(), csv("p1.csv")?)?);
    assert_eq!(again, AddOutcome::Unchanged);
    assert_eq!(kb.len(), 3);

    let forms = |predicate: &Predicate| -> Vec<String> {
        kb.data_sources_for_predicate(predicate)
            .map(|s| s.syntactic_form())
            .collect()
    };
    assert_eq!(forms(&p), vec!["load-csv(\"p1.csv\")", "load-csv(\"p2.csv\")"]);
    assert_eq!(forms(&q), vec!["load-csv(\"q.csv\")"]);
    assert!(forms(&Predicate::new("r", 2)?).is_empty());

    let bindings = kb.data_source_bindings();
    assert_eq!(bindings.keys().collect::<Vec<_>>(), vec![&p, &q]);
    assert_eq!(bindings[&p].len(), 2);
    Ok(())
}

#[test]
fn edb_and_idb_classification() -> anyhow::Result<()> {
    let mut kb = KnowledgeBase::new();
    kb.add_statement(fact("p", &["a"])?);
    kb.add_statement(copy_rule("p", "q")?);
    kb.add_statement(DataSourceDeclaration::new(
        Predicate::new("s", 1)?,
        Arc::new(CsvFileDataSource::new("s.csv")?),
    )?);

    let edb: Vec<String> = kb.edb_predicates().iter().map(ToString::to_string).collect();
    let idb: Vec<String> = kb.idb_predicates().iter().map(ToString::to_string).collect();
    assert_eq!(edb, vec!["p/1", "s/1"]);
    assert_eq!(idb, vec!["q/1"]);

    // A predicate may be both once a rule derives into it.
    kb.add_statement(copy_rule("s", "p")?);
    assert!(kb.idb_predicates().contains(&Predicate::new("p", 1)?));
    assert!(kb.edb_predicates().contains(&Predicate::new("p", 1)?));
    Ok(())
}

#[derive(Debug, Default)]
struct RecordingEngine {
    loaded: Option<(usize, usize, String)>,
}

struct Handle;

impl ReasoningHandle for Handle {
    type Error = Infallible;

    fn status(&self) -> ReasoningStatus {
        ReasoningStatus::Loaded
    }

    fn query(
        &self,
        _query: &PositiveLiteral,
    ) -> Result<Box<dyn Iterator<Item = Vec<Term>> + '_>, Self::Error> {
        Ok(Box::new(std::iter::empty()))
    }
}

impl ReasoningEngine for RecordingEngine {
    type Handle = Handle;
    type Error = Infallible;

    fn load(&mut self, request: &LoadRequest<'_>) -> Result<Handle, Infallible> {
        self.loaded = Some((
            request.facts.len(),
            request.rules.len(),
            request.edb_configuration(),
        ));
        Ok(Handle)
    }
}

#[test]
fn load_into_hands_over_bindings() -> anyhow::Result<()> {
    let mut kb = KnowledgeBase::new();
    kb.add_statement(fact("p", &["a"])?);
    kb.add_statement(copy_rule("p", "q")?);
    kb.add_statement(DataSourceDeclaration::new(
        Predicate::new("wd", 2)?,
        Arc::new(SparqlQueryResultDataSource::new(
            Url::parse("https://query.wikidata.org/sparql")?,
            "a,b",
            "?a wdt:P31 ?b .",
        )?),
    )?);

    let mut engine = RecordingEngine::default();
    let handle = kb.load_into(&mut engine)?;
    assert_eq!(handle.status(), ReasoningStatus::Loaded);

    let (facts, rules, config) = engine
        .loaded
        .ok_or_else(|| anyhow::anyhow!("engine was not called"))?;
    assert_eq!((facts, rules), (1, 1));
    assert_eq!(
        config,
        "EDB0_predname=wd-2\nEDB0_type=SPARQL\nEDB0_param0=https://query.wikidata.org/sparql\nEDB0_param1=a,b\nEDB0_param2=?a wdt:P31 ?b .\n"
    );
    Ok(())
}
