//! Logical model and knowledge-base store for a Datalog-with-existentials
//! rule language.
//!
//! The crate represents, validates, indexes and serializes rules and facts.
//! It never evaluates them: materialization and query answering belong to an
//! external engine reached through [`reasoner::ReasoningEngine`].
//!
//! # Building a knowledge base
//!
//! ```
//! use rulelog_core::{
//!     Atom, Conjunction, Fact, KnowledgeBase, Literal, PositiveLiteral, Predicate, Rule, Term,
//! };
//!
//! let x = Term::universal("X")?;
//! let head = Conjunction::new(vec![PositiveLiteral::new(Atom::from_name(
//!     "q",
//!     vec![x.clone()],
//! )?)])?;
//! let body = Conjunction::new(vec![Literal::positive(Atom::from_name("p", vec![x])?)])?;
//!
//! let mut kb = KnowledgeBase::new();
//! kb.add_statement(Rule::new(head, body)?);
//! kb.add_statement(Fact::new(Predicate::new("p", 1)?, vec![Term::constant("a")?])?);
//!
//! assert_eq!(rulelog_core::serializer::to_rls(&kb), "q(?X) :- p(?X) .\np(a) .\n");
//! # Ok::<(), rulelog_core::ModelError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod datasource;
pub mod error;
pub mod knowledge_base;
pub mod listener;
pub mod model;
pub mod policy;
pub mod prefixes;
pub mod reasoner;
pub mod safety;
pub mod serializer;

pub use datasource::DataSource;
pub use error::{ModelError, PolicyError, PrefixError};
pub use knowledge_base::{AddOutcome, KnowledgeBase, StatementViews};
pub use listener::{KnowledgeBaseListener, Subscription};
pub use model::{
    Atom, Blank, Conjunction, Constant, DataSourceDeclaration, Fact, Literal, LiteralKind,
    PositiveLiteral, Predicate, Rule, Statement, Term, TermType, Variable, VariableKind,
};
pub use prefixes::PrefixDeclarations;
