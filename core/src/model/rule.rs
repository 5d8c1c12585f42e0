//! Rules: a positive head conjunction derived from a body conjunction.

use std::fmt;

use crate::error::ModelError;
use crate::model::{Conjunction, Literal, LiteralKind, PositiveLiteral, Predicate};
use crate::safety;
use crate::serializer::rls;

/// A safe rule `head :- body`.
///
/// Safety is checked once, in [`Rule::new`]; every `Rule` value is safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    head: Conjunction<PositiveLiteral>,
    body: Conjunction<Literal>,
}

impl Rule {
    /// Creates a rule after validating it with [`safety::check_rule`].
    ///
    /// # Errors
    ///
    /// Returns the safety violation reported by [`safety::check_rule`].
    pub fn new(
        head: Conjunction<PositiveLiteral>,
        body: Conjunction<Literal>,
    ) -> Result<Self, ModelError> {
        safety::check_rule(&head, &body)?;
        Ok(Self { head, body })
    }

    /// Builds head and body conjunctions from literal vectors, then validates.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyConjunction`] for an empty head or body, or
    /// a safety violation.
    pub fn from_literals(
        head: Vec<PositiveLiteral>,
        body: Vec<Literal>,
    ) -> Result<Self, ModelError> {
        Self::new(Conjunction::new(head)?, Conjunction::new(body)?)
    }

    /// The head conjunction.
    #[must_use]
    pub fn head(&self) -> &Conjunction<PositiveLiteral> {
        &self.head
    }

    /// The body conjunction.
    #[must_use]
    pub fn body(&self) -> &Conjunction<Literal> {
        &self.body
    }

    /// Predicates of the head literals, in head order.
    pub fn head_predicates(&self) -> impl Iterator<Item = &Predicate> + '_ {
        self.head.iter().map(|l| l.atom().predicate())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::rule(self))
    }
}
