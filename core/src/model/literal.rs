//! Literals (possibly negated atoms), positive literals and facts.

use std::fmt;
use std::hash::Hash;

use crate::error::ModelError;
use crate::model::{Atom, Predicate, Term};
use crate::serializer::rls;

/// Behaviour shared by every kind of literal a [`crate::Conjunction`] can hold.
pub trait LiteralKind: Clone + Eq + Hash + fmt::Debug {
    /// The underlying atom.
    fn atom(&self) -> &Atom;

    /// Returns true if the literal is negated.
    fn is_negated(&self) -> bool;

    /// Converts to the general [`Literal`] form.
    fn to_literal(&self) -> Literal {
        Literal {
            atom: self.atom().clone(),
            negated: self.is_negated(),
        }
    }
}

/// An atom together with its polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    atom: Atom,
    negated: bool,
}

impl Literal {
    /// A positive literal.
    #[must_use]
    pub fn positive(atom: Atom) -> Self {
        Self {
            atom,
            negated: false,
        }
    }

    /// A negated literal, written `~atom`.
    #[must_use]
    pub fn negative(atom: Atom) -> Self {
        Self {
            atom,
            negated: true,
        }
    }

    /// The predicate of the underlying atom.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        self.atom.predicate()
    }

    /// The positive form, if this literal is not negated.
    #[must_use]
    pub fn as_positive(&self) -> Option<PositiveLiteral> {
        (!self.negated).then(|| PositiveLiteral(self.atom.clone()))
    }
}

impl LiteralKind for Literal {
    fn atom(&self) -> &Atom {
        &self.atom
    }

    fn is_negated(&self) -> bool {
        self.negated
    }
}

/// A literal restricted to positive polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositiveLiteral(Atom);

impl PositiveLiteral {
    /// Wraps an atom.
    #[must_use]
    pub fn new(atom: Atom) -> Self {
        Self(atom)
    }

    /// The predicate of the underlying atom.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        self.0.predicate()
    }

    /// The argument terms.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        self.0.terms()
    }

    /// Unwraps the atom.
    #[must_use]
    pub fn into_atom(self) -> Atom {
        self.0
    }
}

impl LiteralKind for PositiveLiteral {
    fn atom(&self) -> &Atom {
        &self.0
    }

    fn is_negated(&self) -> bool {
        false
    }
}

impl From<PositiveLiteral> for Literal {
    fn from(literal: PositiveLiteral) -> Self {
        Literal::positive(literal.0)
    }
}

impl From<Atom> for PositiveLiteral {
    fn from(atom: Atom) -> Self {
        PositiveLiteral(atom)
    }
}

/// A positive literal whose arguments are all constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact(PositiveLiteral);

impl Fact {
    /// Creates a fact.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ArityMismatch`] if the term count is wrong and
    /// [`ModelError::NotGround`] if any term is a variable or blank.
    pub fn new(predicate: Predicate, terms: Vec<Term>) -> Result<Self, ModelError> {
        Self::try_from(PositiveLiteral::new(Atom::new(predicate, terms)?))
    }

    /// The predicate of this fact.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        self.0.predicate()
    }

    /// The constant arguments.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        self.0.terms()
    }

    /// The fact viewed as a positive literal.
    #[must_use]
    pub fn as_literal(&self) -> &PositiveLiteral {
        &self.0
    }
}

impl TryFrom<PositiveLiteral> for Fact {
    type Error = ModelError;

    fn try_from(literal: PositiveLiteral) -> Result<Self, Self::Error> {
        if let Some((position, term)) = literal
            .terms()
            .iter()
            .enumerate()
            .find(|(_, t)| !t.is_ground())
        {
            return Err(ModelError::NotGround {
                predicate: literal.predicate().clone(),
                position,
                term: term.to_string(),
            });
        }
        Ok(Fact(literal))
    }
}

impl LiteralKind for Fact {
    fn atom(&self) -> &Atom {
        self.0.atom()
    }

    fn is_negated(&self) -> bool {
        false
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::literal(self))
    }
}

impl fmt::Display for PositiveLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::atom(&self.0))
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::fact(self))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Blank;

    fn p1() -> Predicate {
        Predicate::new("p", 1).unwrap()
    }

    #[test]
    fn facts_must_be_ground() {
        let err = Fact::new(p1(), vec![Term::universal("X").unwrap()]).unwrap_err();
        assert!(matches!(err, ModelError::NotGround { position: 0, .. }));

        let err = Fact::new(p1(), vec![Term::Blank(Blank::new("b").unwrap())]).unwrap_err();
        assert!(matches!(err, ModelError::NotGround { .. }));

        assert!(Fact::new(p1(), vec![Term::constant("c").unwrap()]).is_ok());
    }

    #[test]
    fn fact_arity_is_checked() {
        assert!(matches!(
            Fact::new(p1(), vec![]),
            Err(ModelError::ArityMismatch { found: 0, .. })
        ));
    }

    #[test]
    fn polarity() {
        let atom = Atom::from_name("p", vec![Term::universal("X").unwrap()]).unwrap();
        let negative = Literal::negative(atom.clone());
        assert!(negative.is_negated());
        assert!(negative.as_positive().is_none());
        assert_ne!(negative, Literal::positive(atom.clone()));
        assert_eq!(
            PositiveLiteral::new(atom.clone()).to_literal(),
            Literal::positive(atom)
        );
    }
}
