//! Predicates and atoms.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::{Term, Variable};
use crate::serializer::rls;

/// A relation symbol with a fixed arity. Equal iff name and arity match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Predicate {
    name: String,
    arity: usize,
}

impl Predicate {
    /// Creates a predicate.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `name` is empty.
    pub fn new(name: impl Into<String>, arity: usize) -> Result<Self, ModelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::InvalidArgument(
                "predicate name must not be empty".to_owned(),
            ));
        }
        Ok(Self { name, arity })
    }

    /// The predicate name (an IRI or a bare name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments every atom of this predicate has.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// A predicate applied to as many terms as its arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    predicate: Predicate,
    terms: Vec<Term>,
}

impl Atom {
    /// Creates an atom.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ArityMismatch`] if `terms.len()` differs from the
    /// predicate's arity.
    pub fn new(predicate: Predicate, terms: Vec<Term>) -> Result<Self, ModelError> {
        if terms.len() != predicate.arity() {
            return Err(ModelError::ArityMismatch {
                found: terms.len(),
                predicate,
            });
        }
        Ok(Self { predicate, terms })
    }

    /// Creates an atom whose predicate arity is taken from the term count.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `name` is empty.
    pub fn from_name(name: impl Into<String>, terms: Vec<Term>) -> Result<Self, ModelError> {
        let predicate = Predicate::new(name, terms.len())?;
        Ok(Self { predicate, terms })
    }

    /// The predicate of this atom.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The argument terms, in order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Iterates over the variables among the arguments, in argument order,
    /// repeating duplicates.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.terms.iter().filter_map(Term::as_variable)
    }

    /// Returns true if every argument is a constant.
    #[must_use]
    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(Term::is_ground)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::atom(self))
    }
}
