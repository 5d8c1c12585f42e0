//! Ordered, non-empty conjunctions of literals.
//!
//! The derived term and variable sets are computed in a single pass over all
//! atom arguments the first time any of them is requested, then cached. A
//! conjunction is immutable, so the cache never needs invalidation.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::error::ModelError;
use crate::model::{LiteralKind, Term, TermType, Variable};
use crate::serializer::rls;

/// Terms and variables collected from every atom of a conjunction.
#[derive(Debug, Clone, Default)]
struct TermIndex {
    terms: HashSet<Term>,
    variables: HashSet<Variable>,
}

impl TermIndex {
    fn collect<L: LiteralKind>(literals: &[L]) -> Self {
        let mut index = TermIndex::default();
        for literal in literals {
            for term in literal.atom().terms() {
                if let Term::Variable(v) = term {
                    index.variables.insert(v.clone());
                }
                index.terms.insert(term.clone());
            }
        }
        index
    }
}

/// A non-empty ordered sequence of literals of kind `L`.
///
/// Equality and hashing consider only the literal sequence, including order;
/// conjunctions of different literal kinds compare equal when their literals
/// agree in atom and polarity.
#[derive(Debug, Clone)]
pub struct Conjunction<L> {
    literals: Vec<L>,
    index: OnceLock<TermIndex>,
}

impl<L: LiteralKind> Conjunction<L> {
    /// Creates a conjunction.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyConjunction`] if `literals` is empty.
    pub fn new(literals: Vec<L>) -> Result<Self, ModelError> {
        if literals.is_empty() {
            return Err(ModelError::EmptyConjunction);
        }
        Ok(Self {
            literals,
            index: OnceLock::new(),
        })
    }

    /// Creates a conjunction from possibly absent elements.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyConjunction`] for an empty input and
    /// [`ModelError::NullElement`] for the first absent element.
    pub fn from_optional(literals: Vec<Option<L>>) -> Result<Self, ModelError> {
        let literals = literals
            .into_iter()
            .enumerate()
            .map(|(index, l)| l.ok_or(ModelError::NullElement { index }))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(literals)
    }

    /// The literals, in their original order.
    #[must_use]
    pub fn literals(&self) -> &[L] {
        &self.literals
    }

    /// Iterates over the literals in order.
    pub fn iter(&self) -> std::slice::Iter<'_, L> {
        self.literals.iter()
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Always false: conjunctions are non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    fn index(&self) -> &TermIndex {
        self.index.get_or_init(|| TermIndex::collect(&self.literals))
    }

    /// Every distinct term occurring in any literal.
    #[must_use]
    pub fn terms(&self) -> &HashSet<Term> {
        &self.index().terms
    }

    /// The distinct terms of one type.
    #[must_use]
    pub fn terms_of_type(&self, term_type: TermType) -> HashSet<Term> {
        self.terms()
            .iter()
            .filter(|t| t.term_type() == term_type)
            .cloned()
            .collect()
    }

    /// Every distinct variable, universal or existential.
    #[must_use]
    pub fn variables(&self) -> &HashSet<Variable> {
        &self.index().variables
    }

    /// The distinct universal variables.
    pub fn universal_variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.variables().iter().filter(|v| v.is_universal())
    }

    /// The distinct existential variables.
    pub fn existential_variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.variables().iter().filter(|v| v.is_existential())
    }
}

impl<L> IntoIterator for Conjunction<L> {
    type Item = L;
    type IntoIter = std::vec::IntoIter<L>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.into_iter()
    }
}

impl<'a, L> IntoIterator for &'a Conjunction<L> {
    type Item = &'a L;
    type IntoIter = std::slice::Iter<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl<L: LiteralKind, M: LiteralKind> PartialEq<Conjunction<M>> for Conjunction<L> {
    fn eq(&self, other: &Conjunction<M>) -> bool {
        self.literals.len() == other.literals.len()
            && self
                .literals
                .iter()
                .zip(&other.literals)
                .all(|(a, b)| a.is_negated() == b.is_negated() && a.atom() == b.atom())
    }
}

impl<L: LiteralKind> Eq for Conjunction<L> {}

impl<L: LiteralKind> Hash for Conjunction<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.literals.len().hash(state);
        for literal in &self.literals {
            literal.is_negated().hash(state);
            literal.atom().hash(state);
        }
    }
}

impl<L: LiteralKind> TryFrom<Vec<L>> for Conjunction<L> {
    type Error = ModelError;

    fn try_from(literals: Vec<L>) -> Result<Self, Self::Error> {
        Self::new(literals)
    }
}

impl<L: LiteralKind> fmt::Display for Conjunction<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::conjunction(self))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Atom, Literal, PositiveLiteral};

    fn pos(name: &str, terms: Vec<Term>) -> PositiveLiteral {
        PositiveLiteral::new(Atom::from_name(name, terms).unwrap())
    }

    fn x() -> Term {
        Term::universal("X").unwrap()
    }

    fn y() -> Term {
        Term::universal("Y").unwrap()
    }

    fn c() -> Term {
        Term::constant("c").unwrap()
    }

    fn d() -> Term {
        Term::constant("d").unwrap()
    }

    #[test]
    fn empty_conjunction_is_rejected() {
        assert_eq!(
            Conjunction::<Literal>::new(vec![]).unwrap_err(),
            ModelError::EmptyConjunction
        );
    }

    #[test]
    fn absent_element_is_reported_by_index() {
        let l = pos("p", vec![x()]);
        assert_eq!(
            Conjunction::from_optional(vec![Some(l), None]).unwrap_err(),
            ModelError::NullElement { index: 1 }
        );
    }

    #[test]
    fn getters_over_positive_literals() {
        let l1 = pos("p", vec![x(), c()]);
        let l2 = pos("p", vec![y(), x()]);
        let l3 = pos("q", vec![x(), d()]);
        let conjunction = Conjunction::new(vec![l1.clone(), l2.clone(), l3.clone()]).unwrap();

        assert_eq!(conjunction.literals(), &[l1.clone(), l2.clone(), l3.clone()]);
        let expected_vars: HashSet<Variable> = [x(), y()]
            .into_iter()
            .filter_map(|t| t.as_variable().cloned())
            .collect();
        assert_eq!(conjunction.variables(), &expected_vars);
        assert_eq!(
            conjunction.terms_of_type(TermType::UniversalVariable),
            [x(), y()].into_iter().collect()
        );
        assert!(conjunction.terms_of_type(TermType::Blank).is_empty());
        assert_eq!(
            conjunction.terms_of_type(TermType::AbstractConstant),
            [c(), d()].into_iter().collect()
        );

        let as_literals = Conjunction::new(vec![
            Literal::from(l1),
            Literal::from(l2),
            Literal::from(l3),
        ])
        .unwrap();
        assert_eq!(conjunction, as_literals);
    }

    #[test]
    fn negated_literals_contribute_variables() {
        let conjunction = Conjunction::new(vec![
            Literal::positive(Atom::from_name("p", vec![x(), c()]).unwrap()),
            Literal::negative(Atom::from_name("p", vec![y(), x()]).unwrap()),
        ])
        .unwrap();
        assert_eq!(conjunction.variables().len(), 2);
        assert_eq!(conjunction.universal_variables().count(), 2);
        assert_eq!(conjunction.existential_variables().count(), 0);
    }

    #[test]
    fn order_matters_for_equality_only() {
        let a = pos("p", vec![x()]);
        let b = pos("q", vec![y()]);
        let ab = Conjunction::new(vec![a.clone(), b.clone()]).unwrap();
        let ba = Conjunction::new(vec![b, a]).unwrap();
        assert_ne!(ab, ba);
        assert_eq!(ab.variables(), ba.variables());
        assert_eq!(ab.terms(), ba.terms());
    }

    #[test]
    fn duplicate_literals_do_not_duplicate_variables() {
        let a = pos("p", vec![x(), x()]);
        let conjunction = Conjunction::new(vec![a.clone(), a]).unwrap();
        assert_eq!(conjunction.len(), 2);
        assert_eq!(conjunction.variables().len(), 1);
        assert_eq!(conjunction.terms().len(), 1);
    }

    #[test]
    fn polarity_participates_in_equality() {
        let atom = Atom::from_name("p", vec![x()]).unwrap();
        let positive = Conjunction::new(vec![Literal::positive(atom.clone())]).unwrap();
        let negative = Conjunction::new(vec![Literal::negative(atom)]).unwrap();
        assert_ne!(positive, negative);
    }
}
