//! Property-based tests for conjunctions, rule safety and the store.

use std::collections::HashSet;

use proptest::prelude::*;
use rulelog_core::{
    AddOutcome, Atom, Conjunction, Fact, KnowledgeBase, Literal, LiteralKind, ModelError,
    PositiveLiteral, Predicate, Rule, Term, Variable,
};

fn variable_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["X", "Y", "Z", "W"])
}

fn constant_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["a", "b", "c", "http://example.org/d"])
}

fn term() -> impl Strategy<Value = Term> {
    prop_oneof![
        variable_name().prop_map(|n| Term::universal(n).unwrap()),
        constant_name().prop_map(|n| Term::constant(n).unwrap()),
    ]
}

fn atom() -> impl Strategy<Value = Atom> {
    (
        prop::sample::select(vec!["p", "q", "r"]),
        prop::collection::vec(term(), 0..4),
    )
        .prop_map(|(name, terms)| Atom::from_name(name, terms).unwrap())
}

fn literal() -> impl Strategy<Value = Literal> {
    (atom(), any::<bool>()).prop_map(|(atom, negated)| {
        if negated {
            Literal::negative(atom)
        } else {
            Literal::positive(atom)
        }
    })
}

fn ground_fact() -> impl Strategy<Value = Fact> {
    (
        prop::sample::select(vec!["p", "q"]),
        prop::collection::vec(constant_name(), 1..3),
    )
        .prop_map(|(name, args)| {
            Fact::new(
                Predicate::new(name, args.len()).unwrap(),
                args.into_iter().map(|a| Term::constant(a).unwrap()).collect(),
            )
            .unwrap()
        })
}

proptest! {
    /// Literals come back in the order they were given, and the variable set
    /// is the deduplicated union over all atoms.
    #[test]
    fn prop_conjunction_preserves_literals(literals in prop::collection::vec(literal(), 1..6)) {
        let conjunction = Conjunction::new(literals.clone()).unwrap();
        prop_assert_eq!(conjunction.literals(), literals.as_slice());

        let expected: HashSet<Variable> = literals
            .iter()
            .flat_map(|l| l.atom().variables().cloned().collect::<Vec<_>>())
            .collect();
        prop_assert_eq!(conjunction.variables(), &expected);
    }

    /// Duplicating literals never changes the derived sets.
    #[test]
    fn prop_duplicates_do_not_change_variables(literals in prop::collection::vec(literal(), 1..4)) {
        let once = Conjunction::new(literals.clone()).unwrap();
        let twice = Conjunction::new([literals.clone(), literals].concat()).unwrap();
        prop_assert_eq!(once.variables(), twice.variables());
        prop_assert_eq!(once.terms(), twice.terms());
    }

    /// Equality is order sensitive; derived sets are not.
    #[test]
    fn prop_order_matters_for_equality(a in literal(), b in literal()) {
        prop_assume!(a != b);
        let ab = Conjunction::new(vec![a.clone(), b.clone()]).unwrap();
        let ba = Conjunction::new(vec![b, a]).unwrap();
        prop_assert_ne!(&ab, &ba);
        prop_assert_eq!(ab.variables(), ba.variables());
    }

    /// A head using only positive-body variables is safe; adding a variable
    /// the body never mentions makes it unsafe.
    #[test]
    fn prop_head_safety(
        body_atoms in prop::collection::vec(atom(), 1..4),
        pick in any::<prop::sample::Index>(),
    ) {
        let body =
            Conjunction::new(body_atoms.into_iter().map(Literal::positive).collect()).unwrap();
        let covered: Vec<Term> = body.variables().iter().cloned().map(Term::Variable).collect();

        let mut head_terms = vec![Term::constant("k").unwrap()];
        if !covered.is_empty() {
            head_terms.push(covered[pick.index(covered.len())].clone());
        }
        let safe_head = Conjunction::new(vec![PositiveLiteral::new(
            Atom::from_name("h", head_terms.clone()).unwrap(),
        )])
        .unwrap();
        prop_assert!(Rule::new(safe_head, body.clone()).is_ok());

        head_terms.push(Term::universal("Fresh").unwrap());
        let unsafe_head = Conjunction::new(vec![PositiveLiteral::new(
            Atom::from_name("h", head_terms).unwrap(),
        )])
        .unwrap();
        prop_assert_eq!(
            Rule::new(unsafe_head, body).unwrap_err(),
            ModelError::UnsafeHeadVariable(Variable::universal("Fresh").unwrap())
        );
    }

    /// Re-adding statements leaves the store as a single addition would.
    #[test]
    fn prop_knowledge_base_idempotence(facts in prop::collection::vec(ground_fact(), 0..12)) {
        let mut kb = KnowledgeBase::new();
        kb.add_statements(facts.clone());
        let before: Vec<_> = kb.statements().cloned().collect();

        for fact in facts.iter().cloned() {
            prop_assert_eq!(kb.add_statement(fact), AddOutcome::Unchanged);
        }
        let after: Vec<_> = kb.statements().cloned().collect();
        prop_assert_eq!(&before, &after);

        let distinct: HashSet<&Fact> = facts.iter().collect();
        prop_assert_eq!(kb.len(), distinct.len());
    }
}
