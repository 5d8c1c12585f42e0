//! Error types for model construction, prefix resolution and caller-side
//! knowledge-base policies.
//!
//! Structural and safety violations are raised when a value is built: a
//! [`crate::Rule`] or [`crate::Fact`] that violates an invariant cannot exist.

use crate::model::{Predicate, Variable};

/// A violated structural or safety invariant of the term/rule model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A name, IRI or lexical value was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An atom was given a different number of terms than its predicate's arity.
    #[error("predicate {predicate} expects {} argument(s) but {found} were given", .predicate.arity())]
    ArityMismatch {
        /// The predicate of the atom being built.
        predicate: Predicate,
        /// Number of terms actually supplied.
        found: usize,
    },

    /// A fact argument is a variable or blank.
    #[error("fact {predicate} must be ground, but argument {position} is {term}")]
    NotGround {
        /// The predicate of the rejected fact.
        predicate: Predicate,
        /// Zero-based position of the offending argument.
        position: usize,
        /// Rendering of the offending term.
        term: String,
    },

    /// A conjunction was built from an empty literal sequence.
    #[error("a conjunction needs at least one literal")]
    EmptyConjunction,

    /// A conjunction element was absent.
    #[error("conjunction element {index} is absent")]
    NullElement {
        /// Zero-based index of the absent element.
        index: usize,
    },

    /// A universal head variable does not occur in any positive body literal.
    #[error("unsafe rule: head variable {0} does not occur in a positive body literal")]
    UnsafeHeadVariable(Variable),

    /// A variable of a negated body literal does not occur in any positive body literal.
    #[error("unsafe rule: variable {0} of a negated literal does not occur in a positive body literal")]
    UnsafeNegatedVariable(Variable),

    /// An existential variable occurs in the rule body.
    #[error("existential variable {0} may only occur in the rule head")]
    ExistentialInBody(Variable),

    /// A name is used both universally and existentially in one rule.
    #[error("variable name `{0}` is used both universally and existentially")]
    UniversalExistentialClash(String),

    /// A data source was bound to a predicate of the wrong arity.
    #[error("data source for {predicate} produces tuples of arity {required}")]
    DataSourceArity {
        /// The predicate of the declaration.
        predicate: Predicate,
        /// The arity the data source produces.
        required: usize,
    },
}

/// A failure to declare or resolve a prefix, base IRI or relative IRI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrefixError {
    /// The prefix is already bound to a different IRI.
    #[error("prefix `{prefix}:` is already bound to <{existing}>, cannot rebind it to <{requested}>")]
    PrefixConflict {
        /// The prefix name without the trailing colon.
        prefix: String,
        /// The IRI the prefix is bound to.
        existing: String,
        /// The IRI that was requested.
        requested: String,
    },

    /// The base IRI is already set to a different IRI.
    #[error("base IRI is already <{existing}>, cannot change it to <{requested}>")]
    BaseConflict {
        /// The current base IRI.
        existing: String,
        /// The IRI that was requested.
        requested: String,
    },

    /// A prefixed name uses a prefix that was never declared.
    #[error("prefix `{0}:` has not been declared")]
    UndeclaredPrefix(String),

    /// A relative IRI was used without a declared base IRI.
    #[error("relative IRI <{0}> cannot be resolved: no base IRI has been declared")]
    MissingBase(String),

    /// An IRI could not be parsed or resolved.
    #[error("invalid IRI <{iri}>: {reason}")]
    InvalidIri {
        /// The offending IRI text.
        iri: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// A violation of a caller-side knowledge-base policy.
///
/// The [`crate::KnowledgeBase`] itself accepts every statement; these errors
/// come from policy objects such as [`crate::policy::SingleSourcePerPredicate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// A predicate already has a data source.
    #[error("predicate {0} already has a data source")]
    MultipleDataSources(Predicate),

    /// Facts and a data source were both given for a predicate.
    #[error("predicate {0} cannot have both facts and a data source")]
    FactsAndDataSource(Predicate),
}
