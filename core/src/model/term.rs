//! Terms: constants, variables and blanks.
//!
//! Term equality is purely structural. A universal `?X` and an existential
//! `!X` are different terms, and a constant never equals a variable even when
//! their payloads coincide.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::serializer::rls;

/// Quantifier of a [`Variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VariableKind {
    /// Universally quantified; written `?X`.
    Universal,
    /// Existentially quantified, head-only; written `!X`.
    Existential,
}

/// A named variable together with its quantifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variable {
    name: String,
    kind: VariableKind,
}

impl Variable {
    /// Creates a variable of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `name` is empty.
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Result<Self, ModelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::InvalidArgument(
                "variable name must not be empty".to_owned(),
            ));
        }
        Ok(Self { name, kind })
    }

    /// Creates a universal variable `?name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `name` is empty.
    pub fn universal(name: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(name, VariableKind::Universal)
    }

    /// Creates an existential variable `!name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `name` is empty.
    pub fn existential(name: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(name, VariableKind::Existential)
    }

    /// The variable name without its sigil.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The quantifier of this variable.
    #[must_use]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Returns true for `?X` variables.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.kind == VariableKind::Universal
    }

    /// Returns true for `!X` variables.
    #[must_use]
    pub fn is_existential(&self) -> bool {
        self.kind == VariableKind::Existential
    }
}

/// A ground value.
///
/// The lexical value ([`fmt::Display`]) of an abstract constant is its IRI or
/// name; literals render as `"lex"^^<datatype>` and `"lex"@lang`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    /// An IRI, or a bare name that was not resolved against a base.
    Abstract(String),
    /// A lexical value tagged with a datatype IRI.
    DatatypeLiteral {
        /// The unescaped lexical form.
        lexical: String,
        /// Full datatype IRI.
        datatype: String,
    },
    /// A string tagged with a language.
    LanguageString {
        /// The unescaped string.
        lexical: String,
        /// The language tag, e.g. `en-gb`.
        language: String,
    },
}

impl Constant {
    /// Creates an abstract constant (IRI or name).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `iri` is empty.
    pub fn abstract_constant(iri: impl Into<String>) -> Result<Self, ModelError> {
        let iri = iri.into();
        if iri.is_empty() {
            return Err(ModelError::InvalidArgument(
                "constant name must not be empty".to_owned(),
            ));
        }
        Ok(Constant::Abstract(iri))
    }

    /// Creates a datatype literal. The lexical form may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `datatype` is empty.
    pub fn datatype_literal(
        lexical: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let datatype = datatype.into();
        if datatype.is_empty() {
            return Err(ModelError::InvalidArgument(
                "literal datatype must not be empty".to_owned(),
            ));
        }
        Ok(Constant::DatatypeLiteral {
            lexical: lexical.into(),
            datatype,
        })
    }

    /// Creates a language-tagged string.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `language` is empty.
    pub fn language_string(
        lexical: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let language = language.into();
        if language.is_empty() {
            return Err(ModelError::InvalidArgument(
                "language tag must not be empty".to_owned(),
            ));
        }
        Ok(Constant::LanguageString {
            lexical: lexical.into(),
            language,
        })
    }

    /// Shorthand for an `xsd:string` literal.
    #[must_use]
    pub fn string(lexical: impl Into<String>) -> Self {
        Constant::DatatypeLiteral {
            lexical: lexical.into(),
            datatype: super::iris::XSD_STRING.to_owned(),
        }
    }

    /// Shorthand for an `xsd:integer` literal.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Constant::DatatypeLiteral {
            lexical: value.to_string(),
            datatype: super::iris::XSD_INTEGER.to_owned(),
        }
    }
}

/// An anonymous individual, identified only by its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Blank(String);

impl Blank {
    /// Creates a blank with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ModelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::InvalidArgument(
                "blank identifier must not be empty".to_owned(),
            ));
        }
        Ok(Blank(id))
    }

    /// The identifier of this blank.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Type tag of a [`Term`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TermType {
    /// [`Constant::Abstract`].
    AbstractConstant,
    /// [`Constant::DatatypeLiteral`].
    DatatypeConstant,
    /// [`Constant::LanguageString`].
    LanguageStringConstant,
    /// A `?X` variable.
    UniversalVariable,
    /// A `!X` variable.
    ExistentialVariable,
    /// A [`Blank`].
    Blank,
}

impl TermType {
    /// Returns true for the three constant tags.
    #[must_use]
    pub fn is_constant(self) -> bool {
        matches!(
            self,
            TermType::AbstractConstant
                | TermType::DatatypeConstant
                | TermType::LanguageStringConstant
        )
    }

    /// Returns true for the two variable tags.
    #[must_use]
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            TermType::UniversalVariable | TermType::ExistentialVariable
        )
    }
}

/// An argument of an atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// A ground value.
    Constant(Constant),
    /// A universal or existential variable.
    Variable(Variable),
    /// An anonymous individual.
    Blank(Blank),
}

impl Term {
    /// Shorthand for a universal variable term.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `name` is empty.
    pub fn universal(name: impl Into<String>) -> Result<Self, ModelError> {
        Variable::universal(name).map(Term::Variable)
    }

    /// Shorthand for an existential variable term.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `name` is empty.
    pub fn existential(name: impl Into<String>) -> Result<Self, ModelError> {
        Variable::existential(name).map(Term::Variable)
    }

    /// Shorthand for an abstract constant term.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] if `iri` is empty.
    pub fn constant(iri: impl Into<String>) -> Result<Self, ModelError> {
        Constant::abstract_constant(iri).map(Term::Constant)
    }

    /// The type tag of this term.
    #[must_use]
    pub fn term_type(&self) -> TermType {
        match self {
            Term::Constant(Constant::Abstract(_)) => TermType::AbstractConstant,
            Term::Constant(Constant::DatatypeLiteral { .. }) => TermType::DatatypeConstant,
            Term::Constant(Constant::LanguageString { .. }) => TermType::LanguageStringConstant,
            Term::Variable(v) if v.is_universal() => TermType::UniversalVariable,
            Term::Variable(_) => TermType::ExistentialVariable,
            Term::Blank(_) => TermType::Blank,
        }
    }

    /// Returns true if this term is a constant.
    #[must_use]
    pub fn is_ground(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// Returns the variable if this term is one.
    #[must_use]
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Self {
        Term::Variable(v)
    }
}

impl From<Constant> for Term {
    fn from(c: Constant) -> Self {
        Term::Constant(c)
    }
}

impl From<Blank> for Term {
    fn from(b: Blank) -> Self {
        Term::Blank(b)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::variable(self))
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Abstract(iri) => f.write_str(iri),
            _ => f.write_str(&rls::constant(self)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rls::term(self))
    }
}
