//! The logical model: terms, atoms, literals, conjunctions, rules and the
//! statements a knowledge base stores.
//!
//! Every value is immutable once built and validated at construction.

mod atom;
mod conjunction;
mod literal;
mod rule;
mod statement;
mod term;

pub use atom::{Atom, Predicate};
pub use conjunction::Conjunction;
pub use literal::{Fact, Literal, LiteralKind, PositiveLiteral};
pub use rule::Rule;
pub use statement::{DataSourceDeclaration, Statement};
pub use term::{Blank, Constant, Term, TermType, Variable, VariableKind};

/// Well-known datatype IRIs.
pub mod iris {
    /// The XML Schema datatype namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// `xsd:string`, the datatype of plain quoted strings.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:double`.
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
}
