//! Rule-language serializer.
//!
//! Every `Display` impl of the model delegates here. Absolute IRIs are
//! written as `<iri>`, or as `prefix:local` when serializing with prefix
//! declarations. Any other name is written bare, with characters the name
//! token does not allow escaped as `\uXXXX`. Output never declares a base,
//! so bare names parse back verbatim.

use std::fmt::Write as _;

use crate::knowledge_base::KnowledgeBase;
use crate::model::iris::XSD_STRING;
use crate::model::{
    Atom, Blank, Conjunction, Constant, DataSourceDeclaration, Fact, LiteralKind, Rule, Statement,
    Term, Variable, VariableKind,
};
use crate::prefixes::{is_absolute, PrefixDeclarations};

/// Returns true if `s` can be written without angle brackets:
/// `[A-Za-z_][A-Za-z0-9_-]*`.
#[must_use]
pub fn is_bare_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Returns true if `s` can follow `prefix:` in a prefixed name.
#[must_use]
pub fn is_local_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Returns true if `iri` can be written between angle brackets.
#[must_use]
pub fn is_iri_token(iri: &str) -> bool {
    iri.chars().all(|c| {
        c > ' ' && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
    })
}

/// Writes `name` as a name token, escaping every character outside
/// `[A-Za-z0-9_-]` (and a leading digit or `-`).
#[must_use]
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        let plain = if i == 0 {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || c == '_' || c == '-'
        };
        push_escaped(&mut out, c, plain);
    }
    out
}

/// Writes the local part of `_:id` or `prefix:local`.
fn escape_local(local: &str) -> String {
    let mut out = String::with_capacity(local.len());
    for c in local.chars() {
        push_escaped(&mut out, c, c.is_ascii_alphanumeric() || c == '_' || c == '-');
    }
    out
}

fn push_escaped(out: &mut String, c: char, plain: bool) {
    if plain {
        out.push(c);
    } else if u32::from(c) > 0xFFFF {
        let _ = write!(out, "\\U{:08X}", u32::from(c));
    } else {
        let _ = write!(out, "\\u{:04X}", u32::from(c));
    }
}

/// Escapes `s` for use between double quotes.
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}

/// A double-quoted, escaped string.
#[must_use]
pub fn string_literal(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

struct Writer<'a> {
    prefixes: Option<&'a PrefixDeclarations>,
}

const PLAIN: Writer<'static> = Writer { prefixes: None };

impl Writer<'_> {
    fn name(&self, iri: &str) -> String {
        if is_bare_name(iri) {
            return iri.to_owned();
        }
        if let Some(abbreviated) = self.prefixes.and_then(|p| p.abbreviate(iri)) {
            return abbreviated;
        }
        if is_absolute(iri) && is_iri_token(iri) {
            format!("<{iri}>")
        } else {
            escape_name(iri)
        }
    }

    fn constant(&self, constant: &Constant) -> String {
        match constant {
            Constant::Abstract(iri) => self.name(iri),
            Constant::DatatypeLiteral { lexical, datatype } if datatype == XSD_STRING => {
                string_literal(lexical)
            }
            Constant::DatatypeLiteral { lexical, datatype } => {
                let datatype = self
                    .prefixes
                    .and_then(|p| p.abbreviate(datatype))
                    .unwrap_or_else(|| format!("<{datatype}>"));
                format!("{}^^{datatype}", string_literal(lexical))
            }
            Constant::LanguageString { lexical, language } => {
                format!("{}@{language}", string_literal(lexical))
            }
        }
    }

    fn term(&self, term: &Term) -> String {
        match term {
            Term::Constant(c) => self.constant(c),
            Term::Variable(v) => variable(v),
            Term::Blank(b) => blank(b),
        }
    }

    fn atom(&self, atom: &Atom) -> String {
        let args: Vec<String> = atom.terms().iter().map(|t| self.term(t)).collect();
        format!("{}({})", self.name(atom.predicate().name()), args.join(", "))
    }

    fn literal<L: LiteralKind>(&self, literal: &L) -> String {
        if literal.is_negated() {
            format!("~{}", self.atom(literal.atom()))
        } else {
            self.atom(literal.atom())
        }
    }

    fn conjunction<L: LiteralKind>(&self, conjunction: &Conjunction<L>) -> String {
        conjunction
            .iter()
            .map(|l| self.literal(l))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn rule(&self, rule: &Rule) -> String {
        format!(
            "{} :- {} .",
            self.conjunction(rule.head()),
            self.conjunction(rule.body())
        )
    }

    fn declaration(&self, declaration: &DataSourceDeclaration) -> String {
        format!(
            "@source {}({}) : {} .",
            self.name(declaration.predicate().name()),
            declaration.predicate().arity(),
            declaration.source().syntactic_form()
        )
    }

    fn statement(&self, statement: &Statement) -> String {
        match statement {
            Statement::Fact(fact) => format!("{} .", self.atom(fact.atom())),
            Statement::Rule(rule) => self.rule(rule),
            Statement::DataSourceDeclaration(d) => self.declaration(d),
        }
    }
}

/// `?X` or `!X`.
#[must_use]
pub fn variable(variable: &Variable) -> String {
    match variable.kind() {
        VariableKind::Universal => format!("?{}", variable.name()),
        VariableKind::Existential => format!("!{}", variable.name()),
    }
}

/// `_:id`.
#[must_use]
pub fn blank(blank: &Blank) -> String {
    format!("_:{}", escape_local(blank.id()))
}

/// A constant: bare name, `<iri>`, `"lex"`, `"lex"^^<dt>` or `"lex"@lang`.
#[must_use]
pub fn constant(constant: &Constant) -> String {
    PLAIN.constant(constant)
}

/// Any term.
#[must_use]
pub fn term(term: &Term) -> String {
    PLAIN.term(term)
}

/// `pred(t1, t2)`.
#[must_use]
pub fn atom(atom: &Atom) -> String {
    PLAIN.atom(atom)
}

/// An atom, prefixed with `~` when negated.
#[must_use]
pub fn literal<L: LiteralKind>(literal: &L) -> String {
    PLAIN.literal(literal)
}

/// Literals separated by `, `.
#[must_use]
pub fn conjunction<L: LiteralKind>(conjunction: &Conjunction<L>) -> String {
    PLAIN.conjunction(conjunction)
}

/// `pred(c1, c2) .`
#[must_use]
pub fn fact(fact: &Fact) -> String {
    format!("{} .", PLAIN.atom(fact.atom()))
}

/// `head :- body .`
#[must_use]
pub fn rule(rule: &Rule) -> String {
    PLAIN.rule(rule)
}

/// `@source pred(arity) : source(args) .`
#[must_use]
pub fn data_source_declaration(declaration: &DataSourceDeclaration) -> String {
    PLAIN.declaration(declaration)
}

/// Any statement, terminated by ` .`.
#[must_use]
pub fn statement(statement: &Statement) -> String {
    PLAIN.statement(statement)
}

/// Serializes every statement of `kb`, one per line, in insertion order.
#[must_use]
pub fn to_rls(kb: &KnowledgeBase) -> String {
    let mut out = String::new();
    for statement in kb.statements() {
        out.push_str(&PLAIN.statement(statement));
        out.push('\n');
    }
    out
}

/// Serializes `kb` after `@prefix` lines for `prefixes`, abbreviating IRIs
/// wherever a prefix allows it. The base of `prefixes` is not written: names
/// that were relative to it are already absolute in the model.
#[must_use]
pub fn to_rls_with_prefixes(kb: &KnowledgeBase, prefixes: &PrefixDeclarations) -> String {
    let mut out = String::new();
    for (prefix, iri) in prefixes.iter() {
        let _ = writeln!(out, "@prefix {prefix}: <{iri}> .");
    }
    if prefixes.iter().next().is_some() {
        out.push('\n');
    }
    let writer = Writer {
        prefixes: Some(prefixes),
    };
    for statement in kb.statements() {
        out.push_str(&writer.statement(statement));
        out.push('\n');
    }
    out
}
