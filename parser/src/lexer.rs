//! Tokens of the rule language.
//!
//! Whitespace and `%` line comments are skipped. Token payloads are raw
//! slices of the input: escapes are decoded by the grammar, which can report
//! malformed escapes with a location.

use std::ops::Range;

use logos::{Lexer, Logos};

use crate::error::{ErrorKind, Location, ParsingError};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"(?:[ \t\r\n\f]+|%[^\n]*)")]
pub(crate) enum Token<'s> {
    /// `<iri>`, payload without the angle brackets.
    #[regex(r#"<[^<>"{}|^`\\\x00-\x20]*>"#, |lex| strip(lex.slice(), 1, 1))]
    Iri(&'s str),

    /// `prefix:local`, raw.
    #[regex(
        r"[A-Za-z_][A-Za-z0-9_-]*:(?:[A-Za-z0-9_-]|\\u[0-9A-Fa-f]{4}|\\U[0-9A-Fa-f]{8})+",
        |lex| lex.slice()
    )]
    PrefixedName(&'s str),

    /// A bare name such as `p` or `load-csv`, raw.
    #[regex(
        r"(?:[A-Za-z_]|\\u[0-9A-Fa-f]{4}|\\U[0-9A-Fa-f]{8})(?:[A-Za-z0-9_-]|\\u[0-9A-Fa-f]{4}|\\U[0-9A-Fa-f]{8})*",
        |lex| lex.slice()
    )]
    Name(&'s str),

    /// `?X`, payload without the `?`.
    #[regex(r"\?[A-Za-z0-9_]+", |lex| strip(lex.slice(), 1, 0))]
    UniversalVariable(&'s str),

    /// `!X`, payload without the `!`.
    #[regex(r"![A-Za-z0-9_]+", |lex| strip(lex.slice(), 1, 0))]
    ExistentialVariable(&'s str),

    #[regex(r"[+-]?[0-9]+", |lex| lex.slice())]
    Integer(&'s str),

    #[regex(r"[+-]?[0-9]*\.[0-9]+", |lex| lex.slice())]
    Decimal(&'s str),

    #[regex(
        r"[+-]?(?:[0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)[eE][+-]?[0-9]+",
        |lex| lex.slice()
    )]
    Double(&'s str),

    /// `"..."`, payload without quotes and still escaped.
    #[regex(r#""(?:[^"\\\r\n]|\\.)*""#, |lex| strip(lex.slice(), 1, 1))]
    String(&'s str),

    /// `'''...'''` or `"""..."""`, payload verbatim.
    #[token("'''", |lex| long_string(lex, "'''"))]
    #[token(r#"""""#, |lex| long_string(lex, r#"""""#))]
    LongString(&'s str),

    /// `@keyword` or a language tag, payload without the `@`.
    #[regex(r"@[A-Za-z][A-Za-z0-9-]*", |lex| strip(lex.slice(), 1, 0))]
    At(&'s str),

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("~")]
    Tilde,

    #[token(":-")]
    Implies,

    #[token(":")]
    Colon,

    #[token("^^")]
    DoubleCaret,
}

fn strip(slice: &str, head: usize, tail: usize) -> &str {
    slice.get(head..slice.len() - tail).unwrap_or_default()
}

fn long_string<'s>(lex: &mut Lexer<'s, Token<'s>>, delimiter: &str) -> Option<&'s str> {
    let rest = lex.remainder();
    let end = rest.find(delimiter)?;
    lex.bump(end + delimiter.len());
    Some(&rest[..end])
}

impl Token<'_> {
    /// How the token reads in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Iri(iri) => format!("<{iri}>"),
            Token::PrefixedName(s)
            | Token::Name(s)
            | Token::Integer(s)
            | Token::Decimal(s)
            | Token::Double(s) => (*s).to_owned(),
            Token::UniversalVariable(v) => format!("?{v}"),
            Token::ExistentialVariable(v) => format!("!{v}"),
            Token::String(s) => format!("\"{s}\""),
            Token::LongString(_) => "long string".to_owned(),
            Token::At(k) => format!("@{k}"),
            Token::LParen => "(".to_owned(),
            Token::RParen => ")".to_owned(),
            Token::Comma => ",".to_owned(),
            Token::Dot => ".".to_owned(),
            Token::Tilde => "~".to_owned(),
            Token::Implies => ":-".to_owned(),
            Token::Colon => ":".to_owned(),
            Token::DoubleCaret => "^^".to_owned(),
        }
    }
}

/// A token with its byte range in the input.
pub(crate) type Spanned<'s> = (Token<'s>, Range<usize>);

/// Splits `source` into tokens.
///
/// # Errors
///
/// Returns [`ErrorKind::Lexical`] at the first unrecognized input.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned<'_>>, ParsingError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let text: String = source[span.start..].chars().take(16).collect();
                return Err(ParsingError::at(
                    ErrorKind::Lexical(text),
                    Location::of_offset(source, span.start),
                ));
            }
        }
    }
    Ok(tokens)
}
