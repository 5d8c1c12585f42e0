//! Recursive-descent grammar over the token stream of [`crate::lexer`].
//!
//! ```text
//! document   := statement*
//! statement  := directive | clause "."
//! clause     := literal ("," literal)* (":-" literal ("," literal)*)?
//! literal    := "~"? atom
//! atom       := name "(" (term ("," term)*)? ")"
//! directive  := "@base" IRI "."
//!             | "@prefix" NAME ":" IRI "."
//!             | "@source" name "(" INTEGER ")" ":" NAME "(" arguments ")" "."
//!             | "@" KEYWORD arguments "."
//! ```

use std::str::Chars;

use rulelog_core::model::iris::{XSD_DECIMAL, XSD_DOUBLE, XSD_INTEGER, XSD_STRING};
use rulelog_core::{
    Atom, Blank, Constant, DataSourceDeclaration, Fact, Literal, Predicate, Rule, Statement, Term,
};

use crate::directive::{validate_non_negative_integer, DirectiveArgument, ParserContext};
use crate::error::{ErrorKind, Location, ParsingError};
use crate::lexer::{tokenize, Spanned, Token};

/// Parses every statement of `source`; directives update `context`.
pub(crate) fn parse_document(
    source: &str,
    context: &mut ParserContext<'_>,
) -> Result<Vec<Statement>, ParsingError> {
    let mut parser = Parser::new(source, context)?;
    let mut statements = Vec::new();
    while !parser.at_end() {
        statements.extend(parser.statement()?);
    }
    Ok(statements)
}

pub(crate) struct Parser<'s, 'x, 'c> {
    source: &'s str,
    tokens: Vec<Spanned<'s>>,
    position: usize,
    context: &'x mut ParserContext<'c>,
}

impl<'s, 'x, 'c> Parser<'s, 'x, 'c> {
    pub(crate) fn new(
        source: &'s str,
        context: &'x mut ParserContext<'c>,
    ) -> Result<Self, ParsingError> {
        Ok(Self {
            source,
            tokens: tokenize(source)?,
            position: 0,
            context,
        })
    }

    pub(crate) fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Fails unless all input is consumed, after an optional closing `.`.
    pub(crate) fn finish(&mut self, optional_dot: bool) -> Result<(), ParsingError> {
        if optional_dot && self.peek() == Some(Token::Dot) {
            self.position += 1;
        }
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.position).map(|(token, _)| *token)
    }

    fn location(&self) -> Location {
        let offset = self
            .tokens
            .get(self.position)
            .map_or(self.source.len(), |(_, span)| span.start);
        Location::of_offset(self.source, offset)
    }

    fn unexpected(&self, expected: &str) -> ParsingError {
        let kind = match self.peek() {
            Some(token) => ErrorKind::UnexpectedToken {
                found: token.describe(),
                expected: expected.to_owned(),
            },
            None => ErrorKind::UnexpectedEnd(expected.to_owned()),
        };
        ParsingError::at(kind, self.location())
    }

    fn expect_token(&mut self, token: Token<'s>, expected: &str) -> Result<(), ParsingError> {
        if self.peek() == Some(token) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// One statement or directive, with its terminating `.`. Directives may
    /// contribute any number of statements.
    pub(crate) fn statement(&mut self) -> Result<Vec<Statement>, ParsingError> {
        if let Some(Token::At(keyword)) = self.peek() {
            let location = self.location();
            self.position += 1;
            return self.directive(keyword).map_err(|e| e.or_at(location));
        }
        let statement = self.clause()?;
        self.expect_token(Token::Dot, "`.` or `:-`")?;
        Ok(vec![statement])
    }

    /// A fact or a rule, without the terminating `.`.
    pub(crate) fn clause(&mut self) -> Result<Statement, ParsingError> {
        let location = self.location();
        let head = self.literals()?;

        if self.peek() == Some(Token::Implies) {
            self.position += 1;
            let body = self.literals()?;
            let head = head
                .into_iter()
                .map(|literal| {
                    literal.as_positive().ok_or_else(|| {
                        ParsingError::at(
                            ErrorKind::InvalidStatement(
                                "negated literals are not allowed in rule heads".to_owned(),
                            ),
                            location,
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let rule = Rule::from_literals(head, body)
                .map_err(|e| ParsingError::from(e).or_at(location))?;
            return Ok(rule.into());
        }

        let [literal]: [Literal; 1] = head.try_into().map_err(|_| {
            ParsingError::at(
                ErrorKind::InvalidStatement(
                    "a fact is a single literal; rules need `:-`".to_owned(),
                ),
                location,
            )
        })?;
        let positive = literal.as_positive().ok_or_else(|| {
            ParsingError::at(
                ErrorKind::InvalidStatement("facts must not be negated".to_owned()),
                location,
            )
        })?;
        let fact = Fact::try_from(positive).map_err(|e| ParsingError::from(e).or_at(location))?;
        Ok(fact.into())
    }

    fn literals(&mut self) -> Result<Vec<Literal>, ParsingError> {
        let mut literals = vec![self.literal()?];
        while self.peek() == Some(Token::Comma) {
            self.position += 1;
            literals.push(self.literal()?);
        }
        Ok(literals)
    }

    /// `~`? atom
    pub(crate) fn literal(&mut self) -> Result<Literal, ParsingError> {
        let negated = self.peek() == Some(Token::Tilde);
        if negated {
            self.position += 1;
        }
        let atom = self.atom()?;
        Ok(if negated {
            Literal::negative(atom)
        } else {
            Literal::positive(atom)
        })
    }

    fn atom(&mut self) -> Result<Atom, ParsingError> {
        let location = self.location();
        let name = self.iri("a predicate name")?;
        self.expect_token(Token::LParen, "`(`")?;
        let mut terms = Vec::new();
        if self.peek() != Some(Token::RParen) {
            terms.push(self.term()?);
            while self.peek() == Some(Token::Comma) {
                self.position += 1;
                terms.push(self.term()?);
            }
        }
        self.expect_token(Token::RParen, "`,` or `)`")?;
        Atom::from_name(name, terms).map_err(|e| ParsingError::from(e).or_at(location))
    }

    /// An IRI, a prefixed name or a bare name, resolved.
    fn iri(&mut self, expected: &str) -> Result<String, ParsingError> {
        let location = self.location();
        let prefixes = self.context.prefixes();
        let resolved = match self.peek() {
            Some(Token::Iri(iri)) => prefixes.absolutize(iri).map_err(ParsingError::from),
            Some(Token::PrefixedName(raw)) => {
                let (prefix, local) = raw.split_once(':').unwrap_or(("", raw));
                unescape(local).and_then(|local| {
                    prefixes
                        .resolve_prefixed_name(prefix, &local)
                        .map_err(ParsingError::from)
                })
            }
            Some(Token::Name(raw)) => unescape(raw).map(|name| prefixes.resolve_bare_name(&name)),
            _ => return Err(self.unexpected(expected)),
        };
        self.position += 1;
        resolved.map_err(|e| e.or_at(location))
    }

    fn term(&mut self) -> Result<Term, ParsingError> {
        let location = self.location();
        let term = match self.peek() {
            Some(Token::UniversalVariable(name)) => {
                self.position += 1;
                Term::universal(name).map_err(ParsingError::from)
            }
            Some(Token::ExistentialVariable(name)) => {
                self.position += 1;
                Term::existential(name).map_err(ParsingError::from)
            }
            Some(Token::PrefixedName(raw)) if raw.starts_with("_:") => {
                self.position += 1;
                unescape(raw.get(2..).unwrap_or_default())
                    .and_then(|id| Blank::new(id).map_err(ParsingError::from))
                    .map(Term::Blank)
            }
            Some(Token::Iri(_) | Token::PrefixedName(_) | Token::Name(_)) => self
                .iri("a term")
                .and_then(|iri| Term::constant(iri).map_err(ParsingError::from)),
            Some(Token::Integer(lexical)) => self.number(lexical, XSD_INTEGER),
            Some(Token::Decimal(lexical)) => self.number(lexical, XSD_DECIMAL),
            Some(Token::Double(lexical)) => self.number(lexical, XSD_DOUBLE),
            Some(Token::String(_) | Token::LongString(_)) => {
                self.string_literal().map(Term::Constant)
            }
            _ => Err(self.unexpected("a term")),
        };
        term.map_err(|e| e.or_at(location))
    }

    fn number(&mut self, lexical: &str, datatype: &str) -> Result<Term, ParsingError> {
        self.position += 1;
        Ok(Term::Constant(Constant::datatype_literal(
            lexical, datatype,
        )?))
    }

    /// A quoted string with an optional `^^datatype` or adjacent `@language`.
    fn string_literal(&mut self) -> Result<Constant, ParsingError> {
        let location = self.location();
        let (lexical, end) = match self.tokens.get(self.position) {
            Some((Token::String(raw), span)) => {
                (unescape(raw).map_err(|e| e.or_at(location))?, span.end)
            }
            Some((Token::LongString(raw), span)) => ((*raw).to_owned(), span.end),
            _ => return Err(self.unexpected("a string")),
        };
        self.position += 1;

        match self.tokens.get(self.position) {
            Some((Token::DoubleCaret, _)) => {
                self.position += 1;
                if !matches!(self.peek(), Some(Token::Iri(_) | Token::PrefixedName(_))) {
                    return Err(self.unexpected("a datatype IRI"));
                }
                let datatype = self.iri("a datatype IRI")?;
                Ok(Constant::datatype_literal(lexical, datatype)?)
            }
            Some((Token::At(language), span)) if span.start == end => {
                let language = *language;
                self.position += 1;
                Ok(Constant::language_string(lexical, language)?)
            }
            _ => Ok(Constant::string(lexical)),
        }
    }

    fn name(&mut self, expected: &str) -> Result<&'s str, ParsingError> {
        match self.peek() {
            Some(Token::Name(name)) => {
                self.position += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn raw_iri(&mut self, expected: &str) -> Result<&'s str, ParsingError> {
        match self.peek() {
            Some(Token::Iri(iri)) => {
                self.position += 1;
                Ok(iri)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn directive(&mut self, keyword: &'s str) -> Result<Vec<Statement>, ParsingError> {
        match keyword {
            "base" => {
                let iri = self.raw_iri("the base IRI")?;
                self.expect_token(Token::Dot, "`.`")?;
                self.context.prefixes_mut().set_base(iri)?;
                Ok(Vec::new())
            }
            "prefix" => {
                let prefix = self.name("a prefix name")?;
                self.expect_token(Token::Colon, "`:`")?;
                let iri = self.raw_iri("the prefix IRI")?;
                self.expect_token(Token::Dot, "`.`")?;
                self.context.prefixes_mut().set_prefix(prefix, iri)?;
                Ok(Vec::new())
            }
            "source" => Ok(vec![self.source_declaration()?.into()]),
            other => self.custom_directive(other),
        }
    }

    fn source_declaration(&mut self) -> Result<DataSourceDeclaration, ParsingError> {
        let predicate_name = self.iri("a predicate name")?;
        self.expect_token(Token::LParen, "`(`")?;
        let arity = self.arity()?;
        self.expect_token(Token::RParen, "`)`")?;
        self.expect_token(Token::Colon, "`:`")?;

        let location = self.location();
        let handler_name = self.name("a data source name")?;
        self.expect_token(Token::LParen, "`(`")?;
        let arguments = self.arguments(Token::RParen)?;
        self.expect_token(Token::RParen, "`)`")?;
        self.expect_token(Token::Dot, "`.`")?;

        let handler = self
            .context
            .configuration()
            .data_source_handler(handler_name)
            .ok_or_else(|| {
                ParsingError::at(
                    ErrorKind::UnknownDataSource(handler_name.to_owned()),
                    location,
                )
            })?;
        tracing::debug!(
            source = handler_name,
            predicate = %predicate_name,
            arity,
            "dispatching data source declaration"
        );
        let source = handler
            .handle(&arguments, &*self.context)
            .map_err(|e| e.or_at(location))?;
        let predicate = Predicate::new(predicate_name, arity)?;
        DataSourceDeclaration::new(predicate, source)
            .map_err(|e| ParsingError::from(e).or_at(location))
    }

    fn arity(&mut self) -> Result<usize, ParsingError> {
        let location = self.location();
        let Some(Token::Integer(lexical)) = self.peek() else {
            return Err(self.unexpected("an arity"));
        };
        self.position += 1;
        let argument = DirectiveArgument::Term(Term::Constant(Constant::datatype_literal(
            lexical,
            XSD_INTEGER,
        )?));
        validate_non_negative_integer(&argument, "arity")
            .and_then(|arity| {
                usize::try_from(arity).map_err(|e| {
                    ParsingError::invalid_argument("arity", format!("{lexical}: {e}"))
                })
            })
            .map_err(|e| e.or_at(location))
    }

    fn custom_directive(&mut self, keyword: &'s str) -> Result<Vec<Statement>, ParsingError> {
        let arguments = self.arguments(Token::Dot)?;
        self.expect_token(Token::Dot, "`.`")?;
        let handler = self
            .context
            .configuration()
            .directive_handler(keyword)
            .ok_or_else(|| ErrorKind::UnknownDirective(keyword.to_owned()))?;
        tracing::debug!(
            directive = keyword,
            arguments = arguments.len(),
            "dispatching directive"
        );
        handler.handle(&arguments, self.context)
    }

    /// Arguments up to (not including) `close`, optionally comma-separated.
    fn arguments(&mut self, close: Token<'s>) -> Result<Vec<DirectiveArgument>, ParsingError> {
        let mut arguments = Vec::new();
        while self.peek().is_some_and(|token| token != close) {
            arguments.push(self.argument()?);
            if self.peek() == Some(Token::Comma) {
                self.position += 1;
            }
        }
        Ok(arguments)
    }

    fn argument(&mut self) -> Result<DirectiveArgument, ParsingError> {
        match self.peek() {
            Some(Token::Iri(iri)) => {
                let location = self.location();
                self.position += 1;
                let prefixes = self.context.prefixes();
                let iri = if prefixes.base().is_some() {
                    prefixes
                        .absolutize(iri)
                        .map_err(|e| ParsingError::from(e).or_at(location))?
                } else {
                    iri.to_owned()
                };
                Ok(DirectiveArgument::Iri(iri))
            }
            Some(Token::String(_) | Token::LongString(_)) => Ok(match self.string_literal()? {
                Constant::DatatypeLiteral { lexical, datatype } if datatype == XSD_STRING => {
                    DirectiveArgument::String(lexical)
                }
                other => DirectiveArgument::Term(Term::Constant(other)),
            }),
            _ => self.term().map(DirectiveArgument::Term),
        }
    }
}

fn malformed(message: impl Into<String>) -> ParsingError {
    ParsingError::new(ErrorKind::MalformedLiteral(message.into()))
}

/// Decodes the escapes of quoted strings and names: `\n \t \r \b \f \' \" \\`
/// and `\uXXXX`, `\UXXXXXXXX`.
fn unescape(raw: &str) -> Result<String, ParsingError> {
    if !raw.contains('\\') {
        return Ok(raw.to_owned());
    }
    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some(c @ ('\'' | '"' | '\\')) => c,
            Some('u') => code_point(&mut chars, 4)?,
            Some('U') => code_point(&mut chars, 8)?,
            Some(other) => return Err(malformed(format!("unknown escape `\\{other}`"))),
            None => return Err(malformed("dangling `\\`")),
        };
        decoded.push(escaped);
    }
    Ok(decoded)
}

fn code_point(chars: &mut Chars<'_>, digits: usize) -> Result<char, ParsingError> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed(format!("`{hex}` is not a {digits}-digit code point")));
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| malformed(format!("U+{hex} is not a character")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ParserConfiguration;

    fn parse(source: &str) -> Result<Vec<Statement>, ParsingError> {
        let configuration = ParserConfiguration::default();
        let mut context = ParserContext::new(&configuration);
        parse_document(source, &mut context)
    }

    #[test]
    fn escapes() {
        assert_eq!(unescape(r#"a\tb\"ca\\"#).unwrap(), "a\tb\"ca\\");
        assert_eq!(unescape(r"\U0001F600").unwrap(), "\u{1F600}");
        assert!(matches!(
            unescape(r"\q").unwrap_err().kind(),
            ErrorKind::MalformedLiteral(_)
        ));
        assert!(unescape(r"\u00").is_err());
        assert!(unescape(r"\uD800").is_err());
    }

    #[test]
    fn errors_point_at_the_offending_token() {
        let error = parse("p(a) .\nq(b) r(c) .").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::UnexpectedToken { .. }));
        assert_eq!(error.location(), Some(Location { line: 2, column: 6 }));

        let error = parse("p(a) .\n  q(").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::UnexpectedEnd(_)));
        assert_eq!(error.location(), Some(Location { line: 2, column: 5 }));
    }

    #[test]
    fn model_errors_are_located_at_the_statement() {
        let error = parse("p(a) .\nq(?X) :- p(?Y) .").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::Model(_)));
        assert_eq!(error.location(), Some(Location { line: 2, column: 1 }));
    }

    #[test]
    fn statement_shapes() {
        assert!(matches!(
            parse("p(a), q(b) .").unwrap_err().kind(),
            ErrorKind::InvalidStatement(_)
        ));
        assert!(matches!(
            parse("~p(a) .").unwrap_err().kind(),
            ErrorKind::InvalidStatement(_)
        ));
        assert!(matches!(
            parse("~q(?X) :- p(?X) .").unwrap_err().kind(),
            ErrorKind::InvalidStatement(_)
        ));
        assert_eq!(parse("p() .").unwrap().len(), 1);
    }

    #[test]
    fn language_tags_must_touch_the_string() {
        let statements = parse("p(\"chat\"@fr) .").unwrap();
        let fact = statements[0].as_fact().unwrap();
        assert_eq!(
            fact.terms()[0],
            Term::Constant(Constant::language_string("chat", "fr").unwrap())
        );
        assert!(parse("@import \"a.rls\" @prefix ex: <http://e.org/> .").is_err());
    }

    #[test]
    fn blanks_use_the_underscore_prefix() {
        let statements = parse("q(_:b1) :- p(?X) .").unwrap();
        let rule = statements[0].as_rule().unwrap();
        let head = rule.head().literals()[0].terms()[0].clone();
        assert_eq!(head, Term::Blank(Blank::new("b1").unwrap()));
    }

    #[test]
    fn source_arity_must_be_a_non_negative_integer() {
        let parsed = parse("@source p(+1) : load-csv(\"p.csv\") .").unwrap();
        assert_eq!(
            parsed[0].as_data_source_declaration().unwrap().predicate().arity(),
            1
        );

        let error = parse("@source p(-1) : load-csv(\"p.csv\") .").unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::InvalidArgument { description, .. } if description == "arity"
        ));
        assert_eq!(error.location(), Some(Location { line: 1, column: 11 }));

        assert!(matches!(
            parse("@source p(x) : load-csv(\"p.csv\") .").unwrap_err().kind(),
            ErrorKind::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn unknown_handlers() {
        assert!(matches!(
            parse("@source p(1) : load-json(\"p.json\") .").unwrap_err().kind(),
            ErrorKind::UnknownDataSource(name) if name == "load-json"
        ));
        assert!(matches!(
            parse("@include \"x.rls\" .").unwrap_err().kind(),
            ErrorKind::UnknownDirective(name) if name == "include"
        ));
    }
}
