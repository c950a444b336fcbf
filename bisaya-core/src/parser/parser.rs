use std::collections::HashMap;

use crate::lexer::prelude::{lex, Spanned, Token};
use crate::utils::prelude::SrcSpan;
use super::ast::{IdentifierType, Module, Parsed, Program};
use super::error::{ParseError, ParseErrorType, ParseWarning};

pub trait Parse
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser,
        precedence: Option<Precedence>,
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser,
        left: super::ast::Expression,
        precedence: Option<Precedence>,
    ) -> Result<Self, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeclaredVar {
    pub kind: IdentifierType,
    pub location: SrcSpan,
    pub used: bool,
}

pub struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,

    /// Names declared so far, with their declared kinds. Used for
    /// validation only; evaluation keeps its own environment.
    pub declared: HashMap<String, DeclaredVar>,

    /// `&` concatenation and the `$` literal are only legal while parsing
    /// `IPAKITA` arguments.
    pub inside_display: bool,
    /// `=` may not assign inside a `KUNG`/`SAMTANG` condition.
    pub inside_conditional: bool,
    /// Empty statements are tolerated inside if-block bodies only.
    pub inside_if_block: bool,

    warnings: Vec<ParseWarning>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Spanned>) -> Self {
        if !matches!(tokens.last(), Some((_, Token::Eof, _))) {
            let end = tokens.last().map(|(_, _, end)| *end).unwrap_or(0);
            tokens.push((end, Token::Eof, end));
        }

        Self {
            tokens,
            cursor: 0,
            declared: HashMap::new(),
            inside_display: false,
            inside_conditional: false,
            inside_if_block: false,
            warnings: vec![],
        }
    }

    pub fn current(&self) -> &Spanned {
        match self.tokens.get(self.cursor) {
            Some(spanned) => spanned,
            None => &self.tokens[self.tokens.len() - 1],
        }
    }

    pub fn peek(&self) -> &Spanned {
        match self.tokens.get(self.cursor + 1) {
            Some(spanned) => spanned,
            None => &self.tokens[self.tokens.len() - 1],
        }
    }

    pub fn step(&mut self) {
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
    }

    pub fn skip_newlines(&mut self) {
        while matches!(self.current().1, Token::Newline) {
            self.step();
        }
    }

    pub fn current_precedence(&self) -> Precedence {
        Precedence::from(&self.current().1)
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        let (start, current, end) = self.current().clone();

        if current == token {
            self.step();
            return Ok((start, end));
        }

        match current {
            Token::Eof => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start, end },
            ),
            _ => parse_error(
                ParseErrorType::UnexpectedToken {
                    token: current,
                    expected: vec![format!("`{}`", token.as_literal())],
                },
                SrcSpan { start, end },
            ),
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        let (start, current, end) = self.current().clone();

        match current {
            Token::Ident(value) => {
                self.step();
                Ok((start, value, end))
            },
            token if token.is_reserved_word() => parse_error(
                ParseErrorType::ReservedKeyword { token },
                SrcSpan { start, end },
            ),
            Token::Eof => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start, end },
            ),
            _ => parse_error(
                ParseErrorType::ExpectedIdent,
                SrcSpan { start, end },
            ),
        }
    }

    /// Records a declaration, rejecting a second one for the same name.
    pub fn declare(
        &mut self,
        name: String,
        kind: IdentifierType,
        location: SrcSpan,
    ) -> Result<(), ParseError> {
        match self.declared.get(&name) {
            Some(existing) => parse_error(
                ParseErrorType::VariableRedeclaration {
                    variable: name.clone(),
                    first: existing.location,
                },
                location,
            ),
            None => {
                self.declared.insert(name, DeclaredVar { kind, location, used: false });
                Ok(())
            }
        }
    }

    /// Validates that a referenced name has been declared and marks it used.
    pub fn reference(&mut self, name: &str, location: SrcSpan) -> Result<(), ParseError> {
        match self.declared.get_mut(name) {
            Some(var) => {
                var.used = true;
                Ok(())
            },
            None => parse_error(
                ParseErrorType::UndeclaredVariable { variable: name.into() },
                location,
            ),
        }
    }

    pub fn warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    pub fn parse(&mut self) -> Result<Parsed, ParseError> {
        let program = Program::parse(self, None)?;

        let mut unused = self.declared.values()
            .filter(|var| !var.used)
            .map(|var| var.location)
            .collect::<Vec<SrcSpan>>();
        unused.sort();

        for location in unused {
            self.warnings.push(ParseWarning::UnusedVariable { location });
        }

        self.warnings.sort_by_key(|warning| warning.location());

        Ok(Parsed {
            module: Module {
                name: "".into(),
                program,
            },
            warnings: std::mem::take(&mut self.warnings),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Assign,
    Or,
    And,
    Equals,
    Comparison,
    Term,
    Factor,
    Prefix,
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::Assign => Self::Assign,
            Token::Or => Self::Or,
            Token::And => Self::And,
            Token::EqualEqual | Token::NotEqual => Self::Equals,
            Token::Less | Token::Greater |
            Token::LessEqual | Token::GreaterEqual => Self::Comparison,
            Token::Plus | Token::Minus | Token::Ampersand => Self::Term,
            Token::Star | Token::Slash | Token::Percent => Self::Factor,
            _ => Self::Lowest,
        }
    }
}

/// Parses a token sequence into a program tree, after validating the
/// program-marker structure.
pub fn parse_program(tokens: Vec<Spanned>) -> Result<Parsed, ParseError> {
    validate_structure(&tokens)?;

    Parser::new(tokens).parse()
}

/// Lexes and parses a whole source text.
pub fn parse_module(src: &str) -> Result<Parsed, ParseError> {
    let tokens = lex(src).map_err(|error| ParseError {
        span: error.location,
        error: ParseErrorType::Lexical { error },
    })?;

    parse_program(tokens)
}

// Exactly one `SUGOD` and one `KATAPUSAN`, and nothing but newlines outside
// of them, before any statement is looked at.
fn validate_structure(tokens: &[Spanned]) -> Result<(), ParseError> {
    let mut begin: Option<SrcSpan> = None;
    let mut end: Option<SrcSpan> = None;

    for (start, token, stop) in tokens {
        let span = SrcSpan::from(*start, *stop);

        match token {
            Token::Begin => match (&begin, &end) {
                (Some(_), _) => return parse_error(ParseErrorType::DuplicateBegin, span),
                (None, Some(_)) => return parse_error(
                    ParseErrorType::TokenOutsideProgram { token: token.clone() },
                    span,
                ),
                (None, None) => begin = Some(span),
            },
            Token::End => match end {
                Some(_) => return parse_error(ParseErrorType::DuplicateEnd, span),
                None => end = Some(span),
            },
            Token::Newline | Token::Eof => {},
            _ => {
                if begin.is_none() || end.is_some() {
                    return parse_error(
                        ParseErrorType::TokenOutsideProgram { token: token.clone() },
                        span,
                    );
                }
            }
        }
    }

    let last = tokens.last()
        .map(|(start, _, end)| SrcSpan::from(*start, *end))
        .unwrap_or(SrcSpan::from(0, 0));

    if begin.is_none() {
        return parse_error(ParseErrorType::MissingBegin, last);
    }

    if end.is_none() {
        return parse_error(ParseErrorType::MissingEnd, last);
    }

    Ok(())
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
