use crate::{
    lexer::prelude::{LexicalError, Token},
    utils::prelude::{Label, SrcSpan},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    MissingBegin,
    MissingEnd,
    DuplicateBegin,
    DuplicateEnd,
    TokenOutsideProgram { token: Token },
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    UnexpectedEof,
    ExpectedIdent,
    ExpectedType,
    ExpectedExpression,
    ExpectedStatement,
    ReservedKeyword { token: Token },
    UndeclaredVariable { variable: String },
    VariableRedeclaration {
        variable: String,
        first: SrcSpan,
    },
    InvalidAssignmentTarget,
    InvalidIncrementTarget,
    AssignmentInCondition,
    ConcatOutsideDisplay,
    InvalidBooleanLiteral { lexeme: String },
    Lexical { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan,
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::MissingBegin => (
                "Expected the `SUGOD` program marker",
                vec!["Every program starts with `SUGOD`".into()],
            ),
            ParseErrorType::MissingEnd => (
                "Expected the `KATAPUSAN` program marker",
                vec!["Every program ends with `KATAPUSAN`".into()],
            ),
            ParseErrorType::DuplicateBegin => ("Second `SUGOD` marker", vec![]),
            ParseErrorType::DuplicateEnd => ("Second `KATAPUSAN` marker", vec![]),
            ParseErrorType::TokenOutsideProgram { token } => (
                "Code outside the program markers",
                vec![format!(
                    "`{}` must appear between `SUGOD` and `KATAPUSAN`",
                    token.as_literal()
                )],
            ),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = match token {
                    Token::Int(_) => "an integer".to_string(),
                    Token::Float(_) => "a decimal number".to_string(),
                    Token::Ident(_) => "an identifier".to_string(),
                    _ if token.is_reserved_word() => {
                        format!("the keyword `{}`", token.as_literal())
                    },
                    _ => format!("`{}`", token.as_literal()),
                };

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::ExpectedIdent => ("Expected identifier", vec![]),
            ParseErrorType::ExpectedType => (
                "Expected a type",
                vec!["One of `NUMERO`, `TIPIK`, `LETRA`, `TINUOD` or `PULONG`".into()],
            ),
            ParseErrorType::ExpectedExpression => ("Expected an expression", vec![]),
            ParseErrorType::ExpectedStatement => ("Expected a statement", vec![]),
            ParseErrorType::ReservedKeyword { token } => (
                "Reserved keyword",
                vec![format!(
                    "`{}` is a reserved word and cannot be used as a variable name",
                    token.as_literal()
                )],
            ),
            ParseErrorType::UndeclaredVariable { variable } => (
                "Undeclared variable",
                vec![format!("Variable `{variable}` was never declared with `MUGNA`")],
            ),
            ParseErrorType::VariableRedeclaration { variable, .. } => (
                "Variable declared twice",
                vec![format!("Variable `{variable}` was already declared")],
            ),
            ParseErrorType::InvalidAssignmentTarget => (
                "Invalid assignment target",
                vec!["Only a variable can stand on the left of `=`".into()],
            ),
            ParseErrorType::InvalidIncrementTarget => (
                "Invalid increment target",
                vec!["`++` applies to a variable".into()],
            ),
            ParseErrorType::AssignmentInCondition => (
                "Assignment inside a condition",
                vec!["Use `==` to compare values".into()],
            ),
            ParseErrorType::ConcatOutsideDisplay => (
                "`&` outside of `IPAKITA`",
                vec!["Concatenation is only available in `IPAKITA` arguments".into()],
            ),
            ParseErrorType::InvalidBooleanLiteral { lexeme } => (
                "Invalid boolean literal",
                vec![format!(
                    "A `TINUOD` value is written exactly \"OO\" or \"DILI\", found \"{lexeme}\""
                )],
            ),
            ParseErrorType::Lexical { error } => error.details(),
        }
    }

    pub fn extra_labels(&self) -> Vec<Label> {
        match &self.error {
            ParseErrorType::VariableRedeclaration { first, .. } => vec![Label {
                text: Some("First declared here".into()),
                span: *first,
            }],
            _ => vec![],
        }
    }
}

/// Warnings the parser can surface without running the program. It owns the
/// declared-variable table, so unused names and constant conditions are
/// visible to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    UnusedVariable { location: SrcSpan },
    UnreachableIfClause { location: SrcSpan },
    UnreachableElseClause { location: SrcSpan },
    UnreachableWhileClause { location: SrcSpan },
    InfiniteLoop { location: SrcSpan },
}

impl ParseWarning {
    pub fn location(&self) -> SrcSpan {
        match self {
            ParseWarning::UnusedVariable { location }
            | ParseWarning::UnreachableIfClause { location }
            | ParseWarning::UnreachableElseClause { location }
            | ParseWarning::UnreachableWhileClause { location }
            | ParseWarning::InfiniteLoop { location } => *location,
        }
    }
}
