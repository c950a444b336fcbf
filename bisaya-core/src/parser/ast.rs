use std::fmt::Display;

use crate::{
    lexer::prelude::Token,
    parser::prelude::{
        parse_error, InfixParse, Parse, ParseError, ParseErrorType, ParseWarning, Parser,
        Precedence,
    },
    utils::prelude::SrcSpan,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub module: Module,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub program: Program,
}

// program -> SUGOD { <statement> } KATAPUSAN
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan,
}

impl Parse for Program {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        parser.skip_newlines();
        let (start, _) = parser.expect_one(Token::Begin)?;

        let mut statements = vec![];

        let end = loop {
            parser.skip_newlines();

            match &parser.current().1 {
                Token::End => {
                    let (_, end) = parser.expect_one(Token::End)?;
                    break end;
                },
                Token::Eof => {
                    let (start, _, end) = *parser.current();
                    return parse_error(
                        ParseErrorType::MissingEnd,
                        SrcSpan { start, end },
                    );
                },
                _ => statements.push(Statement::parse(parser, None)?),
            }
        };

        Ok(Self {
            statements,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| format!("{}", statement))
            .collect::<Vec<String>>();

        write!(f, "SUGOD\n{}\nKATAPUSAN", statements.join("\n"))
    }
}

// statement -> <declaration> | <assignment> | <increment> | <input>
//            | <output> | <conditional> | <conditional_loop> | <fixed_loop>
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Assignment(Assignment),
    Increment(Increment),
    Input(Input),
    Output(Output),
    Conditional(Conditional),
    ConditionalLoop(ConditionalLoop),
    FixedLoop(FixedLoop),
    Empty { location: SrcSpan },
}

impl Parse for Statement {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        parser.skip_newlines();

        let (start, token, end) = parser.current().clone();

        let statement = match token {
            Token::Declare => Self::Declaration(Declaration::parse(parser, None)?),
            Token::Ident(_) => {
                if matches!(parser.peek().1, Token::Increment) {
                    Self::Increment(Increment::parse(parser, None)?)
                } else {
                    Self::Assignment(Assignment::parse(parser, None)?)
                }
            },
            Token::Display => Self::Output(Output::parse(parser, None)?),
            Token::Input => Self::Input(Input::parse(parser, None)?),
            Token::If => Self::Conditional(Conditional::parse(parser, None)?),
            Token::While => Self::ConditionalLoop(ConditionalLoop::parse(parser, None)?),
            Token::For => Self::FixedLoop(FixedLoop::parse(parser, None)?),
            Token::Eof => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start, end },
            ),
            token => return parse_error(
                ParseErrorType::UnexpectedToken {
                    token,
                    expected: vec!["a statement".to_string()],
                },
                SrcSpan { start, end },
            ),
        };

        Ok(statement)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declaration(declaration) => write!(f, "{declaration}"),
            Self::Assignment(assignment) => write!(f, "{assignment}"),
            Self::Increment(increment) => write!(f, "{increment}"),
            Self::Input(input) => write!(f, "{input}"),
            Self::Output(output) => write!(f, "{output}"),
            Self::Conditional(conditional) => write!(f, "{conditional}"),
            Self::ConditionalLoop(loop_) => write!(f, "{loop_}"),
            Self::FixedLoop(loop_) => write!(f, "{loop_}"),
            Self::Empty { .. } => Ok(()),
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Declaration(declaration) => declaration.location,
            Self::Assignment(assignment) => assignment.location,
            Self::Increment(increment) => increment.location,
            Self::Input(input) => input.location,
            Self::Output(output) => output.location,
            Self::Conditional(conditional) => conditional.location,
            Self::ConditionalLoop(loop_) => loop_.location,
            Self::FixedLoop(loop_) => loop_.location,
            Self::Empty { location } => *location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierType {
    Int,
    Float,
    Char,
    Bool,
    String,
}

impl Display for IdentifierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keyword = match self {
            Self::Int => "NUMERO",
            Self::Float => "TIPIK",
            Self::Char => "LETRA",
            Self::Bool => "TINUOD",
            Self::String => "PULONG",
        };

        write!(f, "{keyword}")
    }
}

impl From<&Token> for IdentifierType {
    fn from(value: &Token) -> Self {
        match value {
            Token::IntType => Self::Int,
            Token::FloatType => Self::Float,
            Token::CharType => Self::Char,
            Token::BoolType => Self::Bool,
            Token::StringType => Self::String,
            _ => unreachable!("token is not a type keyword"),
        }
    }
}

// declaration -> MUGNA <type> <name> [= <expression>] {, <name> [= <expression>]}
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: IdentifierType,
    pub names: Vec<DeclaredName>,
    pub location: SrcSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredName {
    pub name: Identifier,
    pub initializer: Option<Expression>,
}

impl Parse for Declaration {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Declare)?;

        let (_, type_token, type_end) = parser.current().clone();

        if !type_token.is_type_keyword() {
            return parse_error(
                ParseErrorType::ExpectedType,
                SrcSpan { start, end: type_end },
            );
        }

        let kind = IdentifierType::from(&type_token);
        parser.step();

        let mut names = vec![];

        loop {
            let (name_start, name, name_end) = parser.expect_ident()?;
            let location = SrcSpan { start: name_start, end: name_end };

            parser.declare(name.clone(), kind, location)?;

            let initializer = if matches!(parser.current().1, Token::Assign) {
                parser.step();
                let value = Expression::parse(parser, None)?;

                if kind == IdentifierType::Bool {
                    validate_boolean_initializer(&value)?;
                }

                Some(value)
            } else {
                None
            };

            names.push(DeclaredName {
                name: Identifier { value: name, location },
                initializer,
            });

            if matches!(parser.current().1, Token::Comma) {
                parser.step();
            } else {
                break;
            }
        }

        let end = names.last()
            .map(|declared| match &declared.initializer {
                Some(value) => value.location().end,
                None => declared.name.location.end,
            })
            .unwrap_or(type_end);

        Ok(Self {
            kind,
            names,
            location: SrcSpan { start, end },
        })
    }
}

// A TINUOD initializer has to be spelled exactly "OO" or "DILI"; the lexer
// keeps the raw quoted text so loose spellings can be rejected here.
fn validate_boolean_initializer(value: &Expression) -> Result<(), ParseError> {
    match value {
        Expression::Primitive(Primitive::Bool { lexeme, location, .. })
            if lexeme != "OO" && lexeme != "DILI" =>
        {
            parse_error(
                ParseErrorType::InvalidBooleanLiteral { lexeme: lexeme.clone() },
                *location,
            )
        },
        Expression::Primitive(Primitive::Str { value, location }) => parse_error(
            ParseErrorType::InvalidBooleanLiteral { lexeme: value.clone() },
            *location,
        ),
        _ => Ok(()),
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names.iter()
            .map(|declared| match &declared.initializer {
                Some(value) => format!("{} = {}", declared.name, value),
                None => format!("{}", declared.name),
            })
            .collect::<Vec<String>>();

        write!(f, "MUGNA {} {}", self.kind, names.join(", "))
    }
}

// assignment -> <identifier> = <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Identifier,
    pub operator: Token,
    pub value: Expression,
    pub location: SrcSpan,
}

impl Parse for Assignment {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, name, end) = parser.expect_ident()?;
        let location = SrcSpan { start, end };

        parser.reference(&name, location)?;
        parser.expect_one(Token::Assign)?;

        let value = Expression::parse(parser, None)?;
        let end = value.location().end;

        Ok(Self {
            target: Identifier { value: name, location },
            operator: Token::Assign,
            value,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.target, self.operator.as_literal(), self.value)
    }
}

// increment -> <identifier>++
#[derive(Debug, Clone, PartialEq)]
pub struct Increment {
    pub target: Identifier,
    pub location: SrcSpan,
}

impl Parse for Increment {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, name, end) = parser.expect_ident()?;
        let location = SrcSpan { start, end };

        parser.reference(&name, location)?;

        let (_, end) = parser.expect_one(Token::Increment)?;

        Ok(Self {
            target: Identifier { value: name, location },
            location: SrcSpan { start, end },
        })
    }
}

impl Display for Increment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}++", self.target)
    }
}

// input -> DAWAT: <identifier> {, <identifier>}
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub targets: Vec<Identifier>,
    pub location: SrcSpan,
}

impl Parse for Input {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Input)?;
        parser.expect_one(Token::Colon)?;

        let mut targets = vec![];

        loop {
            let (name_start, name, name_end) = parser.expect_ident()?;
            let location = SrcSpan { start: name_start, end: name_end };

            parser.reference(&name, location)?;
            targets.push(Identifier { value: name, location });

            if matches!(parser.current().1, Token::Comma) {
                parser.step();
            } else {
                break;
            }
        }

        let end = targets[targets.len() - 1].location.end;

        Ok(Self {
            targets,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let targets = self.targets.iter()
            .map(|target| target.value.clone())
            .collect::<Vec<String>>();

        write!(f, "DAWAT: {}", targets.join(", "))
    }
}

// output -> IPAKITA: <expression> { <expression> }
//
// Arguments are juxtaposed; a `$` between them is a literal newline. A real
// line feed ends the list.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub expressions: Vec<Expression>,
    pub location: SrcSpan,
}

impl Parse for Output {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Display)?;
        let (_, colon_end) = parser.expect_one(Token::Colon)?;

        parser.inside_display = true;

        let mut expressions = vec![];
        let mut end = colon_end;

        loop {
            let (token_start, token, token_end) = parser.current().clone();

            match token {
                Token::Dollar => {
                    parser.step();
                    end = token_end;
                    expressions.push(Expression::Primitive(Primitive::Newline {
                        location: SrcSpan { start: token_start, end: token_end },
                    }));
                },
                token if token.starts_expression() => {
                    let expression = match Expression::parse(parser, None) {
                        Ok(expression) => expression,
                        Err(error) => {
                            parser.inside_display = false;
                            return Err(error);
                        }
                    };

                    end = expression.location().end;
                    expressions.push(expression);
                },
                _ => break,
            }
        }

        parser.inside_display = false;

        if expressions.is_empty() {
            return parse_error(
                ParseErrorType::ExpectedExpression,
                SrcSpan { start, end },
            );
        }

        Ok(Self {
            expressions,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let expressions = self.expressions.iter()
            .map(|expression| expression.to_string())
            .collect::<Vec<String>>();

        write!(f, "IPAKITA: {}", expressions.join(" & "))
    }
}

// conditional -> KUNG (<expression>) <block>
//                [KUNG DILI (<expression>) <block>]* [KUNG WALA <block>]
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Expression,
    pub consequence: Block,
    pub alternative: Option<Box<Alternative>>,
    pub location: SrcSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Alternative {
    ElseIf(Conditional),
    Else(Block),
}

impl Alternative {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::ElseIf(conditional) => conditional.location,
            Self::Else(block) => block.location,
        }
    }
}

impl Parse for Conditional {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::If)?;

        Self::parse_tail(parser, start)
    }
}

impl Conditional {
    // Parses everything after the `KUNG` keyword, so else-if chains can
    // reuse it after consuming `KUNG DILI`.
    fn parse_tail(parser: &mut Parser, start: u32) -> Result<Self, ParseError> {
        parser.expect_one(Token::LParen)?;

        parser.inside_conditional = true;
        let condition = Expression::parse(parser, None);
        parser.inside_conditional = false;
        let condition = condition?;

        parser.expect_one(Token::RParen)?;

        let was_inside_if_block = parser.inside_if_block;
        parser.inside_if_block = true;
        let consequence = Block::parse(parser, None);
        parser.inside_if_block = was_inside_if_block;
        let consequence = consequence?;

        let mut end = consequence.location.end;

        parser.skip_newlines();

        let alternative = match (&parser.current().1, &parser.peek().1) {
            (Token::If, Token::Not) => {
                let (elseif_start, _) = parser.expect_one(Token::If)?;
                parser.expect_one(Token::Not)?;

                let nested = Self::parse_tail(parser, elseif_start)?;
                end = nested.location.end;

                Some(Box::new(Alternative::ElseIf(nested)))
            },
            (Token::If, Token::Else) => {
                parser.expect_one(Token::If)?;
                parser.expect_one(Token::Else)?;

                let was_inside_if_block = parser.inside_if_block;
                parser.inside_if_block = true;
                let block = Block::parse(parser, None);
                parser.inside_if_block = was_inside_if_block;
                let block = block?;

                end = block.location.end;

                Some(Box::new(Alternative::Else(block)))
            },
            _ => None,
        };

        match &condition {
            Expression::Primitive(Primitive::Bool { value: true, .. }) => {
                if let Some(alternative) = &alternative {
                    parser.warning(ParseWarning::UnreachableElseClause {
                        location: alternative.location(),
                    });
                }
            },
            Expression::Primitive(Primitive::Bool { value: false, .. }) => {
                parser.warning(ParseWarning::UnreachableIfClause {
                    location: consequence.location,
                });
            },
            _ => {}
        }

        Ok(Self {
            condition,
            consequence,
            alternative,
            location: SrcSpan { start, end },
        })
    }
}

impl Display for Conditional {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KUNG ({}) {}", self.condition, self.consequence)?;

        match &self.alternative {
            Some(alternative) => write!(f, " {}", alternative),
            None => Ok(()),
        }
    }
}

impl Display for Alternative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ElseIf(conditional) => {
                write!(
                    f,
                    "KUNG DILI ({}) {}",
                    conditional.condition, conditional.consequence
                )?;

                match &conditional.alternative {
                    Some(alternative) => write!(f, " {}", alternative),
                    None => Ok(()),
                }
            },
            Self::Else(block) => write!(f, "KUNG WALA {block}"),
        }
    }
}

// block -> PUNDOK { <statement>* }
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub location: SrcSpan,
}

impl Parse for Block {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Block)?;
        parser.skip_newlines();
        parser.expect_one(Token::LBrace)?;

        let mut statements = vec![];

        let end = loop {
            parser.skip_newlines();

            match &parser.current().1 {
                Token::RBrace => {
                    let (_, end) = parser.expect_one(Token::RBrace)?;
                    break end;
                },
                Token::Eof => {
                    let (start, _, end) = *parser.current();
                    return parse_error(
                        ParseErrorType::UnexpectedEof,
                        SrcSpan { start, end },
                    );
                },
                _ => statements.push(Statement::parse(parser, None)?),
            }
        };

        let location = SrcSpan { start, end };

        if statements.is_empty() {
            if parser.inside_if_block {
                statements.push(Statement::Empty { location });
            } else {
                return parse_error(ParseErrorType::ExpectedStatement, location);
            }
        }

        Ok(Self { statements, location })
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| format!("{}", statement))
            .collect::<Vec<String>>();

        write!(f, "PUNDOK {{\n{}\n}}", statements.join("\n"))
    }
}

// conditional_loop -> SAMTANG (<expression>) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalLoop {
    pub condition: Expression,
    pub body: Block,
    pub location: SrcSpan,
}

impl Parse for ConditionalLoop {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::While)?;

        parser.expect_one(Token::LParen)?;

        parser.inside_conditional = true;
        let condition = Expression::parse(parser, None);
        parser.inside_conditional = false;
        let condition = condition?;

        parser.expect_one(Token::RParen)?;

        let was_inside_if_block = parser.inside_if_block;
        parser.inside_if_block = false;
        let body = Block::parse(parser, None);
        parser.inside_if_block = was_inside_if_block;
        let body = body?;

        match &condition {
            Expression::Primitive(Primitive::Bool { value: true, .. }) => {
                parser.warning(ParseWarning::InfiniteLoop {
                    location: SrcSpan { start, end: condition.location().end },
                });
            },
            Expression::Primitive(Primitive::Bool { value: false, .. }) => {
                parser.warning(ParseWarning::UnreachableWhileClause {
                    location: body.location,
                });
            },
            _ => {}
        }

        let location = SrcSpan { start, end: body.location.end };

        Ok(Self { condition, body, location })
    }
}

impl Display for ConditionalLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SAMTANG ({}) {}", self.condition, self.body)
    }
}

// fixed_loop -> ALANG SA (<assignment>, <expression>, <expression>) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLoop {
    pub init: Assignment,
    pub condition: Expression,
    pub update: Expression,
    pub body: Block,
    pub location: SrcSpan,
}

impl Parse for FixedLoop {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::For)?;
        parser.expect_one(Token::Sa)?;
        parser.expect_one(Token::LParen)?;

        let init = Assignment::parse(parser, None)?;
        parser.expect_one(Token::Comma)?;

        let condition = Expression::parse(parser, None)?;
        parser.expect_one(Token::Comma)?;

        let update = Expression::parse(parser, None)?;
        parser.expect_one(Token::RParen)?;

        let was_inside_if_block = parser.inside_if_block;
        parser.inside_if_block = false;
        let body = Block::parse(parser, None);
        parser.inside_if_block = was_inside_if_block;
        let body = body?;

        let location = SrcSpan { start, end: body.location.end };

        Ok(Self {
            init,
            condition,
            update,
            body,
            location,
        })
    }
}

impl Display for FixedLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ALANG SA ({}, {}, {}) {}",
            self.init, self.condition, self.update, self.body
        )
    }
}

// expression -> <identifier> | <primitive> | <unary> | <infix>
//             | <assignment expression> | (<expression>)
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Primitive(Primitive),
    Unary(Unary),
    Infix(Infix),
    Assign(AssignExpression),
    Grouped {
        expression: Box<Expression>,
        location: SrcSpan,
    },
}

impl Parse for Expression {
    fn parse(
        parser: &mut Parser,
        precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let precedence = precedence.unwrap_or(Precedence::Lowest);

        let mut expression = Self::parse_primary(parser)?;

        while precedence < parser.current_precedence() {
            let (op_start, operator, op_end) = parser.current().clone();

            expression = match operator {
                Token::Assign => {
                    if parser.inside_conditional {
                        return parse_error(
                            ParseErrorType::AssignmentInCondition,
                            SrcSpan { start: op_start, end: op_end },
                        );
                    }

                    Self::Assign(AssignExpression::parse(parser, expression, None)?)
                },
                Token::Ampersand if !parser.inside_display => {
                    return parse_error(
                        ParseErrorType::ConcatOutsideDisplay,
                        SrcSpan { start: op_start, end: op_end },
                    );
                },
                token if token.is_operator() => {
                    Self::Infix(Infix::parse(parser, expression, None)?)
                },
                _ => break,
            };
        }

        Ok(expression)
    }
}

impl Expression {
    fn parse_primary(parser: &mut Parser) -> Result<Self, ParseError> {
        let (start, token, end) = parser.current().clone();

        let expression = match token {
            Token::Ident(_) => {
                let (start, name, end) = parser.expect_ident()?;
                let location = SrcSpan { start, end };

                parser.reference(&name, location)?;

                let identifier = Identifier { value: name, location };

                // A trailing `++` binds to the identifier directly.
                if matches!(parser.current().1, Token::Increment) {
                    let (_, increment_end) = parser.expect_one(Token::Increment)?;

                    Self::Unary(Unary {
                        operator: Token::Increment,
                        operand: Box::new(Self::Identifier(identifier)),
                        location: SrcSpan { start, end: increment_end },
                    })
                } else {
                    Self::Identifier(identifier)
                }
            },
            Token::Int(_)
            | Token::Float(_)
            | Token::Char(_)
            | Token::Str(_)
            | Token::True(_)
            | Token::False(_) => Self::Primitive(Primitive::parse(parser, None)?),
            Token::Minus | Token::Plus | Token::Not | Token::Increment => {
                Self::Unary(Unary::parse(parser, None)?)
            },
            Token::LParen => {
                let (start, _) = parser.expect_one(Token::LParen)?;

                let expression = Box::new(Expression::parse(parser, None)?);

                let (_, end) = parser.expect_one(Token::RParen)?;

                Self::Grouped {
                    expression,
                    location: SrcSpan { start, end },
                }
            },
            Token::Eof => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start, end },
            ),
            token => return parse_error(
                ParseErrorType::UnexpectedToken {
                    token,
                    expected: vec!["an expression".to_string()],
                },
                SrcSpan { start, end },
            ),
        };

        Ok(expression)
    }

    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(identifier) => identifier.location,
            Self::Primitive(primitive) => primitive.location(),
            Self::Unary(unary) => unary.location,
            Self::Infix(infix) => infix.location,
            Self::Assign(assign) => assign.location,
            Self::Grouped { location, .. } => *location,
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "{identifier}"),
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Unary(unary) => write!(f, "{unary}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::Assign(assign) => write!(f, "{assign}"),
            Self::Grouped { expression, .. } => write!(f, "({expression})"),
        }
    }
}

// identifier -> (<letter> | _) { <letter> | <digit> | _ }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

// unary -> (- | + | DILI | ++) <expression>, or <identifier>++
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Token,
    pub operand: Box<Expression>,
    pub location: SrcSpan,
}

impl Parse for Unary {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, operator, _) = parser.current().clone();
        parser.step();

        let operand = Expression::parse(parser, Some(Precedence::Prefix))?;
        let end = operand.location().end;

        if operator == Token::Increment && !matches!(operand, Expression::Identifier(_)) {
            return parse_error(
                ParseErrorType::InvalidIncrementTarget,
                operand.location(),
            );
        }

        Ok(Self {
            operator,
            operand: Box::new(operand),
            location: SrcSpan { start, end },
        })
    }
}

impl Display for Unary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.operator {
            Token::Increment => write!(f, "{}++", self.operand),
            Token::Not => write!(f, "DILI {}", self.operand),
            operator => write!(f, "{}{}", operator.as_literal(), self.operand),
        }
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
    pub location: SrcSpan,
}

impl InfixParse for Infix {
    fn parse(
        parser: &mut Parser,
        left: Expression,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();

        let (_, operator, _) = parser.current().clone();
        parser.step();

        let right = Expression::parse(parser, Some(precedence))?;

        let location = left.location().merge(right.location());

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location,
        })
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator.as_literal(), self.right)
    }
}

// assignment expression -> <identifier> = <expression> (right-associative)
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpression {
    pub target: Identifier,
    pub operator: Token,
    pub value: Box<Expression>,
    pub location: SrcSpan,
}

impl InfixParse for AssignExpression {
    fn parse(
        parser: &mut Parser,
        left: Expression,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let target = match left {
            Expression::Identifier(identifier) => identifier,
            left => {
                return parse_error(
                    ParseErrorType::InvalidAssignmentTarget,
                    left.location(),
                )
            }
        };

        parser.expect_one(Token::Assign)?;

        // Parsing the value back at the lowest precedence keeps chains like
        // `a = b = 1` right-associative.
        let value = Expression::parse(parser, Some(Precedence::Lowest))?;

        let location = target.location.merge(value.location());

        Ok(Self {
            target,
            operator: Token::Assign,
            value: Box::new(value),
            location,
        })
    }
}

impl Display for AssignExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.target, self.operator.as_literal(), self.value)
    }
}

// primitive -> <int> | <float> | <char> | <bool> | <string> | $
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Int {
        value: i32,
        location: SrcSpan,
    },
    Float {
        value: f32,
        location: SrcSpan,
    },
    Char {
        value: char,
        location: SrcSpan,
    },
    Bool {
        value: bool,
        lexeme: String,
        location: SrcSpan,
    },
    Str {
        value: String,
        location: SrcSpan,
    },
    /// The `$` sentinel used as a literal newline in `IPAKITA` arguments.
    Newline {
        location: SrcSpan,
    },
}

impl Parse for Primitive {
    fn parse(
        parser: &mut Parser,
        _precedence: Option<Precedence>,
    ) -> Result<Self, ParseError> {
        let (start, token, end) = parser.current().clone();
        let location = SrcSpan { start, end };

        let primitive = match token {
            Token::Int(value) => Self::Int { value, location },
            Token::Float(value) => Self::Float { value, location },
            Token::Char(value) => Self::Char { value, location },
            Token::Str(value) => Self::Str { value, location },
            Token::True(lexeme) => Self::Bool { value: true, lexeme, location },
            Token::False(lexeme) => Self::Bool { value: false, lexeme, location },
            token => {
                return parse_error(
                    ParseErrorType::UnexpectedToken {
                        token,
                        expected: vec!["a literal".to_string()],
                    },
                    location,
                )
            }
        };

        parser.step();

        Ok(primitive)
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int { value, .. } => write!(f, "{value}"),
            Self::Float { value, .. } => write!(f, "{value:?}"),
            Self::Char { value, .. } => write!(f, "'{value}'"),
            Self::Bool { lexeme, .. } => write!(f, "\"{lexeme}\""),
            Self::Str { value, .. } => write!(f, "\"{value}\""),
            Self::Newline { .. } => write!(f, "$"),
        }
    }
}

impl Primitive {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Int { location, .. }
            | Self::Float { location, .. }
            | Self::Char { location, .. }
            | Self::Bool { location, .. }
            | Self::Str { location, .. }
            | Self::Newline { location } => *location,
        }
    }
}
