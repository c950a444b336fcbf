pub mod error;

pub mod prelude {
    pub use super::error::*;
    pub use super::{eval, Evaluator};
}

#[cfg(test)]
mod tests;

use std::io::{BufRead, Write};

use crate::{
    environment::prelude::{Environment, Value, ValueType},
    lexer::prelude::Token,
    parser::prelude::{
        Alternative, AssignExpression, Assignment, Block, Conditional, ConditionalLoop,
        Declaration, Expression, FixedLoop, Identifier, Infix, Input, Module, Output,
        Primitive, Statement, Unary,
    },
    utils::prelude::SrcSpan,
};
use error::{RuntimeError, RuntimeErrorType};

/// Runs a parsed program against the given input and output streams.
pub fn eval<R: BufRead, W: Write>(
    module: &Module,
    input: R,
    output: W,
) -> Result<(), RuntimeError> {
    Evaluator::new(input, output).eval(module)
}

pub struct Evaluator<R, W> {
    pub env: Environment,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Evaluator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            env: Environment::new(),
            input,
            output,
        }
    }

    pub fn eval(&mut self, module: &Module) -> Result<(), RuntimeError> {
        for statement in &module.program.statements {
            self.eval_statement(statement)?;
        }

        self.output.flush().map_err(|err| RuntimeError {
            error: RuntimeErrorType::Io { kind: err.kind() },
            location: module.program.location,
        })
    }

    fn eval_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::Declaration(declaration) => self.eval_declaration(declaration),
            Statement::Assignment(assignment) => self.eval_assignment(assignment).map(|_| ()),
            Statement::Increment(increment) => {
                self.eval_increment(&increment.target, increment.location)
            },
            Statement::Input(input) => self.eval_input(input),
            Statement::Output(output) => self.eval_output(output),
            Statement::Conditional(conditional) => self.eval_conditional(conditional),
            Statement::ConditionalLoop(loop_) => self.eval_conditional_loop(loop_),
            Statement::FixedLoop(loop_) => self.eval_fixed_loop(loop_),
            Statement::Empty { .. } => Ok(()),
        }
    }

    fn eval_declaration(&mut self, declaration: &Declaration) -> Result<(), RuntimeError> {
        let kind = ValueType::from(declaration.kind);

        for declared in &declaration.names {
            self.env.declare(declared.name.value.clone(), kind);

            if let Some(initializer) = &declared.initializer {
                let value = self.eval_expression(initializer)?;
                self.assign(&declared.name, value, initializer.location())?;
            }
        }

        Ok(())
    }

    fn eval_assignment(&mut self, assignment: &Assignment) -> Result<Value, RuntimeError> {
        let value = self.eval_expression(&assignment.value)?;

        // Compound operators fold the current value in before storing.
        let value = match compound_base(&assignment.operator) {
            Some(operator) => {
                let current = self.lookup(&assignment.target)?;
                self.eval_binary(&operator, current, value, assignment.location)?
            },
            None => value,
        };

        self.assign(&assignment.target, value, assignment.location)
    }

    fn eval_increment(
        &mut self,
        target: &Identifier,
        location: SrcSpan,
    ) -> Result<(), RuntimeError> {
        let value = self.lookup(target)?;

        match value {
            Value::Int { value } => match value.checked_add(1) {
                Some(value) => {
                    self.env.set(&target.value, Value::Int { value });
                    Ok(())
                },
                None => Err(RuntimeError {
                    error: RuntimeErrorType::IntegerOverflow,
                    location,
                }),
            },
            value => Err(RuntimeError {
                error: RuntimeErrorType::UnaryMismatch {
                    operator: Token::Increment,
                    operand: value.value_type(),
                },
                location,
            }),
        }
    }

    // One line per target, in declaration order of the statement. The line
    // arrives as a string and goes through declared-kind coercion.
    fn eval_input(&mut self, input: &Input) -> Result<(), RuntimeError> {
        for target in &input.targets {
            let mut line = String::new();

            let read = self.input.read_line(&mut line).map_err(|err| RuntimeError {
                error: RuntimeErrorType::Io { kind: err.kind() },
                location: input.location,
            })?;

            if read == 0 {
                return Err(RuntimeError {
                    error: RuntimeErrorType::InputExhausted {
                        variable: target.value.clone(),
                    },
                    location: target.location,
                });
            }

            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }

            if line.is_empty() {
                return Err(RuntimeError {
                    error: RuntimeErrorType::EmptyInput {
                        variable: target.value.clone(),
                    },
                    location: target.location,
                });
            }

            self.assign(target, Value::String { value: line }, target.location)?;
        }

        Ok(())
    }

    // Display forms are written back to back; newlines only come from `$`.
    fn eval_output(&mut self, output: &Output) -> Result<(), RuntimeError> {
        for expression in &output.expressions {
            let value = self.eval_expression(expression)?;

            write!(self.output, "{value}").map_err(|err| RuntimeError {
                error: RuntimeErrorType::Io { kind: err.kind() },
                location: output.location,
            })?;
        }

        Ok(())
    }

    fn eval_conditional(&mut self, conditional: &Conditional) -> Result<(), RuntimeError> {
        if self.eval_condition(&conditional.condition)? {
            return self.eval_block(&conditional.consequence);
        }

        match conditional.alternative.as_deref() {
            Some(Alternative::ElseIf(nested)) => self.eval_conditional(nested),
            Some(Alternative::Else(block)) => self.eval_block(block),
            None => Ok(()),
        }
    }

    fn eval_conditional_loop(&mut self, loop_: &ConditionalLoop) -> Result<(), RuntimeError> {
        while self.eval_condition(&loop_.condition)? {
            self.eval_block(&loop_.body)?;
        }

        Ok(())
    }

    fn eval_fixed_loop(&mut self, loop_: &FixedLoop) -> Result<(), RuntimeError> {
        self.eval_assignment(&loop_.init)?;

        loop {
            let condition = self.eval_expression(&loop_.condition)?;

            if !is_truthy(&condition) {
                break;
            }

            self.eval_block(&loop_.body)?;
            self.eval_update(&loop_.update)?;
        }

        Ok(())
    }

    // A `++` on an identifier in the update slot is the increment statement;
    // any other update runs for its side effects.
    fn eval_update(&mut self, update: &Expression) -> Result<(), RuntimeError> {
        if let Expression::Unary(Unary { operator: Token::Increment, operand, location }) = update {
            if let Expression::Identifier(identifier) = operand.as_ref() {
                return self.eval_increment(identifier, *location);
            }
        }

        self.eval_expression(update).map(|_| ())
    }

    fn eval_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        for statement in &block.statements {
            self.eval_statement(statement)?;
        }

        Ok(())
    }

    fn eval_condition(&mut self, condition: &Expression) -> Result<bool, RuntimeError> {
        match self.eval_expression(condition)? {
            Value::Bool { value } => Ok(value),
            value => Err(RuntimeError {
                error: RuntimeErrorType::InvalidCondition {
                    got: value.value_type(),
                },
                location: condition.location(),
            }),
        }
    }

    fn eval_expression(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Identifier(identifier) => self.lookup(identifier),
            Expression::Primitive(primitive) => Ok(match primitive {
                Primitive::Int { value, .. } => Value::Int { value: *value },
                Primitive::Float { value, .. } => Value::Float { value: *value },
                Primitive::Char { value, .. } => Value::Char { value: *value },
                Primitive::Bool { value, .. } => Value::Bool { value: *value },
                Primitive::Str { value, .. } => Value::String { value: value.clone() },
                Primitive::Newline { .. } => Value::String { value: "\n".into() },
            }),
            Expression::Unary(unary) => self.eval_unary(unary),
            Expression::Infix(infix) => self.eval_infix(infix),
            Expression::Assign(assign) => self.eval_assign_expression(assign),
            Expression::Grouped { expression, .. } => self.eval_expression(expression),
        }
    }

    fn eval_assign_expression(
        &mut self,
        assign: &AssignExpression,
    ) -> Result<Value, RuntimeError> {
        let value = self.eval_expression(&assign.value)?;

        let value = match compound_base(&assign.operator) {
            Some(operator) => {
                let current = self.lookup(&assign.target)?;
                self.eval_binary(&operator, current, value, assign.location)?
            },
            None => value,
        };

        self.assign(&assign.target, value, assign.location)
    }

    fn eval_unary(&mut self, unary: &Unary) -> Result<Value, RuntimeError> {
        let value = self.eval_expression(&unary.operand)?;

        match &unary.operator {
            Token::Minus => match numeric_or_keep(value) {
                Value::Int { value } => match value.checked_neg() {
                    Some(value) => Ok(Value::Int { value }),
                    None => Err(RuntimeError {
                        error: RuntimeErrorType::IntegerOverflow,
                        location: unary.location,
                    }),
                },
                Value::Float { value } => Ok(Value::Float { value: -value }),
                value => Err(unary_mismatch(&unary.operator, &value, unary.location)),
            },
            Token::Plus => match numeric_or_keep(value) {
                value @ (Value::Int { .. } | Value::Float { .. }) => Ok(value),
                value => Err(unary_mismatch(&unary.operator, &value, unary.location)),
            },
            Token::Not => match value {
                Value::Bool { value } => Ok(Value::Bool { value: !value }),
                value => Err(unary_mismatch(&unary.operator, &value, unary.location)),
            },
            // In expression position `++` yields the incremented value at
            // its use site without writing it back; only the increment
            // statement and the for-loop update slot store it.
            Token::Increment => match value {
                Value::Int { value } => match value.checked_add(1) {
                    Some(value) => Ok(Value::Int { value }),
                    None => Err(RuntimeError {
                        error: RuntimeErrorType::IntegerOverflow,
                        location: unary.location,
                    }),
                },
                value => Err(unary_mismatch(&unary.operator, &value, unary.location)),
            },
            operator => Err(RuntimeError {
                error: RuntimeErrorType::UnaryMismatch {
                    operator: operator.clone(),
                    operand: value.value_type(),
                },
                location: unary.location,
            }),
        }
    }

    fn eval_infix(&mut self, infix: &Infix) -> Result<Value, RuntimeError> {
        // Both sides are always evaluated; logicals do not short-circuit.
        let left = self.eval_expression(&infix.left)?;
        let right = self.eval_expression(&infix.right)?;

        self.eval_binary(&infix.operator, left, right, infix.location)
    }

    fn eval_binary(
        &mut self,
        operator: &Token,
        left: Value,
        right: Value,
        location: SrcSpan,
    ) -> Result<Value, RuntimeError> {
        match operator {
            Token::Ampersand => Ok(Value::String {
                value: format!("{left}{right}"),
            }),
            Token::And | Token::Or => match (left, right) {
                (Value::Bool { value: l }, Value::Bool { value: r }) => Ok(Value::Bool {
                    value: if *operator == Token::And { l && r } else { l || r },
                }),
                (left, right) => Err(operator_mismatch(operator, &left, &right, location)),
            },
            _ => {
                // Strings that look like numbers take part as numbers.
                let left = numeric_or_keep(left);
                let right = numeric_or_keep(right);

                match (left, right) {
                    (Value::Int { value: l }, Value::Int { value: r }) => {
                        int_binary(operator, l, r, location)
                    },
                    (Value::Float { value: l }, Value::Float { value: r }) => {
                        float_binary(operator, l, r, location)
                    },
                    (Value::Int { value: l }, Value::Float { value: r }) => {
                        float_binary(operator, l as f32, r, location)
                    },
                    (Value::Float { value: l }, Value::Int { value: r }) => {
                        float_binary(operator, l, r as f32, location)
                    },
                    (Value::Char { value: l }, Value::Char { value: r }) => {
                        equality(operator, l == r, ValueType::Char, ValueType::Char, location)
                    },
                    (Value::String { value: l }, Value::String { value: r }) => {
                        equality(operator, l == r, ValueType::String, ValueType::String, location)
                    },
                    (Value::Bool { value: l }, Value::Bool { value: r }) => {
                        equality(operator, l == r, ValueType::Bool, ValueType::Bool, location)
                    },
                    (left, right) => {
                        Err(operator_mismatch(operator, &left, &right, location))
                    },
                }
            }
        }
    }

    fn lookup(&self, identifier: &Identifier) -> Result<Value, RuntimeError> {
        match self.env.get(&identifier.value) {
            Some(variable) => Ok(variable.value.clone()),
            None => Err(RuntimeError {
                error: RuntimeErrorType::UndeclaredVariable {
                    variable: identifier.value.clone(),
                },
                location: identifier.location,
            }),
        }
    }

    // Stores after coercing to the declared kind; failure is the
    // type-mismatch error naming the variable, the value and both kinds.
    fn assign(
        &mut self,
        target: &Identifier,
        value: Value,
        location: SrcSpan,
    ) -> Result<Value, RuntimeError> {
        let kind = match self.env.get(&target.value) {
            Some(variable) => variable.kind,
            None => {
                return Err(RuntimeError {
                    error: RuntimeErrorType::UndeclaredVariable {
                        variable: target.value.clone(),
                    },
                    location: target.location,
                })
            }
        };

        match value.coerce_to(kind) {
            Some(coerced) => {
                self.env.set(&target.value, coerced.clone());
                Ok(coerced)
            },
            None => Err(RuntimeError {
                error: RuntimeErrorType::TypeMismatch {
                    variable: target.value.clone(),
                    value: format!("{value}"),
                    expected: kind,
                    got: value.value_type(),
                },
                location,
            }),
        }
    }
}

/// For-loop truthiness: a false boolean or the string "DILI" stops the
/// loop, everything else keeps it going (the string "OO" included).
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool { value } => *value,
        Value::String { value } => value != "DILI",
        _ => true,
    }
}

fn compound_base(operator: &Token) -> Option<Token> {
    match operator {
        Token::PlusAssign => Some(Token::Plus),
        Token::MinusAssign => Some(Token::Minus),
        Token::StarAssign => Some(Token::Star),
        Token::SlashAssign => Some(Token::Slash),
        Token::PercentAssign => Some(Token::Percent),
        _ => None,
    }
}

fn numeric_or_keep(value: Value) -> Value {
    if let Value::String { value: text } = &value {
        let text = text.trim();

        if let Ok(int) = text.parse::<i32>() {
            return Value::Int { value: int };
        }

        if let Ok(float) = text.parse::<f32>() {
            return Value::Float { value: float };
        }
    }

    value
}

fn int_binary(
    operator: &Token,
    left: i32,
    right: i32,
    location: SrcSpan,
) -> Result<Value, RuntimeError> {
    let overflow = |result: Option<i32>| match result {
        Some(value) => Ok(Value::Int { value }),
        None => Err(RuntimeError {
            error: RuntimeErrorType::IntegerOverflow,
            location,
        }),
    };

    match operator {
        Token::Plus => overflow(left.checked_add(right)),
        Token::Minus => overflow(left.checked_sub(right)),
        Token::Star => overflow(left.checked_mul(right)),
        Token::Slash => {
            if right == 0 {
                return Err(RuntimeError {
                    error: RuntimeErrorType::DivisionByZero,
                    location,
                });
            }

            overflow(left.checked_div(right))
        },
        Token::Percent => {
            if right == 0 {
                return Err(RuntimeError {
                    error: RuntimeErrorType::DivisionByZero,
                    location,
                });
            }

            overflow(left.checked_rem(right))
        },
        Token::Greater => Ok(Value::Bool { value: left > right }),
        Token::Less => Ok(Value::Bool { value: left < right }),
        Token::GreaterEqual => Ok(Value::Bool { value: left >= right }),
        Token::LessEqual => Ok(Value::Bool { value: left <= right }),
        Token::EqualEqual => Ok(Value::Bool { value: left == right }),
        Token::NotEqual => Ok(Value::Bool { value: left != right }),
        operator => Err(RuntimeError {
            error: RuntimeErrorType::OperatorMismatch {
                operator: operator.clone(),
                left: ValueType::Int,
                right: ValueType::Int,
            },
            location,
        }),
    }
}

fn float_binary(
    operator: &Token,
    left: f32,
    right: f32,
    location: SrcSpan,
) -> Result<Value, RuntimeError> {
    let zero_check = || {
        if right == 0.0 {
            Err(RuntimeError {
                error: RuntimeErrorType::DivisionByZero,
                location,
            })
        } else {
            Ok(())
        }
    };

    match operator {
        Token::Plus => Ok(Value::Float { value: left + right }),
        Token::Minus => Ok(Value::Float { value: left - right }),
        Token::Star => Ok(Value::Float { value: left * right }),
        Token::Slash => {
            zero_check()?;
            Ok(Value::Float { value: left / right })
        },
        Token::Percent => {
            zero_check()?;
            Ok(Value::Float { value: left % right })
        },
        Token::Greater => Ok(Value::Bool { value: left > right }),
        Token::Less => Ok(Value::Bool { value: left < right }),
        Token::GreaterEqual => Ok(Value::Bool { value: left >= right }),
        Token::LessEqual => Ok(Value::Bool { value: left <= right }),
        Token::EqualEqual => Ok(Value::Bool { value: left == right }),
        Token::NotEqual => Ok(Value::Bool { value: left != right }),
        operator => Err(RuntimeError {
            error: RuntimeErrorType::OperatorMismatch {
                operator: operator.clone(),
                left: ValueType::Float,
                right: ValueType::Float,
            },
            location,
        }),
    }
}

fn equality(
    operator: &Token,
    equal: bool,
    left: ValueType,
    right: ValueType,
    location: SrcSpan,
) -> Result<Value, RuntimeError> {
    match operator {
        Token::EqualEqual => Ok(Value::Bool { value: equal }),
        Token::NotEqual => Ok(Value::Bool { value: !equal }),
        operator => Err(RuntimeError {
            error: RuntimeErrorType::OperatorMismatch {
                operator: operator.clone(),
                left,
                right,
            },
            location,
        }),
    }
}

fn operator_mismatch(
    operator: &Token,
    left: &Value,
    right: &Value,
    location: SrcSpan,
) -> RuntimeError {
    RuntimeError {
        error: RuntimeErrorType::OperatorMismatch {
            operator: operator.clone(),
            left: left.value_type(),
            right: right.value_type(),
        },
        location,
    }
}

fn unary_mismatch(operator: &Token, operand: &Value, location: SrcSpan) -> RuntimeError {
    RuntimeError {
        error: RuntimeErrorType::UnaryMismatch {
            operator: operator.clone(),
            operand: operand.value_type(),
        },
        location,
    }
}
