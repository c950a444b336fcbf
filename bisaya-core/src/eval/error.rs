use crate::{environment::prelude::ValueType, lexer::prelude::Token, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
    /// A value could not be coerced to the declared kind of its target.
    TypeMismatch {
        variable: String,
        value: String,
        expected: ValueType,
        got: ValueType,
    },
    /// Operand types incompatible with a binary operator.
    OperatorMismatch {
        operator: Token,
        left: ValueType,
        right: ValueType,
    },
    /// Operand type incompatible with a unary operator.
    UnaryMismatch {
        operator: Token,
        operand: ValueType,
    },
    /// A `KUNG`/`SAMTANG` condition did not produce a boolean.
    InvalidCondition {
        got: ValueType,
    },
    DivisionByZero,
    IntegerOverflow,
    /// `DAWAT` read an empty line.
    EmptyInput {
        variable: String,
    },
    /// Standard input ended before every `DAWAT` target was read.
    InputExhausted {
        variable: String,
    },
    UndeclaredVariable {
        variable: String,
    },
    Io {
        kind: std::io::ErrorKind,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub location: SrcSpan,
}

impl RuntimeError {
    pub fn details(&self) -> (String, Vec<String>) {
        match &self.error {
            RuntimeErrorType::TypeMismatch { variable, value, expected, got } => (
                "Type mismatch".into(),
                vec![format!(
                    "Cannot store `{value}` ({got}) in `{variable}`, which was declared {expected}"
                )],
            ),
            RuntimeErrorType::OperatorMismatch { operator, left, right } => (
                format!("Invalid operands for `{}`", operator.as_literal()),
                vec![format!("Got `{left}` and `{right}`")],
            ),
            RuntimeErrorType::UnaryMismatch { operator, operand } => (
                format!("Invalid operand for `{}`", operator.as_literal()),
                vec![format!("Got `{operand}`")],
            ),
            RuntimeErrorType::InvalidCondition { got } => (
                "Condition is not TINUOD".into(),
                vec![format!("The condition evaluated to `{got}`")],
            ),
            RuntimeErrorType::DivisionByZero => ("Division by zero".into(), vec![]),
            RuntimeErrorType::IntegerOverflow => ("Integer overflow".into(), vec![]),
            RuntimeErrorType::EmptyInput { variable } => (
                "Empty input".into(),
                vec![format!("`DAWAT` read an empty line for `{variable}`")],
            ),
            RuntimeErrorType::InputExhausted { variable } => (
                "Input ended early".into(),
                vec![format!("Standard input closed before `{variable}` could be read")],
            ),
            RuntimeErrorType::UndeclaredVariable { variable } => (
                "Undeclared variable".into(),
                vec![format!("Variable `{variable}` was never declared")],
            ),
            RuntimeErrorType::Io { kind } => ("Standard IO error".into(), vec![format!("{kind}")]),
        }
    }
}
