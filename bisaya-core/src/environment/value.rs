use std::fmt::Display;

use crate::parser::prelude::IdentifierType;

pub const TRUE: Value = Value::Bool { value: true };
pub const FALSE: Value = Value::Bool { value: false };

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int {
        value: i32,
    },
    Float {
        value: f32,
    },
    Char {
        value: char,
    },
    Bool {
        value: bool,
    },
    String {
        value: String,
    },
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int { value } => write!(f, "{value}"),
            // Mathematically integral floats keep a trailing `.0`.
            Value::Float { value } => {
                if value.is_finite() && value.fract() == 0.0 {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value}")
                }
            },
            Value::Char { value } => write!(f, "{value}"),
            Value::Bool { value } => write!(f, "{}", if *value { "OO" } else { "DILI" }),
            Value::String { value } => write!(f, "{value}"),
        }
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int { .. } => ValueType::Int,
            Self::Float { .. } => ValueType::Float,
            Self::Char { .. } => ValueType::Char,
            Self::Bool { .. } => ValueType::Bool,
            Self::String { .. } => ValueType::String,
        }
    }

    /// Coerces into the canonical value for a declared kind. `None` means
    /// the two are incompatible.
    pub fn coerce_to(&self, kind: ValueType) -> Option<Value> {
        match (self, kind) {
            (Value::Int { .. }, ValueType::Int)
            | (Value::Float { .. }, ValueType::Float)
            | (Value::Char { .. }, ValueType::Char)
            | (Value::Bool { .. }, ValueType::Bool)
            | (Value::String { .. }, ValueType::String) => Some(self.clone()),

            (Value::Int { value }, ValueType::Float) => {
                Some(Value::Float { value: *value as f32 })
            },

            (Value::String { value }, ValueType::Int) => {
                value.trim().parse::<i32>().ok().map(|value| Value::Int { value })
            },
            (Value::String { value }, ValueType::Float) => {
                value.trim().parse::<f32>().ok().map(|value| Value::Float { value })
            },
            (Value::String { value }, ValueType::Char) => {
                let mut chars = value.chars();

                match (chars.next(), chars.next()) {
                    (Some(value), None) => Some(Value::Char { value }),
                    _ => None,
                }
            },
            (Value::String { value }, ValueType::Bool) => match value.as_str() {
                "OO" => Some(TRUE),
                "DILI" => Some(FALSE),
                _ => None,
            },

            // Anything can be stored in a PULONG through its display form,
            // mirroring what `&` concatenation does.
            (_, ValueType::String) => Some(Value::String { value: format!("{self}") }),

            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    Char,
    Bool,
    String,
}

impl Display for ValueType {
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

impl From<IdentifierType> for ValueType {
    fn from(value: IdentifierType) -> Self {
        match value {
            IdentifierType::Int => ValueType::Int,
            IdentifierType::Float => ValueType::Float,
            IdentifierType::Char => ValueType::Char,
            IdentifierType::Bool => ValueType::Bool,
            IdentifierType::String => ValueType::String,
        }
    }
}
