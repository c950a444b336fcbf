use std::collections::HashMap;

use super::prelude::{Value, ValueType, FALSE};

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub value: Value,
    pub kind: ValueType,
}

/// The single flat scope a program runs against: name to value plus the
/// declared kind that governs every later coercion.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Environment {
    pub store: HashMap<String, Variable>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.store.get(name)
    }

    pub fn declare(&mut self, name: String, kind: ValueType) {
        let value = match kind {
            ValueType::Int => Value::Int { value: 0 },
            ValueType::Float => Value::Float { value: 0.0 },
            ValueType::Char => Value::Char { value: '\0' },
            ValueType::Bool => FALSE,
            ValueType::String => Value::String { value: String::new() },
        };

        self.store.insert(name, Variable { value, kind });
    }

    /// Overwrites a declared variable. The value is expected to already be
    /// canonical for the declared kind.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(variable) = self.store.get_mut(name) {
            variable.value = value;
        }
    }
}
