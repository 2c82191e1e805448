use hashbrown::HashMap;
use thiserror::Error;

use super::VariableResolver;
use crate::types::ValueKind;
use crate::values::Value;

/// A row of declared, typed variables.
///
/// Each variable has a declared kind that stays fixed; values assigned later are coerced
/// to it. A declared variable without a value reads as the kind's missing value.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("variable '{0}' is not declared")]
    Undeclared(String),
    #[error("cannot assign a {found} value to variable '{name}' of kind {expected}")]
    KindMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Bindings::insert`].
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Declares a variable of the given kind with a missing value.
    pub fn declare(&mut self, name: impl Into<String>, kind: ValueKind) {
        self.entries.insert(name.into(), Value::missing(kind));
    }

    /// Declares (or redeclares) a variable with the value's own kind.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Assigns a new value to a declared variable, keeping its declared kind.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), BindingError> {
        let slot = self
            .entries
            .get_mut(name)
            .ok_or_else(|| BindingError::Undeclared(name.to_string()))?;
        let expected = slot.kind();
        let found = value.kind();
        *slot = value.coerce(expected).ok_or(BindingError::KindMismatch {
            name: name.to_string(),
            expected,
            found,
        })?;
        Ok(())
    }

    /// Resets every variable to its kind's missing value.
    pub fn clear_values(&mut self) {
        for value in self.entries.values_mut() {
            *value = Value::missing(value.kind());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VariableResolver for Bindings {
    fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.entries.get(name).map(Value::kind)
    }

    fn value_of(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }

    fn variables(&self) -> Vec<(String, ValueKind)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.kind()))
            .collect()
    }
}
