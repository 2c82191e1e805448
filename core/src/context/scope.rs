use hashbrown::HashMap;

use super::ScopeResolver;

/// Macro definitions: `%{name}` reads them as text.
#[derive(Debug, Clone, Default)]
pub struct Macros {
    values: HashMap<String, String>,
}

impl Macros {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

impl ScopeResolver for Macros {
    fn macro_value(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn macro_names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
