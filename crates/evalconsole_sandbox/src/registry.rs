//! Host values that can be injected into a sandbox by name.

use std::collections::HashMap;

use evalconsole_foundation::{Error, Result, Value};

use crate::traits::NameResolver;

/// A name-to-value table the host fills before starting the console.
#[derive(Clone, Default)]
pub struct Registry {
    entries: HashMap<String, Value>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` under `name`, replacing any previous value.
    pub fn register(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.register(name, value);
        self
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl NameResolver for Registry {
    fn resolve(&self, name: &str) -> Result<Value> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::bind(name, "no value is registered under this name"))
    }
}
