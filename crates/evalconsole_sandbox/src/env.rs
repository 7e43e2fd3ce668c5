//! A host object exposing process environment variables.

use std::collections::BTreeMap;

use evalconsole_foundation::{Error, HostObject, Result, Value};

/// Environment variables as a read-only host object.
///
/// Variables are captured when the object is created. Values that are not
/// valid Unicode are listed but fail to read, so the console's
/// generic-object rendering leaves them out.
#[derive(Clone, Debug, Default)]
pub struct EnvironmentObject {
    vars: BTreeMap<String, Option<String>>,
}

impl EnvironmentObject {
    /// Captures the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| {
                let key = key.into_string().ok()?;
                Some((key, value.into_string().ok()))
            })
            .collect();
        Self { vars }
    }

    /// Creates an environment from explicit variables.
    #[must_use]
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }
}

impl HostObject for EnvironmentObject {
    fn class_name(&self) -> &str {
        "Environment"
    }

    fn property_names(&self) -> Result<Vec<String>> {
        Ok(self.vars.keys().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Value> {
        match self.vars.get(name) {
            Some(Some(value)) => Ok(Value::string(value)),
            Some(None) => Err(Error::property_access(name, "value is not valid Unicode")),
            None => Ok(Value::Undefined),
        }
    }
}
