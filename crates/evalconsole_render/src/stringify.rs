//! Cycle-safe stringification of evaluation results.
//!
//! The output is a one-way display format, not a serialization format:
//! strings are quoted with only `"` escaped, object keys are sorted
//! case-insensitively, and any composite already rendered in the current
//! call is printed as [`CIRCULAR`].
//!
//! # Example
//!
//! ```
//! use evalconsole_foundation::{Object, Value};
//! use evalconsole_render::stringify;
//!
//! let o = Object::from_pairs([("b", Value::from(1)), ("a", Value::from(2))]);
//! assert_eq!(stringify(&Value::Object(o)), r#"{"a": 2, "b": 1}"#);
//! ```

use std::collections::HashSet;

use evalconsole_foundation::{HostRef, Identity, Value};

/// Marker emitted in place of a composite that is already being rendered.
pub const CIRCULAR: &str = "[circular]";

/// Identities of the composites visited during one stringification.
///
/// Threaded explicitly through the recursion; a composite is inserted before
/// its children are rendered and never removed.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<Identity>,
}

impl VisitedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` has been visited.
    #[must_use]
    pub fn contains(&self, id: Identity) -> bool {
        self.seen.contains(&id)
    }

    /// Marks `id` as visited. Returns false if it already was.
    pub fn insert(&mut self, id: Identity) -> bool {
        self.seen.insert(id)
    }

    /// Number of visited composites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing has been visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Stringifies a value with a fresh visited set.
#[must_use]
pub fn stringify(value: &Value) -> String {
    stringify_with(value, false, &mut VisitedSet::new())
}

/// Stringifies a value.
///
/// `shallow` limits host objects to their plain textual form; it is set when
/// rendering the properties of a host object so the generic fallback only
/// ever descends one extra level.
#[must_use]
pub fn stringify_with(value: &Value, shallow: bool, visited: &mut VisitedSet) -> String {
    if value.identity().is_some_and(|id| visited.contains(id)) {
        return CIRCULAR.to_string();
    }

    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => quote(s),
        Value::Function(f) => escape_quotes(f.source()),
        Value::Promise(_) => "[object Promise]".to_string(),
        Value::Array(array) => {
            visited.insert(array.identity());
            let parts: Vec<String> = array
                .to_vec()
                .iter()
                .map(|item| stringify_with(item, shallow, visited))
                .collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(object) => {
            visited.insert(object.identity());
            let mut entries = object.entries();
            entries.sort_by_cached_key(|(key, _)| key.to_lowercase());
            let parts: Vec<String> = entries
                .iter()
                .map(|(key, item)| {
                    format!("{}: {}", quote(key), stringify_with(item, shallow, visited))
                })
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Host(host) if shallow => host_label(host),
        Value::Host(host) => stringify_host(host, visited),
    }
}

/// Renders a host object by enumerating its readable properties.
///
/// Properties that fail to read are left out.
fn stringify_host(host: &HostRef, visited: &mut VisitedSet) -> String {
    visited.insert(host.identity());

    let mut names = host.property_names().unwrap_or_else(|e| {
        tracing::warn!(class = host.class_name(), error = %e, "host object refused enumeration");
        Vec::new()
    });
    names.sort_by_cached_key(|name| name.to_lowercase());

    let mut parts = Vec::with_capacity(names.len());
    for name in &names {
        match host.get(name) {
            Ok(item) => parts.push(format!("{name}: {}", stringify_with(&item, true, visited))),
            Err(e) => {
                tracing::warn!(
                    class = host.class_name(),
                    property = %name,
                    error = %e,
                    "skipping unreadable property"
                );
            }
        }
    }

    format!("{}{{\n{}\n}}", host_label(host), parts.join(",\n"))
}

fn host_label(host: &HostRef) -> String {
    format!("[object {}]", host.class_name())
}

/// Wraps a string in double quotes, escaping embedded double quotes.
#[must_use]
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape_quotes(s))
}

fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

/// Formats a number the way scripts print it.
///
/// Integral values drop the fractional part, `-0` prints as `0`, and very
/// large magnitudes use exponent notation with an explicit sign.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.abs() >= 1e21 {
        let exp = format!("{n:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    if n.fract() == 0.0 {
        return format!("{n:.0}");
    }
    n.to_string()
}
