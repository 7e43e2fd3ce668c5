//! Script-level coercions between values.

use std::collections::HashSet;

use evalconsole_foundation::{Identity, Value};
use evalconsole_render::format_number;

/// Converts a value to a number the way arithmetic operators do.
#[must_use]
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(a) if a.is_empty() => 0.0,
        Value::Array(a) if a.len() == 1 => a.get(0).map_or(f64::NAN, |v| to_number(&v)),
        _ => f64::NAN,
    }
}

/// Converts a value to its unquoted display string, as used by string
/// concatenation and `str(x)`.
///
/// An array already being joined further up displays as an empty string.
#[must_use]
pub fn to_display_string(value: &Value) -> String {
    display(value, &mut HashSet::new())
}

fn display(value: &Value, joining: &mut HashSet<Identity>) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.to_string(),
        Value::Array(a) => {
            if !joining.insert(a.identity()) {
                return String::new();
            }
            let joined = a
                .to_vec()
                .iter()
                .map(|v| match v {
                    Value::Undefined | Value::Null => String::new(),
                    other => display(other, joining),
                })
                .collect::<Vec<_>>()
                .join(",");
            joining.remove(&a.identity());
            joined
        }
        Value::Object(_) => "[object Object]".to_string(),
        Value::Function(f) => f.source().to_string(),
        Value::Host(h) => format!("[object {}]", h.class_name()),
        Value::Promise(_) => "[object Promise]".to_string(),
    }
}

/// Converts a value to a property key.
#[must_use]
pub fn to_property_key(value: &Value) -> String {
    to_display_string(value)
}

/// Interprets a value as an array index, if it is a non-negative integer.
#[must_use]
pub fn to_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = *n as usize;
            (*n >= 0.0 && n.fract() == 0.0 && *n < MAX_INDEX_EXCLUSIVE).then_some(index)
        }
        Value::String(s) => array_index(s),
        _ => None,
    }
}

/// Parses a property name that names an array element: the canonical
/// decimal form of an integer below 2^32 - 1. Anything else is an ordinary
/// property name.
#[must_use]
pub fn array_index(name: &str) -> Option<usize> {
    let digits = !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit());
    if !digits || (name.len() > 1 && name.starts_with('0')) {
        return None;
    }
    let index: u32 = name.parse().ok().filter(|&i| i != u32::MAX)?;
    usize::try_from(index).ok()
}

const MAX_INDEX_EXCLUSIVE: f64 = 4_294_967_295.0;

/// Loose equality limited to the cases scripts commonly rely on.
#[must_use]
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            #[allow(clippy::float_cmp)]
            let equal = to_number(a) == to_number(b);
            equal
        }
        _ => a == b,
    }
}
