//! Result classification.
//!
//! Classification and rendering happen in one pass: the tag decides the
//! display style and the stringifier produces the text. Failed evaluations
//! never go through shape-based classification.

use std::fmt::Display;

use evalconsole_foundation::{Rendered, TypeTag, Value};

use crate::stringify::stringify;

/// Assigns presentation tags to evaluation outcomes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResultClassifier {
    /// Tag failures [`TypeTag::Error`] instead of leaving them unset.
    tag_errors: bool,
}

impl ResultClassifier {
    /// Creates a classifier that leaves failures untagged.
    #[must_use]
    pub const fn new() -> Self {
        Self { tag_errors: false }
    }

    /// Builder method to tag failures with [`TypeTag::Error`].
    #[must_use]
    pub const fn with_error_tag(mut self, tag_errors: bool) -> Self {
        self.tag_errors = tag_errors;
        self
    }

    /// Returns the tag for a successfully produced value.
    ///
    /// Only undefined, numbers, strings, plain objects, arrays and functions
    /// have dedicated tags; every other value is untagged.
    #[must_use]
    pub fn classify(&self, value: &Value) -> TypeTag {
        match value {
            Value::Undefined => TypeTag::Undefined,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Object(_) => TypeTag::Object,
            Value::Array(_) => TypeTag::Array,
            Value::Function(_) => TypeTag::Function,
            Value::Null | Value::Bool(_) | Value::Host(_) | Value::Promise(_) => TypeTag::None,
        }
    }

    /// Classifies and stringifies a successful result.
    #[must_use]
    pub fn render(&self, value: &Value) -> Rendered {
        let tag = self.classify(value);
        let result = stringify(value);
        tracing::trace!(%tag, len = result.len(), "classified result");
        Rendered::new(result, tag)
    }

    /// Renders a failed evaluation from its textual description.
    #[must_use]
    pub fn render_failure(&self, failure: impl Display) -> Rendered {
        let tag = if self.tag_errors {
            TypeTag::Error
        } else {
            TypeTag::None
        };
        Rendered::new(failure.to_string(), tag)
    }
}
