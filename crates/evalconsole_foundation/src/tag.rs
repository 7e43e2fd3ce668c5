//! Presentation tags and rendered results.

use std::fmt;

/// Classification label attached to a rendered result.
///
/// Front ends use the tag to pick a display style. [`TypeTag::None`] is the
/// "unset" tag: values with no dedicated style and failed evaluations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TypeTag {
    /// The absent value.
    Undefined,
    /// A number.
    Number,
    /// A string (rendered quoted).
    String,
    /// A plain object.
    Object,
    /// An array.
    Array,
    /// A function (rendered as its source).
    Function,
    /// A failed evaluation, when error tagging is enabled.
    Error,
    /// Output produced by the console itself (`:help`, `:load`, ...).
    Builtin,
    /// No tag.
    #[default]
    None,
}

impl TypeTag {
    /// Returns the style class name for this tag. Empty for [`TypeTag::None`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
            Self::Function => "function",
            Self::Error => "error",
            Self::Builtin => "builtin",
            Self::None => "",
        }
    }

    /// Returns true unless this is the unset tag.
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The settled presentation of one evaluation: display text plus tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rendered {
    /// Text shown in the output pane.
    pub result: String,
    /// Display classification.
    pub tag: TypeTag,
}

impl Rendered {
    /// Creates a rendered result.
    #[must_use]
    pub fn new(result: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            result: result.into(),
            tag,
        }
    }

    /// Creates console-produced output.
    #[must_use]
    pub fn builtin(result: impl Into<String>) -> Self {
        Self::new(result, TypeTag::Builtin)
    }

    /// Creates an untagged result.
    #[must_use]
    pub fn untagged(result: impl Into<String>) -> Self {
        Self::new(result, TypeTag::None)
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.result)
    }
}
