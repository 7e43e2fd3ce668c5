//! Console configuration.

use std::path::Path;

use evalconsole_foundation::{Error, ErrorKind, Result};
use evalconsole_sandbox::sandbox::is_identifier;
use serde::{Deserialize, Serialize};

/// Text shown by `:help` unless configured otherwise.
pub const DEFAULT_HELP_TEXT: &str = "\
Type an expression and press Enter to evaluate it.
:clear              Clear the history
:help               Show this help
:load <script>      Load a script into the sandbox
:inject a, b        Bind host values into the sandbox";

/// Configuration for a [`Console`](crate::Console).
///
/// Every field has a default, so a JSON file only needs the fields it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Output of `:help`.
    pub help_text: String,

    /// Placeholder shown in an empty input line.
    pub placeholder: String,

    /// Printed before each result.
    pub result_prefix: String,

    /// Sandbox prelude, loaded before the initial scripts.
    pub src: Option<String>,

    /// Scripts loaded one after another at startup.
    pub initial_scripts: Vec<String>,

    /// Names bound after the initial scripts have loaded.
    pub initial_injections: Vec<String>,

    /// Commands replayed once startup has finished.
    pub transcript: Option<String>,

    /// Tag failed evaluations `error` instead of leaving them untagged.
    pub tag_errors: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            help_text: DEFAULT_HELP_TEXT.to_string(),
            placeholder: String::new(),
            result_prefix: "=> ".to_string(),
            src: None,
            initial_scripts: Vec::new(),
            initial_injections: Vec::new(),
            transcript: None,
            tag_errors: false,
        }
    }
}

impl ConsoleConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns a config error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::new(ErrorKind::Config(e.to_string())))
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a config error if
    /// its contents are malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::new(ErrorKind::Io(format!(
                "failed to read config '{}': {e}",
                path.as_ref().display()
            )))
        })?;
        Self::from_json(&json)
    }

    /// Serializes the configuration to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
    }

    /// Checks that script sources are non-empty and injection names are
    /// identifiers.
    ///
    /// # Errors
    ///
    /// Returns a config error describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut sources = self.src.iter().chain(&self.initial_scripts);
        if sources.any(|src| src.trim().is_empty()) {
            return Err(Error::new(ErrorKind::Config(
                "script sources must not be empty".to_string(),
            )));
        }
        if let Some(name) = self.initial_injections.iter().find(|n| !is_identifier(n)) {
            return Err(Error::new(ErrorKind::Config(format!(
                "'{name}' is not a valid injection name"
            ))));
        }
        Ok(())
    }

    /// Returns the initial injections with duplicates removed, first
    /// occurrence kept.
    #[must_use]
    pub fn injection_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.initial_injections.len());
        for name in &self.initial_injections {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Builder method to set the `:help` text.
    #[must_use]
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    /// Builder method to set the input placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Builder method to set the result prefix.
    #[must_use]
    pub fn with_result_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.result_prefix = prefix.into();
        self
    }

    /// Builder method to set the sandbox prelude.
    #[must_use]
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Builder method to set the initial scripts.
    #[must_use]
    pub fn with_initial_scripts<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_scripts = scripts.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the initial injections.
    #[must_use]
    pub fn with_initial_injections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_injections = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the transcript replayed after startup.
    #[must_use]
    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = Some(transcript.into());
        self
    }

    /// Builder method to enable error tagging.
    #[must_use]
    pub fn with_tag_errors(mut self, tag_errors: bool) -> Self {
        self.tag_errors = tag_errors;
        self
    }
}
