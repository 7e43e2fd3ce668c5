//! Recognition of console commands that never reach the sandbox.

/// A console-level command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecialCommand<'a> {
    /// `:clear` empties the history.
    Clear,
    /// `:help` prints the configured help text.
    Help,
    /// `:load <src>` loads a script into the sandbox.
    Load(&'a str),
    /// `:inject a, b` binds host values into the sandbox.
    Inject(Vec<&'a str>),
}

impl<'a> SpecialCommand<'a> {
    /// Keyword for [`SpecialCommand::Clear`].
    pub const CLEAR: &'static str = ":clear";
    /// Keyword for [`SpecialCommand::Help`].
    pub const HELP: &'static str = ":help";
    /// Keyword for [`SpecialCommand::Load`].
    pub const LOAD: &'static str = ":load";
    /// Keyword for [`SpecialCommand::Inject`].
    pub const INJECT: &'static str = ":inject";

    /// All keywords, in matching order.
    pub const KEYWORDS: [&'static str; 4] = [Self::CLEAR, Self::HELP, Self::LOAD, Self::INJECT];

    /// Recognises a trimmed command. The first match wins.
    ///
    /// `:clear` and `:help` must be the whole command. `:load` and
    /// `:inject` match anywhere in the command; their argument is the text
    /// after the first occurrence of the keyword.
    #[must_use]
    pub fn parse(command: &'a str) -> Option<Self> {
        if command == Self::CLEAR {
            return Some(Self::Clear);
        }
        if command == Self::HELP {
            return Some(Self::Help);
        }
        if let Some(src) = argument(command, Self::LOAD) {
            return Some(Self::Load(src));
        }
        argument(command, Self::INJECT).map(|names| {
            Self::Inject(
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect(),
            )
        })
    }
}

fn argument<'a>(command: &'a str, keyword: &str) -> Option<&'a str> {
    command
        .find(keyword)
        .map(|at| command[at + keyword.len()..].trim())
}
