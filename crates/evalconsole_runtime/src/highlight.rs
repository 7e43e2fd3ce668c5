//! Syntax highlighting for the REPL.

use std::borrow::Cow;

use evalconsole_foundation::TypeTag;

use crate::special::SpecialCommand;

/// Highlighter for sandbox script input.
pub struct ScriptHighlighter {
    builtins: Vec<String>,
}

impl ScriptHighlighter {
    /// Creates a highlighter that knows the given built-in names.
    #[must_use]
    pub fn new(builtins: Vec<String>) -> Self {
        Self { builtins }
    }

    /// Highlight a line of input.
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let trimmed = line.trim_start();
        if SpecialCommand::KEYWORDS.iter().any(|kw| trimmed.starts_with(kw)) {
            return Cow::Owned(format!("\x1b[36m{line}\x1b[0m")); // cyan
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut chars = line.chars().peekable();
        let mut quote: Option<char> = None;

        while let Some(c) = chars.next() {
            if let Some(q) = quote {
                result.push(c);
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        result.push(next);
                    }
                } else if c == q {
                    result.push_str("\x1b[0m");
                    quote = None;
                }
                continue;
            }

            match c {
                // Comments run to the end of the line
                '/' if chars.peek() == Some(&'/') => {
                    result.push_str("\x1b[2;3m"); // dim italic
                    result.push(c);
                    result.extend(chars.by_ref());
                    result.push_str("\x1b[0m");
                }

                '"' | '\'' => {
                    result.push_str("\x1b[33m"); // yellow
                    result.push(c);
                    quote = Some(c);
                }

                c if c.is_ascii_digit() => {
                    result.push_str("\x1b[35m"); // magenta
                    result.push(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '.' {
                            result.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    result.push_str("\x1b[0m");
                }

                '=' if chars.peek() == Some(&'>') => {
                    chars.next();
                    result.push_str("\x1b[1m=>\x1b[0m");
                }

                '(' | ')' | '[' | ']' | '{' | '}' => {
                    result.push_str("\x1b[1m"); // bold
                    result.push(c);
                    result.push_str("\x1b[0m");
                }

                c if c.is_alphabetic() || c == '_' || c == '$' => {
                    let mut word = String::new();
                    word.push(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_alphanumeric() || next == '_' || next == '$' {
                            word.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }

                    let color = match word.as_str() {
                        "let" | "var" | "const" => "\x1b[32m",
                        "true" | "false" | "null" | "undefined" => "\x1b[34m",
                        _ if self.builtins.contains(&word) => "\x1b[1;32m",
                        _ => "",
                    };

                    if color.is_empty() {
                        result.push_str(&word);
                    } else {
                        result.push_str(color);
                        result.push_str(&word);
                        result.push_str("\x1b[0m");
                    }
                }

                _ => result.push(c),
            }
        }

        if quote.is_some() {
            result.push_str("\x1b[0m");
        }

        Cow::Owned(result)
    }
}

impl Default for ScriptHighlighter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Returns the ANSI style used to print a result with the given tag.
#[must_use]
pub const fn tag_style(tag: TypeTag) -> &'static str {
    match tag {
        TypeTag::Undefined => "\x1b[2m",
        TypeTag::Number => "\x1b[35m",
        TypeTag::String => "\x1b[33m",
        TypeTag::Object | TypeTag::Array => "\x1b[36m",
        TypeTag::Function => "\x1b[34m",
        TypeTag::Error => "\x1b[31m",
        TypeTag::Builtin => "\x1b[32m",
        TypeTag::None => "",
    }
}
