//! Transcripts: text files of commands to replay.
//!
//! A transcript is a sequence of commands, one per line. A command whose
//! brackets or string are still open continues on the next line. Lines of
//! the form `// => result` record a previous result and are skipped, so a
//! saved session can be replayed as-is:
//!
//! ```text
//! let xs = [1, 2, 3]
//! len(xs)
//! // => 3
//! ```

/// Prefix of a result annotation line.
pub const ANNOTATION: &str = "// =>";

/// Splits a transcript into commands, dropping annotations and blank lines.
#[must_use]
pub fn split_commands(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut pending = String::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if pending.is_empty() && (trimmed.is_empty() || trimmed.starts_with(ANNOTATION)) {
            continue;
        }

        if !pending.is_empty() {
            pending.push('\n');
        }
        pending.push_str(line);

        if is_complete(&pending) {
            commands.push(std::mem::take(&mut pending).trim().to_string());
        }
    }

    if !pending.trim().is_empty() {
        commands.push(pending.trim().to_string());
    }
    commands
}

/// Renders entries back into transcript form.
pub fn format_entries<'a>(entries: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> String {
    let mut out = String::new();
    for (command, result) in entries {
        out.push_str(command);
        out.push('\n');
        if let Some(result) = result {
            for line in result.lines() {
                out.push_str(ANNOTATION);
                out.push(' ');
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    out
}

/// Returns true if `input` has balanced brackets and no open string.
///
/// Brackets inside strings and `//` comments are ignored.
#[must_use]
pub fn is_complete(input: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escape_next = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match (quote, c) {
            (Some(_), '\\') => escape_next = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), '\n') => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '/') if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth -= 1,
            (None, _) => {}
        }
    }

    depth <= 0 && quote.is_none()
}
