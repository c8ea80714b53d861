use crate::errors::{ShellError, ShellResult};

/// A single parsed input line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    /// Program or builtin name followed by its arguments
    pub arguments: Vec<String>,
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    pub background: bool,
}

impl Command {
    pub fn name(&self) -> Option<&str> {
        self.arguments.first().map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// Whether a line should be skipped without producing a command
pub fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse one line of input.
///
/// Returns `Ok(None)` for blank and comment lines. `<` and `>` consume the
/// following token as a redirection target, and a trailing `&` marks the
/// command as background unless `foreground_only` is set, in which case the
/// token is dropped. The returned command may have no arguments when the line
/// held only control tokens; callers must not dispatch it.
pub fn parse_line(line: &str, foreground_only: bool) -> ShellResult<Option<Command>> {
    if is_blank_or_comment(line) {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut command = Command::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];

        if token == "<" || token == ">" {
            let target = tokens.get(i + 1).ok_or_else(|| {
                ShellError::RedirectionError(format!("expected file name after '{}'", token))
            })?;
            if token == "<" {
                command.input_path = Some(target.to_string());
            } else {
                command.output_path = Some(target.to_string());
            }
            i += 2;
            continue;
        }

        if token == "&" && i == tokens.len() - 1 {
            command.background = !foreground_only;
            i += 1;
            continue;
        }

        command.arguments.push(token.to_string());
        i += 1;
    }

    Ok(Some(command))
}
