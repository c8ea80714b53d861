use crate::commands::handle_command;
use crate::completion::ShellCompleter;
use crate::errors::{ShellError, ShellResult};
use crate::parser::parse_line;
use crate::session::{Flow, Session};
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{ColorMode, Config, Editor};
use std::io::{BufRead, Write};
use tracing::debug;

/// Somewhere command lines come from
pub trait LineSource {
    /// Show `prompt` and read one line. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> ShellResult<Option<String>>;
}

/// Interactive terminal input using rustyline
pub struct ReadlineSource {
    editor: Editor<ShellCompleter, DefaultHistory>,
}

impl ReadlineSource {
    pub fn new() -> ShellResult<Self> {
        let config = Config::builder()
            .color_mode(ColorMode::Enabled)
            .auto_add_history(true)
            .build();

        let mut editor: Editor<ShellCompleter, DefaultHistory> =
            Editor::with_config(config).map_err(|e| {
                ShellError::InputError(format!("Failed to create readline editor: {}", e))
            })?;

        editor.set_helper(Some(ShellCompleter));
        editor.set_completion_type(rustyline::CompletionType::List);

        Ok(Self { editor })
    }
}

impl LineSource for ReadlineSource {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> ShellResult<Option<String>> {
        out.flush()?;
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // Ctrl-C at the prompt just abandons the line
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(ShellError::InputError(format!("Readline error: {}", e))),
        }
    }
}

/// Line input from any buffered reader: scripts, pipes, `-c` and tests
pub struct BufReadSource<R> {
    reader: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> ShellResult<Option<String>> {
        write!(out, "{}", prompt)?;
        out.flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }

        // a line that is not valid UTF-8 is skipped like a blank one
        let Ok(line) = String::from_utf8(buf) else {
            debug!("ignoring line that is not valid UTF-8");
            return Ok(Some(String::new()));
        };
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Parse and dispatch one line of input
pub fn handle_command_input(
    input: &str,
    session: &mut Session,
    out: &mut dyn Write,
) -> ShellResult<Flow> {
    match parse_line(input, session.foreground_only())? {
        Some(command) if !command.is_empty() => handle_command(&command, session, out),
        _ => Ok(Flow::Continue),
    }
}
