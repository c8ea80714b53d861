use crate::commands::BUILTINS;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;

/// Tab completion of command names: builtins and executables on PATH
#[derive(Clone)]
pub struct ShellCompleter;

impl ShellCompleter {
    /// Candidates for a command-name prefix, sorted and deduplicated
    pub fn command_candidates(prefix: &str) -> Vec<String> {
        let mut candidates: Vec<String> = BUILTINS
            .builtin_names()
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .map(String::from)
            .collect();

        if let Ok(path_var) = env::var("PATH") {
            for dir in env::split_paths(&path_var) {
                let Ok(entries) = fs::read_dir(dir) else {
                    continue;
                };
                for entry in entries.flatten() {
                    let Ok(file_name) = entry.file_name().into_string() else {
                        continue;
                    };
                    if !file_name.starts_with(prefix) {
                        continue;
                    }
                    if let Ok(metadata) = entry.metadata() {
                        let is_executable = metadata.permissions().mode() & 0o111 != 0;
                        if metadata.is_file() && is_executable {
                            candidates.push(file_name);
                        }
                    }
                }
            }
        }

        candidates.sort();
        candidates.dedup();
        candidates
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];
        let parts: Vec<&str> = input.split_whitespace().collect();

        // Only complete the first word (command name)
        if parts.len() > 1 || input.ends_with(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = parts.first().copied().unwrap_or("");
        let mut candidates: Vec<Pair> = Self::command_candidates(prefix)
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();

        // If there's exactly one match, add a trailing space
        if candidates.len() == 1 {
            candidates[0].replacement.push(' ');
        }

        Ok((pos - prefix.len(), candidates))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: CmdKind) -> bool {
        false
    }
}

impl Validator for ShellCompleter {}

impl Helper for ShellCompleter {}
