use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};

use super::{command::CommandCompleter, path::PathCompleter};
use crate::core::commands::BuiltinRegistry;
use crate::highlight::SyntaxHighlighter;
use crate::path::{PathExpander, PathResolver};

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    Command,
    Path,
}

/// Line-editor helper: completion plus input highlighting.
#[derive(Debug, Clone)]
pub struct ShellCompleter {
    command_completer: CommandCompleter,
    path_completer: PathCompleter,
    highlighter: SyntaxHighlighter,
}

impl ShellCompleter {
    pub fn new(
        builtins: BuiltinRegistry,
        resolver: PathResolver,
        expander: PathExpander,
        highlighter: SyntaxHighlighter,
    ) -> Self {
        ShellCompleter {
            command_completer: CommandCompleter::new(builtins, resolver),
            path_completer: PathCompleter::new(expander),
            highlighter,
        }
    }

    /// Candidates for the last token of `line`, relative to the process
    /// working directory.
    pub fn complete_line(&self, line: &str) -> Vec<String> {
        let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.complete_line_in(line, &base)
    }

    pub fn complete_line_in(&self, line: &str, base: &Path) -> Vec<String> {
        let (start, mode) = classify(line);
        let word = &line[start..];
        match mode {
            CompletionMode::Command => self.command_completer.complete_command(word),
            CompletionMode::Path => self.path_completer.complete_path(word, base),
        }
    }
}

/// Byte offset of the token under completion and how to complete it.
pub(crate) fn classify(line: &str) -> (usize, CompletionMode) {
    let start = line
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(idx, c)| idx + c.len_utf8());

    let word = &line[start..];
    let first_token = line[..start].trim().is_empty();
    if first_token && !word.contains('/') {
        (start, CompletionMode::Command)
    } else {
        (start, CompletionMode::Path)
    }
}

impl Helper for ShellCompleter {}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(self.highlighter.highlight_command(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Validator for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_up_to_cursor = &line[..pos];
        let (start, _) = classify(line_up_to_cursor);
        let candidates = self.complete_line(line_up_to_cursor);

        // A unique file or command match is finished off with a space.
        let unique = candidates.len() == 1;
        let pairs = candidates
            .into_iter()
            .map(|candidate| {
                let replacement = if unique && !candidate.ends_with('/') {
                    format!("{} ", candidate)
                } else {
                    candidate.clone()
                };
                Pair {
                    display: candidate,
                    replacement,
                }
            })
            .collect();

        Ok((start, pairs))
    }
}
