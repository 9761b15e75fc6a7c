use std::io::BufRead;
use std::path::PathBuf;

use rustyline::{
    error::ReadlineError, history::FileHistory, CompletionType, Config, Editor,
};
use tracing::{debug, warn};

use super::ShellCompleter;
use crate::error::ShellError;

/// Result of asking for one more line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C at the prompt: drop the partial line and ask again.
    Interrupted,
    Eof,
}

pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;
}

/// Interactive source backed by rustyline, with a history file.
pub struct LineEditor {
    editor: Editor<ShellCompleter, FileHistory>,
    history_file: Option<PathBuf>,
}

impl LineEditor {
    pub fn new(helper: ShellCompleter, history_file: Option<PathBuf>) -> Result<Self, ShellError> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(true)
            .build();
        let mut editor = Editor::<ShellCompleter, FileHistory>::with_config(config)?;
        editor.set_helper(Some(helper));

        if let Some(path) = history_file.as_ref().filter(|path| path.exists()) {
            match editor.load_history(path) {
                Ok(()) => debug!(path = %path.display(), "history loaded"),
                Err(e) => warn!(path = %path.display(), "couldn't load history: {}", e),
            }
        }

        Ok(LineEditor {
            editor,
            history_file,
        })
    }

    pub fn save_history(&mut self) {
        let Some(path) = &self.history_file else {
            return;
        };
        if let Err(e) = self.editor.save_history(path) {
            warn!(path = %path.display(), "couldn't save history: {}", e);
        }
    }
}

impl LineSource for LineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads lines from any buffered reader; no prompt is shown.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, ShellError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(ReadOutcome::Line(line))
    }
}
