mod completer;
mod editor;

pub use completer::{CommandCompleter, CompletionMode, PathCompleter, ShellCompleter};
pub use editor::{LineEditor, LineSource, ReadOutcome, ReaderSource};
