mod command;
mod path;
mod shell;

pub use command::CommandCompleter;
pub use path::PathCompleter;
pub use shell::{CompletionMode, ShellCompleter};
