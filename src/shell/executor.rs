use std::env;
use std::io::Write;

use tracing::warn;

use crate::error::ShellError;
use crate::input::LineSource;

pub(crate) trait CommandHandler {
    /// Runs one line; returns the exit code once `exit` has been requested.
    fn execute_command(
        &mut self,
        line: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Option<i32>, ShellError>;
}

impl<S: LineSource> CommandHandler for super::Shell<S> {
    fn execute_command(
        &mut self,
        line: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Option<i32>, ShellError> {
        let previous_dir = self.state.current_dir().to_path_buf();

        if let Err(e) = self.executor.execute_line(line, &mut self.state, out) {
            writeln!(err, "{}", self.highlighter.highlight_error(&e.to_string()))?;
            err.flush()?;
        }

        // Keep relative PATH entries and completion in step with `cd`.
        if self.sync_process_dir && self.state.current_dir() != previous_dir {
            if let Err(e) = env::set_current_dir(self.state.current_dir()) {
                warn!(dir = %self.state.current_dir().display(), "couldn't change process directory: {}", e);
            }
        }

        Ok(self.state.exit_requested())
    }
}
