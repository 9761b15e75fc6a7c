use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use super::ProcessError;

/// Runs resolved external programs in the foreground.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Spawns `program` with inherited stdio and blocks until it exits.
    ///
    /// `name` is what the user typed and becomes the child's `argv[0]`.
    pub fn run(
        &self,
        name: &str,
        program: &Path,
        args: &[String],
        cwd: &Path,
    ) -> Result<ExitStatus, ProcessError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.arg0(name);
        }

        debug!(command = name, program = %program.display(), ?args, "spawning");
        let mut child = command.spawn().map_err(ProcessError::Spawn)?;
        let status = child.wait().map_err(ProcessError::Wait)?;
        debug!(command = name, %status, "child exited");

        Ok(status)
    }
}

/// Shell-style status number: the exit code, or 128 + signal.
pub fn status_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
