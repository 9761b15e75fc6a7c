use super::{Command, CommandContext, CommandError};
use crate::path::PathExpander;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CdCommand;

impl CdCommand {
    fn check_directory(target: &Path, shown: &str) -> Result<(), CommandError> {
        let metadata = fs::metadata(target).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => CommandError::PermissionDenied(shown.to_string()),
            _ => CommandError::DirectoryNotFound {
                path: shown.to_string(),
                exists: false,
            },
        })?;

        if !metadata.is_dir() {
            return Err(CommandError::DirectoryNotFound {
                path: shown.to_string(),
                exists: true,
            });
        }

        if !searchable(target) {
            return Err(CommandError::PermissionDenied(shown.to_string()));
        }
        Ok(())
    }
}

#[cfg(unix)]
fn searchable(dir: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

#[cfg(not(unix))]
fn searchable(dir: &Path) -> bool {
    fs::read_dir(dir).is_ok()
}

impl Command for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        if args.len() > 1 {
            return Err(CommandError::InvalidArgument {
                command: "cd",
                message: "too many arguments".to_string(),
            });
        }

        let shown = args.first().map(String::as_str).unwrap_or("~");
        let expander = PathExpander::new(ctx.state.home_dir().map(Path::to_path_buf));
        let expanded = expander.expand(shown).map_err(|e| CommandError::InvalidArgument {
            command: "cd",
            message: e.to_string(),
        })?;

        let target = ctx.state.absolutize(&expanded);
        Self::check_directory(&target, shown)?;

        debug!(target = %target.display(), "changing directory");
        ctx.state.set_current_dir(target);
        Ok(())
    }
}
