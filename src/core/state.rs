use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Mutable state threaded through every dispatch.
#[derive(Debug, Clone)]
pub struct ShellState {
    current_dir: PathBuf,
    home_dir: Option<PathBuf>,
    exit_code: Option<i32>,
    last_status: Option<i32>,
}

impl ShellState {
    /// Snapshot of the process working directory and `HOME`.
    pub fn from_env() -> io::Result<Self> {
        Ok(Self::new(env::current_dir()?, dirs::home_dir()))
    }

    pub fn new(current_dir: PathBuf, home_dir: Option<PathBuf>) -> Self {
        Self {
            current_dir,
            home_dir,
            exit_code: None,
            last_status: None,
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn set_current_dir(&mut self, dir: PathBuf) {
        self.current_dir = dir;
    }

    pub fn home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }

    /// Absolute, lexically normalised form of `path` relative to the
    /// current directory. Symlinks are left alone.
    pub fn absolutize(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        };

        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }

    pub fn request_exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }

    pub fn exit_requested(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn set_last_status(&mut self, status: i32) {
        self.last_status = Some(status);
    }

    /// Status of the most recent external command.
    pub fn last_status(&self) -> Option<i32> {
        self.last_status
    }
}
