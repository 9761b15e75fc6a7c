use super::PathError;
use std::path::{Path, PathBuf};

/// Expands a leading `~` against a fixed home directory.
#[derive(Debug, Clone, Default)]
pub struct PathExpander {
    home: Option<PathBuf>,
}

impl PathExpander {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    pub fn expand(&self, path: &str) -> Result<PathBuf, PathError> {
        if self.is_home_path(path) {
            self.expand_tilde(path)
        } else {
            Ok(Path::new(path).to_path_buf())
        }
    }

    fn expand_tilde(&self, path: &str) -> Result<PathBuf, PathError> {
        let mut home_path = self.home_dir()?.to_path_buf();
        if let Some(stripped) = path[1..].strip_prefix('/') {
            for part in stripped.split('/') {
                if !part.is_empty() {
                    home_path.push(part);
                }
            }
        }
        Ok(home_path)
    }

    /// `~` and `~/...` only; `~user` forms are taken literally.
    pub fn is_home_path(&self, path: &str) -> bool {
        path == "~" || path.starts_with("~/")
    }

    pub fn home_dir(&self) -> Result<&Path, PathError> {
        self.home.as_deref().ok_or(PathError::HomeDirNotFound)
    }
}
