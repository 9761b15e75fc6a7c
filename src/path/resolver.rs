use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Where the resolver gets its directory list from.
#[derive(Debug, Clone)]
pub enum SearchPath {
    /// Re-read the named environment variable on every lookup.
    Env(&'static str),
    /// A fixed value in the platform's `PATH` syntax.
    Fixed(OsString),
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    search_path: SearchPath,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PathResolver {
    pub fn from_env() -> Self {
        Self {
            search_path: SearchPath::Env("PATH"),
        }
    }

    pub fn with_path(path: impl Into<OsString>) -> Self {
        Self {
            search_path: SearchPath::Fixed(path.into()),
        }
    }

    /// Search directories in priority order, empty entries dropped.
    pub fn directories(&self) -> Vec<PathBuf> {
        let value = match &self.search_path {
            SearchPath::Env(var) => env::var_os(var),
            SearchPath::Fixed(value) => Some(value.clone()),
        };

        value
            .map(|value| {
                env::split_paths(&value)
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the first executable match for `name`, or `None`.
    ///
    /// Names containing a path separator are never searched for; see
    /// [`has_separator`].
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || has_separator(name) {
            return None;
        }

        for dir in self.directories() {
            for candidate in candidates(&dir, name) {
                if is_executable(&candidate) {
                    debug!(command = name, path = %candidate.display(), "resolved");
                    return Some(candidate);
                }
            }
        }

        debug!(command = name, "not found on search path");
        None
    }

    /// Every executable basename reachable through the search path.
    pub fn executables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();

        for dir in self.directories() {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.filter_map(Result::ok) {
                let path = entry.path();
                if !is_executable(&path) {
                    continue;
                }
                if let Some(name) = command_name(&path) {
                    names.insert(name);
                }
            }
        }

        names
    }
}

/// True for names like `./tool` or `/bin/ls` that address a file directly.
pub fn has_separator(name: &str) -> bool {
    name.contains(std::path::MAIN_SEPARATOR) || name.contains('/')
}

#[cfg(unix)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(not(unix))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut paths = vec![dir.join(name)];
    if Path::new(name).extension().is_none() {
        paths.extend(executable_extensions().iter().map(|ext| dir.join(format!("{name}{ext}"))));
    }
    paths
}

#[cfg(unix)]
fn command_name(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(str::to_owned)
}

#[cfg(not(unix))]
fn command_name(path: &Path) -> Option<String> {
    path.file_stem()?.to_str().map(str::to_owned)
}

/// Regular file the current user may execute (`access(2)` with `X_OK`).
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    if !path.is_file() {
        return false;
    }
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

/// Regular file whose extension is listed in `PATHEXT`.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let ext = format!(".{}", ext.to_ascii_lowercase());
    executable_extensions().iter().any(|known| *known == ext)
}

#[cfg(not(unix))]
fn executable_extensions() -> Vec<String> {
    env::var("PATHEXT")
        .unwrap_or_else(|_| ".com;.exe;.bat;.cmd".to_string())
        .split(';')
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
        .collect()
}
