use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::path::PathExpander;

/// Completes file and directory names. Directories come back with a
/// trailing `/`.
#[derive(Debug, Clone)]
pub struct PathCompleter {
    expander: PathExpander,
}

impl PathCompleter {
    pub fn new(expander: PathExpander) -> Self {
        Self { expander }
    }

    /// Candidates for `incomplete`, resolved against `base` when relative.
    /// The typed directory part is kept verbatim in every candidate.
    pub fn complete_path(&self, incomplete: &str, base: &Path) -> Vec<String> {
        let (dir_part, file_prefix) = match incomplete.rfind('/') {
            Some(idx) => incomplete.split_at(idx + 1),
            None => ("", incomplete),
        };

        let Some(dir_to_search) = self.search_dir(dir_part, base) else {
            return Vec::new();
        };
        let show_hidden = file_prefix.starts_with('.');

        let Ok(entries) = fs::read_dir(&dir_to_search) else {
            return Vec::new();
        };

        let mut matches: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                if !name.starts_with(file_prefix) || (name.starts_with('.') && !show_hidden) {
                    return None;
                }
                let suffix = if entry.path().is_dir() { "/" } else { "" };
                Some(format!("{}{}{}", dir_part, name, suffix))
            })
            .collect();

        matches.sort();
        matches
    }

    fn search_dir(&self, dir_part: &str, base: &Path) -> Option<PathBuf> {
        if dir_part.is_empty() {
            return Some(base.to_path_buf());
        }

        let expanded = self.expander.expand(dir_part).ok()?;

        Some(if expanded.is_absolute() {
            expanded
        } else {
            base.join(expanded)
        })
    }
}
