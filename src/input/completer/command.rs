use std::collections::BTreeSet;

use crate::core::commands::BuiltinRegistry;
use crate::path::PathResolver;

/// Completes the command token from built-ins and search-path executables.
#[derive(Debug, Clone)]
pub struct CommandCompleter {
    builtins: BuiltinRegistry,
    resolver: PathResolver,
}

impl CommandCompleter {
    pub fn new(builtins: BuiltinRegistry, resolver: PathResolver) -> Self {
        Self { builtins, resolver }
    }

    /// Lexically ordered, deduplicated names starting with `prefix`. The
    /// search path is rescanned on every call.
    pub fn complete_command(&self, prefix: &str) -> Vec<String> {
        let mut matches: BTreeSet<String> = self
            .builtins
            .names()
            .filter(|name| name.starts_with(prefix))
            .map(String::from)
            .collect();

        matches.extend(
            self.resolver
                .executables()
                .into_iter()
                .filter(|name| name.starts_with(prefix)),
        );

        matches.into_iter().collect()
    }
}
