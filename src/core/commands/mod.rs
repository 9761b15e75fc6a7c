use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

mod cd;
mod echo;
mod exit;
mod pwd;
mod type_cmd;

pub use cd::CdCommand;
pub use echo::EchoCommand;
pub use exit::{ExitCommand, MALFORMED_EXIT_CODE};
pub use pwd::PwdCommand;
pub use type_cmd::TypeCommand;

use crate::core::ShellState;
use crate::path::{has_separator, is_executable, PathResolver};
use crate::process::executor::status_code;
use crate::process::{ProcessError, ProcessExecutor};

#[derive(Debug)]
pub enum CommandError {
    DirectoryNotFound { path: String, exists: bool },
    PermissionDenied(String),
    CommandNotFound(String),
    InvalidArgument { command: &'static str, message: String },
    ProcessSpawnFailure { command: String, source: ProcessError },
    Io(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::DirectoryNotFound { path, exists: false } => {
                write!(f, "cd: {}: No such file or directory", path)
            }
            CommandError::DirectoryNotFound { path, exists: true } => {
                write!(f, "cd: {}: Not a directory", path)
            }
            CommandError::PermissionDenied(path) => write!(f, "cd: {}: Permission denied", path),
            CommandError::CommandNotFound(cmd) => write!(f, "{}: command not found", cmd),
            CommandError::InvalidArgument { command, message } => {
                write!(f, "{}: {}", command, message)
            }
            CommandError::ProcessSpawnFailure { command, source } => {
                write!(f, "{}: {}", command, source)
            }
            CommandError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::Io(err)
    }
}

/// Everything a built-in may touch while it runs.
pub struct CommandContext<'a> {
    pub state: &'a mut ShellState,
    pub executor: &'a CommandExecutor,
    pub out: &'a mut dyn Write,
}

pub trait Command {
    fn name(&self) -> &'static str;
    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<(), CommandError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd(CdCommand),
    Pwd(PwdCommand),
    Echo(EchoCommand),
    Type(TypeCommand),
    Exit(ExitCommand),
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Cd(CdCommand),
        Builtin::Echo(EchoCommand),
        Builtin::Exit(ExitCommand),
        Builtin::Pwd(PwdCommand),
        Builtin::Type(TypeCommand),
    ];
}

impl Command for Builtin {
    fn name(&self) -> &'static str {
        match self {
            Builtin::Cd(cmd) => cmd.name(),
            Builtin::Pwd(cmd) => cmd.name(),
            Builtin::Echo(cmd) => cmd.name(),
            Builtin::Type(cmd) => cmd.name(),
            Builtin::Exit(cmd) => cmd.name(),
        }
    }

    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        match self {
            Builtin::Cd(cmd) => cmd.execute(args, ctx),
            Builtin::Pwd(cmd) => cmd.execute(args, ctx),
            Builtin::Echo(cmd) => cmd.execute(args, ctx),
            Builtin::Type(cmd) => cmd.execute(args, ctx),
            Builtin::Exit(cmd) => cmd.execute(args, ctx),
        }
    }
}

/// Fixed name to built-in table, built once at startup.
#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    commands: BTreeMap<&'static str, Builtin>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let commands = Builtin::ALL
            .into_iter()
            .map(|builtin| (builtin.name(), builtin))
            .collect();
        Self { commands }
    }

    pub fn lookup(&self, name: &str) -> Option<Builtin> {
        self.commands.get(name).copied()
    }

    /// Registered names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}

/// Outcome of mapping a command name; built-ins shadow executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Builtin(Builtin),
    External(PathBuf),
    NotFound,
}

pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

#[derive(Debug, Clone)]
pub struct CommandExecutor {
    builtins: BuiltinRegistry,
    resolver: PathResolver,
    process_executor: ProcessExecutor,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(PathResolver::from_env())
    }
}

impl CommandExecutor {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            builtins: BuiltinRegistry::new(),
            resolver,
            process_executor: ProcessExecutor::new(),
        }
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Built-ins first, then the search path. Names with a separator are
    /// taken relative to the shell's current directory.
    pub fn resolve(&self, name: &str, state: &ShellState) -> Resolution {
        if let Some(builtin) = self.builtins.lookup(name) {
            return Resolution::Builtin(builtin);
        }

        if has_separator(name) {
            let path = state.absolutize(Path::new(name));
            return if is_executable(&path) {
                Resolution::External(path)
            } else {
                Resolution::NotFound
            };
        }

        match self.resolver.resolve(name) {
            Some(path) => Resolution::External(path),
            None => Resolution::NotFound,
        }
    }

    /// Tokenizes and runs one input line. Blank lines are a no-op.
    pub fn execute_line(
        &self,
        line: &str,
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let tokens = tokenize(line);
        match tokens.split_first() {
            Some((command, args)) => self.execute(command, args, state, out),
            None => Ok(()),
        }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        match self.resolve(command, state) {
            Resolution::Builtin(builtin) => {
                debug!(command, "dispatching builtin");
                let mut ctx = CommandContext {
                    state,
                    executor: self,
                    out,
                };
                let result = builtin.execute(args, &mut ctx);
                ctx.out.flush()?;
                result
            }
            Resolution::External(program) => {
                // Keep our buffered output ahead of the child's.
                out.flush()?;
                let status = self
                    .process_executor
                    .run(command, &program, args, state.current_dir())
                    .map_err(|source| CommandError::ProcessSpawnFailure {
                        command: command.to_string(),
                        source,
                    })?;
                state.set_last_status(status_code(&status));
                Ok(())
            }
            Resolution::NotFound => Err(CommandError::CommandNotFound(command.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    pub(crate) fn run(
        executor: &CommandExecutor,
        state: &mut ShellState,
        line: &str,
    ) -> (Result<(), CommandError>, String) {
        let mut out = Vec::new();
        let result = executor.execute_line(line, state, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    pub(crate) fn test_state(dir: &Path) -> ShellState {
        ShellState::new(dir.to_path_buf(), Some(dir.to_path_buf()))
    }

    #[test]
    fn test_registry_names_are_sorted_and_unique() {
        let registry = BuiltinRegistry::new();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["cd", "echo", "exit", "pwd", "type"]);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = BuiltinRegistry::new();
        assert_eq!(registry.lookup("echo"), Some(Builtin::Echo(EchoCommand)));
        assert!(registry.is_builtin("cd"));
        assert!(!registry.is_builtin("ls"));
        assert!(!registry.is_builtin(""));
        assert_eq!(registry.lookup("ECHO"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_builtin_shadows_executable() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        for name in ["echo", "ls"] {
            let path = bin.path().join(name);
            std::fs::write(&path, "#!/bin/sh\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let executor = CommandExecutor::new(PathResolver::with_path(bin.path().as_os_str()));
        let state = test_state(bin.path());
        assert_eq!(
            executor.resolve("echo", &state),
            Resolution::Builtin(Builtin::Echo(EchoCommand))
        );
        assert_eq!(
            executor.resolve("ls", &state),
            Resolution::External(bin.path().join("ls"))
        );
        assert_eq!(executor.resolve("frobnicate", &state), Resolution::NotFound);
    }

    #[test]
    fn test_unknown_command() {
        let dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(PathResolver::with_path(""));
        let mut state = test_state(dir.path());

        let (result, output) = run(&executor, &mut state, "frobnicate --now");
        let err = result.unwrap_err();
        assert!(matches!(err, CommandError::CommandNotFound(ref name) if name == "frobnicate"));
        assert_eq!(err.to_string(), "frobnicate: command not found");
        assert!(output.is_empty());
    }

    #[test]
    fn test_blank_line_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(PathResolver::with_path(""));
        let mut state = test_state(dir.path());

        let (result, output) = run(&executor, &mut state, "   \t ");
        assert!(result.is_ok());
        assert!(output.is_empty());
        assert_eq!(state.current_dir(), dir.path());
    }

    #[cfg(unix)]
    #[test]
    fn test_external_status_recorded() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let script = bin.path().join("fail");
        std::fs::write(&script, "#!/bin/sh\nexit 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut search = bin.path().as_os_str().to_owned();
        search.push(":/bin:/usr/bin");
        let executor = CommandExecutor::new(PathResolver::with_path(search));
        let mut state = test_state(bin.path());

        let (result, _) = run(&executor, &mut state, "fail");
        assert!(result.is_ok());
        assert_eq!(state.last_status(), Some(5));

        let (result, _) = run(&executor, &mut state, "true");
        assert!(result.is_ok());
        assert_eq!(state.last_status(), Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_program_uses_shell_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        let tool = dir.path().join("bin/tool");
        std::fs::write(&tool, "#!/bin/sh\nexit 4\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let executor = CommandExecutor::new(PathResolver::with_path("/bin:/usr/bin"));
        let mut state = test_state(dir.path());

        let (result, output) = run(&executor, &mut state, "type bin/tool ./bin/missing");
        assert!(result.is_ok());
        assert_eq!(
            output,
            format!("bin/tool is {}\n./bin/missing: not found\n", tool.display())
        );

        let (result, _) = run(&executor, &mut state, "./bin/tool");
        assert!(result.is_ok());
        assert_eq!(state.last_status(), Some(4));

        assert!(run(&executor, &mut state, "cd bin").0.is_ok());
        let (result, _) = run(&executor, &mut state, "./tool");
        assert!(result.is_ok());
        assert_eq!(state.last_status(), Some(4));

        let (result, _) = run(&executor, &mut state, "./bin/tool");
        assert!(matches!(result, Err(CommandError::CommandNotFound(_))));
    }

    #[test]
    fn test_command_error_display() {
        let errors = vec![
            CommandError::DirectoryNotFound {
                path: "nowhere".to_string(),
                exists: false,
            },
            CommandError::PermissionDenied("/root".to_string()),
            CommandError::CommandNotFound("test".to_string()),
            CommandError::InvalidArgument {
                command: "exit",
                message: "bad".to_string(),
            },
            CommandError::Io(std::io::Error::new(std::io::ErrorKind::Other, "io error")),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
