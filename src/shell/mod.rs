use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

mod executor;

use crate::{
    core::{commands::CommandExecutor, ShellState},
    error::ShellError,
    flags::Flags,
    highlight::SyntaxHighlighter,
    input::{LineEditor, LineSource, ReadOutcome, ShellCompleter},
    path::{PathExpander, PathResolver},
    process::signal,
};

use executor::CommandHandler;

pub const PROMPT: &str = "$ ";
pub const HISTORY_FILE: &str = ".venule_history";

/// The read-dispatch loop over some source of lines.
pub struct Shell<S = LineEditor> {
    source: S,
    executor: CommandExecutor,
    state: ShellState,
    highlighter: SyntaxHighlighter,
    sync_process_dir: bool,
}

impl Shell<LineEditor> {
    /// Interactive shell on the terminal, configured from `flags` and the
    /// environment.
    pub fn new(flags: &Flags) -> Result<Self, ShellError> {
        let state = ShellState::from_env()?;
        let resolver = PathResolver::from_env();
        let executor = CommandExecutor::new(resolver.clone());
        let highlighter = SyntaxHighlighter::new();

        let completer = ShellCompleter::new(
            executor.builtins().clone(),
            resolver,
            PathExpander::new(state.home_dir().map(Path::to_path_buf)),
            highlighter,
        );

        let history_file = flags
            .get_value("history")
            .map(PathBuf::from)
            .or_else(|| state.home_dir().map(|home| home.join(HISTORY_FILE)));
        let source = LineEditor::new(completer, history_file)?;

        signal::install_interrupt_guard()?;

        Ok(Shell {
            source,
            executor,
            state,
            highlighter,
            sync_process_dir: true,
        })
    }

    /// Runs until `exit` or end of input and returns the exit code.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        let result = self.run_with(&mut io::stdout(), &mut io::stderr());
        self.source.save_history();
        result
    }
}

impl<S: LineSource> Shell<S> {
    /// Shell over an arbitrary source. The process working directory is
    /// left alone; `cd` only moves the shell's own state.
    pub fn with_source(source: S, executor: CommandExecutor, state: ShellState) -> Self {
        Shell {
            source,
            executor,
            state,
            highlighter: SyntaxHighlighter::plain(),
            sync_process_dir: false,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn run_with(
        &mut self,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<i32, ShellError> {
        loop {
            match self.source.read_line(PROMPT)? {
                ReadOutcome::Line(line) => {
                    if let Some(code) = self.execute_command(&line, out, err)? {
                        debug!(code, "exit requested");
                        return Ok(code);
                    }
                }
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => {
                    debug!("end of input");
                    return Ok(0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::MALFORMED_EXIT_CODE;
    use crate::input::ReaderSource;
    use std::collections::VecDeque;
    use std::fs;
    use std::io::Cursor;

    struct Session {
        code: i32,
        out: String,
        err: String,
        state: ShellState,
    }

    fn run_session<S: LineSource>(source: S, path: &str, cwd: &Path) -> Session {
        let executor = CommandExecutor::new(PathResolver::with_path(path));
        let state = ShellState::new(cwd.to_path_buf(), Some(cwd.to_path_buf()));
        let mut shell = Shell::with_source(source, executor, state);

        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = shell.run_with(&mut out, &mut err).unwrap();
        Session {
            code,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
            state: shell.state().clone(),
        }
    }

    fn run_script(script: &str, cwd: &Path) -> Session {
        run_session(ReaderSource::new(Cursor::new(script.to_string())), "", cwd)
    }

    struct Scripted(VecDeque<ReadOutcome>);

    impl LineSource for Scripted {
        fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome, ShellError> {
            Ok(self.0.pop_front().unwrap_or(ReadOutcome::Eof))
        }
    }

    #[test]
    fn test_cd_then_pwd() {
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(home.path().join("Documents")).unwrap();

        let session = run_script("cd Documents\npwd\n", home.path());
        assert_eq!(session.code, 0);
        assert_eq!(session.out, format!("{}\n", home.path().join("Documents").display()));
        assert!(session.err.is_empty());
    }

    #[test]
    fn test_type_echo() {
        let dir = tempfile::tempdir().unwrap();
        let session = run_script("type echo\n", dir.path());
        assert_eq!(session.out, "echo is a shell builtin\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_type_ls() {
        if !Path::new("/usr/bin/ls").exists() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let source = ReaderSource::new(Cursor::new("type ls\n"));
        let session = run_session(source, "/usr/bin", dir.path());
        assert_eq!(session.out, "ls is /usr/bin/ls\n");
    }

    #[test]
    fn test_exit_code_stops_reading() {
        let dir = tempfile::tempdir().unwrap();
        let session = run_script("exit 7\necho unreachable\n", dir.path());
        assert_eq!(session.code, 7);
        assert!(session.out.is_empty());
    }

    #[test]
    fn test_malformed_exit() {
        let dir = tempfile::tempdir().unwrap();
        let session = run_script("exit seven\necho unreachable\n", dir.path());
        assert_eq!(session.code, MALFORMED_EXIT_CODE);
        assert_eq!(session.err, "exit: seven: numeric argument required\n");
        assert!(session.out.is_empty());
    }

    #[test]
    fn test_unknown_command_keeps_looping() {
        let dir = tempfile::tempdir().unwrap();
        let session = run_script("frobnicate\necho still here\n", dir.path());
        assert_eq!(session.code, 0);
        assert_eq!(session.err, "frobnicate: command not found\n");
        assert_eq!(session.out, "still here\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_failure_keeps_looping() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let broken = bin.path().join("broken");
        fs::write(&broken, "#!/nonexistent/interp\n").unwrap();
        fs::set_permissions(&broken, fs::Permissions::from_mode(0o755)).unwrap();

        let source = ReaderSource::new(Cursor::new("broken\necho next\n"));
        let path = bin.path().to_str().unwrap().to_string();
        let session = run_session(source, &path, bin.path());

        assert_eq!(session.code, 0);
        assert!(session.err.starts_with("broken: "), "stderr: {}", session.err);
        assert!(session.err.contains("os error"), "stderr: {}", session.err);
        assert_eq!(session.err.lines().count(), 1);
        assert_eq!(session.out, "next\n");
        assert_eq!(session.state.last_status(), None);
    }

    #[test]
    fn test_failed_cd_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let session = run_script("cd missing\npwd\n", dir.path());
        assert_eq!(session.err, "cd: missing: No such file or directory\n");
        assert_eq!(session.out, format!("{}\n", dir.path().display()));
        assert_eq!(session.state.current_dir(), dir.path());
    }

    #[test]
    fn test_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let session = run_script("", dir.path());
        assert_eq!(session.code, 0);
        assert!(session.out.is_empty());
        assert!(session.err.is_empty());
    }

    #[test]
    fn test_blank_lines_and_interrupts() {
        let dir = tempfile::tempdir().unwrap();
        let source = Scripted(VecDeque::from(vec![
            ReadOutcome::Line("   ".to_string()),
            ReadOutcome::Interrupted,
            ReadOutcome::Line("echo ok".to_string()),
            ReadOutcome::Line("exit 3".to_string()),
            ReadOutcome::Line("echo unreachable".to_string()),
        ]));

        let session = run_session(source, "", dir.path());
        assert_eq!(session.code, 3);
        assert_eq!(session.out, "ok\n");
        assert!(session.err.is_empty());
    }
}
