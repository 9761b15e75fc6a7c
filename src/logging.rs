use tracing_subscriber::EnvFilter;

use crate::error::ShellError;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "VENULE_LOG";

/// Installs the global subscriber. Logs go to stderr, untimestamped.
///
/// `--debug` overrides the environment; `--quiet` lowers the default from
/// `warn` to `error`.
pub fn init(debug: bool, quiet: bool) -> Result<(), ShellError> {
    let filter = if debug {
        EnvFilter::new("venule=debug")
    } else {
        let default = if quiet { "error" } else { "warn" };
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| ShellError::LoggingError(e.to_string()))
}
