use std::fmt;

pub mod executor;
pub mod signal;

pub use executor::ProcessExecutor;

#[derive(Debug)]
pub enum ProcessError {
    Spawn(std::io::Error),
    Wait(std::io::Error),
    SignalError(String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Spawn(e) => write!(f, "{}", e),
            ProcessError::Wait(e) => write!(f, "failed waiting for child: {}", e),
            ProcessError::SignalError(msg) => write!(f, "Signal error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

impl From<ctrlc::Error> for ProcessError {
    fn from(err: ctrlc::Error) -> Self {
        ProcessError::SignalError(err.to_string())
    }
}
