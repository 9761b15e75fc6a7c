use crate::process::ProcessError;

/// Keeps the shell alive when Ctrl-C reaches the whole foreground process
/// group. The child gets the default disposition back when it execs.
pub fn install_interrupt_guard() -> Result<(), ProcessError> {
    ctrlc::set_handler(|| {})?;
    Ok(())
}
