use super::{Command, CommandContext, CommandError};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwdCommand;

impl Command for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn execute(&self, _args: &[String], ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        writeln!(ctx.out, "{}", ctx.state.current_dir().display())?;
        Ok(())
    }
}
