use super::{Command, CommandContext, CommandError};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EchoCommand;

impl Command for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        writeln!(ctx.out, "{}", args.join(" "))?;
        Ok(())
    }
}
