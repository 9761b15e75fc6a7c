use super::{Command, CommandContext, CommandError, Resolution};
use std::io::Write;

/// Reports how each name would be run; built-ins are checked before the
/// search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeCommand;

impl Command for TypeCommand {
    fn name(&self) -> &'static str {
        "type"
    }

    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::InvalidArgument {
                command: "type",
                message: "usage: type <command>".to_string(),
            });
        }

        for name in args {
            match ctx.executor.resolve(name, ctx.state) {
                Resolution::Builtin(_) => writeln!(ctx.out, "{} is a shell builtin", name)?,
                Resolution::External(path) => writeln!(ctx.out, "{} is {}", name, path.display())?,
                Resolution::NotFound => writeln!(ctx.out, "{}: not found", name)?,
            }
        }
        Ok(())
    }
}
