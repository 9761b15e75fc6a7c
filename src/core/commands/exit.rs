use super::{Command, CommandContext, CommandError};

/// Exit code used when `exit` is given a non-numeric operand.
pub const MALFORMED_EXIT_CODE: i32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitCommand;

impl Command for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(&self, args: &[String], ctx: &mut CommandContext<'_>) -> Result<(), CommandError> {
        match args {
            [] => {
                ctx.state.request_exit(0);
                Ok(())
            }
            [code] => match code.parse::<i64>() {
                Ok(code) => {
                    // Only the low byte survives as a process status.
                    ctx.state.request_exit(code.rem_euclid(256) as i32);
                    Ok(())
                }
                Err(_) => {
                    ctx.state.request_exit(MALFORMED_EXIT_CODE);
                    Err(CommandError::InvalidArgument {
                        command: "exit",
                        message: format!("{}: numeric argument required", code),
                    })
                }
            },
            _ => Err(CommandError::InvalidArgument {
                command: "exit",
                message: "too many arguments".to_string(),
            }),
        }
    }
}
