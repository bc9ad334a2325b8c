//! Command table and dispatch

use core::fmt::Write;

use super::error::CliError;
use super::parser::parse_line;
use super::Interpreter;

/// Handler for one command.
///
/// Writes the next chunk of output and returns `true` if more follows.
pub type CommandHandler = fn(&CommandContext<'_>, &mut dyn Write) -> bool;

/// Command descriptor
pub struct CommandDefinition {
    /// Word that selects the command (case-sensitive).
    pub command: &'static str,
    /// Shown by `help`, formatted as `"name:\r\n description\r\n\r\n"`.
    pub help: &'static str,
    pub handler: CommandHandler,
    /// Required parameter count; `None` accepts any.
    pub expected_parameters: Option<u8>,
}

/// What a handler gets to see.
pub struct CommandContext<'a> {
    /// The full line, command word included.
    pub line: &'a str,
    /// How many times the handler already ran for this line.
    pub call: usize,
    /// User commands, for `help`.
    pub commands: &'static [CommandDefinition],
}

impl<'a> CommandContext<'a> {
    /// Get parameter by position (1-based)
    pub fn parameter(&self, n: usize) -> Option<&'a str> {
        parse_line(self.line).parameter(n)
    }
}

/// Always registered, listed first.
pub static HELP_COMMAND: CommandDefinition = CommandDefinition {
    command: "help",
    help: "help:\r\n Lists all the registered commands\r\n\r\n",
    handler: cmd_help,
    expected_parameters: Some(0),
};

/// `help` prints one command's help text per call.
fn cmd_help(ctx: &CommandContext<'_>, out: &mut dyn Write) -> bool {
    let mut all = core::iter::once(&HELP_COMMAND).chain(ctx.commands.iter());
    if let Some(def) = all.nth(ctx.call) {
        let _ = out.write_str(def.help);
    }
    ctx.call < ctx.commands.len()
}

#[derive(Clone, Copy)]
struct InProgress {
    command: &'static CommandDefinition,
    call: usize,
}

/// Static command table with multi-call output.
pub struct CommandRegistry {
    commands: &'static [CommandDefinition],
    in_progress: Option<InProgress>,
}

impl CommandRegistry {
    /// Registry with `help` plus `commands`.
    pub const fn new(commands: &'static [CommandDefinition]) -> Self {
        Self {
            commands,
            in_progress: None,
        }
    }

    /// All command names, `help` first.
    pub fn command_names(&self) -> impl Iterator<Item = &'static str> {
        core::iter::once(&HELP_COMMAND)
            .chain(self.commands.iter())
            .map(|c| c.command)
    }

    /// Look up and validate the command named by `line`.
    pub fn resolve(&self, line: &str) -> Result<&'static CommandDefinition, CliError> {
        let parsed = parse_line(line);
        let def = core::iter::once(&HELP_COMMAND)
            .chain(self.commands.iter())
            .find(|c| c.command == parsed.command)
            .ok_or(CliError::UnknownCommand)?;

        match def.expected_parameters {
            Some(n) if parsed.parameter_count() != n as usize => Err(CliError::IncorrectParameters),
            _ => Ok(def),
        }
    }

    /// Whether a command is part-way through its output.
    pub fn is_busy(&self) -> bool {
        self.in_progress.is_some()
    }
}

impl Interpreter for CommandRegistry {
    fn process(&mut self, line: &str, out: &mut dyn Write) -> bool {
        // A command with pending output keeps going, whatever the line says.
        let current = match self.in_progress.take() {
            Some(current) => current,
            None => match self.resolve(line) {
                Ok(command) => InProgress { command, call: 0 },
                Err(e) => {
                    let _ = out.write_str(e.message());
                    return false;
                }
            },
        };

        let ctx = CommandContext {
            line,
            call: current.call,
            commands: self.commands,
        };
        let more = (current.command.handler)(&ctx, out);

        if more {
            self.in_progress = Some(InProgress {
                call: current.call + 1,
                ..current
            });
        }
        more
    }
}
