//! Firmware commands

use core::fmt::Write;

use super::registry::{CommandContext, CommandDefinition};
use crate::config::{FIRMWARE_VERSION, VERSION_STRING};
use crate::stats::CONSOLE_STATS;

/// Commands registered by the firmware, after `help`.
pub static COMMANDS: &[CommandDefinition] = &[
    CommandDefinition {
        command: "version",
        help: "version:\r\n Prints the firmware version\r\n\r\n",
        handler: cmd_version,
        expected_parameters: Some(0),
    },
    CommandDefinition {
        command: "stats",
        help: "stats:\r\n Prints console transfer and input counters\r\n\r\n",
        handler: cmd_stats,
        expected_parameters: Some(0),
    },
    CommandDefinition {
        command: "echo-3-parameters",
        help: "echo-3-parameters <param1> <param2> <param3>:\r\n Expects three parameters, echos each in turn\r\n\r\n",
        handler: cmd_echo_parameters,
        expected_parameters: Some(3),
    },
    CommandDefinition {
        command: "echo-parameters",
        help: "echo-parameters <...>:\r\n Take variable number of parameters, echos each in turn\r\n\r\n",
        handler: cmd_echo_parameters,
        expected_parameters: None,
    },
];

fn cmd_version(_ctx: &CommandContext<'_>, out: &mut dyn Write) -> bool {
    let _ = write!(out, "LiPow firmware {} ({})\r\n", FIRMWARE_VERSION, VERSION_STRING);
    false
}

/// One counter per call.
fn cmd_stats(ctx: &CommandContext<'_>, out: &mut dyn Write) -> bool {
    let entries = CONSOLE_STATS.snapshot().entries();
    if let Some((name, value)) = entries.get(ctx.call) {
        let _ = write!(out, "{}: {}\r\n", name, value);
    }
    ctx.call + 1 < entries.len()
}

/// Header first, then one parameter per call.
fn cmd_echo_parameters(ctx: &CommandContext<'_>, out: &mut dyn Write) -> bool {
    if ctx.call == 0 {
        let _ = out.write_str("The parameters were:\r\n");
    } else if let Some(param) = ctx.parameter(ctx.call) {
        let _ = write!(out, "{}: {}\r\n", ctx.call, param);
    }
    ctx.parameter(ctx.call + 1).is_some()
}
