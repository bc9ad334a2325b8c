//! Command registry tests

use std::fmt::Write;

use lipow_console::cli::builtin::COMMANDS;
use lipow_console::cli::{CliError, CommandContext, CommandDefinition, OutputBuffer};
use lipow_console::config::{FIRMWARE_VERSION, VERSION_STRING};
use lipow_console::{CommandRegistry, Interpreter};

/// Call the interpreter until it has nothing more, one string per call.
fn run(registry: &mut CommandRegistry, line: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    loop {
        let mut out: OutputBuffer = OutputBuffer::new();
        let more = registry.process(line, &mut out);
        chunks.push(out.as_str().to_string());
        if !more {
            return chunks;
        }
        assert!(chunks.len() < 100, "interpreter never finished");
    }
}

#[test]
fn test_help_lists_one_command_per_call() {
    let mut registry = CommandRegistry::new(COMMANDS);

    let chunks = run(&mut registry, "help");

    assert_eq!(chunks.len(), COMMANDS.len() + 1);
    assert!(chunks[0].starts_with("help:\r\n"));
    for (chunk, def) in chunks[1..].iter().zip(COMMANDS) {
        assert_eq!(chunk, def.help);
    }
    assert!(!registry.is_busy());
}

#[test]
fn test_command_names_help_first() {
    let registry = CommandRegistry::new(COMMANDS);
    let names: Vec<_> = registry.command_names().collect();

    assert_eq!(
        names,
        vec!["help", "version", "stats", "echo-3-parameters", "echo-parameters"]
    );
}

#[test]
fn test_unknown_command() {
    let mut registry = CommandRegistry::new(COMMANDS);

    let chunks = run(&mut registry, "foo");

    assert_eq!(
        chunks,
        vec!["Command not recognised.  Enter 'help' to view a list of available commands.\r\n\r\n"]
    );
}

#[test]
fn test_command_match_is_exact() {
    let registry = CommandRegistry::new(COMMANDS);

    assert!(matches!(registry.resolve("HELP"), Err(CliError::UnknownCommand)));
    assert!(matches!(registry.resolve("helpme"), Err(CliError::UnknownCommand)));
    assert!(matches!(registry.resolve("hel"), Err(CliError::UnknownCommand)));
    assert!(matches!(registry.resolve(""), Err(CliError::UnknownCommand)));
}

#[test]
fn test_wrong_parameter_count() {
    let mut registry = CommandRegistry::new(COMMANDS);

    let chunks = run(&mut registry, "echo-3-parameters a b");

    assert_eq!(chunks, vec![CliError::IncorrectParameters.message()]);
    assert!(chunks[0].starts_with("Incorrect command parameter(s)."));
}

#[test]
fn test_help_rejects_parameters() {
    let registry = CommandRegistry::new(COMMANDS);

    assert!(matches!(
        registry.resolve("help me"),
        Err(CliError::IncorrectParameters)
    ));
}

#[test]
fn test_echo_three_parameters() {
    let mut registry = CommandRegistry::new(COMMANDS);

    let chunks = run(&mut registry, "echo-3-parameters a bb ccc");

    assert_eq!(
        chunks,
        vec!["The parameters were:\r\n", "1: a\r\n", "2: bb\r\n", "3: ccc\r\n"]
    );
}

#[test]
fn test_echo_parameters_any_count() {
    let mut registry = CommandRegistry::new(COMMANDS);

    assert_eq!(run(&mut registry, "echo-parameters"), vec!["The parameters were:\r\n"]);
    assert_eq!(
        run(&mut registry, "echo-parameters  x   y "),
        vec!["The parameters were:\r\n", "1: x\r\n", "2: y\r\n"]
    );
}

#[test]
fn test_version_command() {
    let mut registry = CommandRegistry::new(COMMANDS);

    let chunks = run(&mut registry, "version");

    assert_eq!(chunks.len(), 1);
    assert_eq!(
        chunks[0],
        format!("LiPow firmware {} ({})\r\n", FIRMWARE_VERSION, VERSION_STRING)
    );
    assert!(VERSION_STRING.starts_with("LiPow v"));
}

#[test]
fn test_stats_one_counter_per_call() {
    let mut registry = CommandRegistry::new(COMMANDS);

    let chunks = run(&mut registry, "stats");

    assert_eq!(chunks.len(), 6);
    assert!(chunks[0].starts_with("tx completed: "));
    assert!(chunks[5].starts_with("lines repeated: "));
    assert!(chunks.iter().all(|c| c.ends_with("\r\n")));
}

#[test]
fn test_busy_command_keeps_its_line() {
    let mut registry = CommandRegistry::new(COMMANDS);
    let mut out: OutputBuffer = OutputBuffer::new();

    assert!(registry.process("echo-parameters p q", &mut out));
    assert!(registry.is_busy());

    // Mid-output, the next call continues the command in progress.
    out.clear();
    assert!(registry.process("echo-parameters p q", &mut out));
    assert_eq!(out.as_str(), "1: p\r\n");

    out.clear();
    assert!(!registry.process("echo-parameters p q", &mut out));
    assert_eq!(out.as_str(), "2: q\r\n");
    assert!(!registry.is_busy());
}

fn cmd_shout(ctx: &CommandContext<'_>, out: &mut dyn Write) -> bool {
    let word = ctx.parameter(1).unwrap_or("");
    for _ in 0..200 {
        let _ = out.write_str(word);
    }
    false
}

static SHOUT: &[CommandDefinition] = &[CommandDefinition {
    command: "shout",
    help: "shout <word>:\r\n Repeats a word\r\n\r\n",
    handler: cmd_shout,
    expected_parameters: Some(1),
}];

#[test]
fn test_custom_table_output_is_bounded() {
    let mut registry = CommandRegistry::new(SHOUT);

    let chunks = run(&mut registry, "shout abc");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].len(), 512);
    assert!(chunks[0].starts_with("abcabc"));
}

#[test]
fn test_custom_table_help_includes_builtin_help() {
    let mut registry = CommandRegistry::new(SHOUT);

    let chunks = run(&mut registry, "help");

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1], SHOUT[0].help);
}
