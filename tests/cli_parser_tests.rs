//! Command line splitting tests

use lipow_console::cli::{parameter, parse_line};

#[test]
fn test_parse_command_only() {
    let parsed = parse_line("help");
    assert_eq!(parsed.command, "help");
    assert_eq!(parsed.parameter_count(), 0);
    assert_eq!(parsed.parameter(1), None);
}

#[test]
fn test_parse_with_parameters() {
    let parsed = parse_line("echo-3-parameters a bb ccc");
    assert_eq!(parsed.command, "echo-3-parameters");
    assert_eq!(parsed.parameter_count(), 3);
    assert_eq!(parsed.parameter(1), Some("a"));
    assert_eq!(parsed.parameter(2), Some("bb"));
    assert_eq!(parsed.parameter(3), Some("ccc"));
    assert_eq!(parsed.parameter(4), None);
}

#[test]
fn test_parameter_zero_is_none() {
    assert_eq!(parameter("echo-parameters x", 0), None);
}

#[test]
fn test_repeated_spaces_collapse() {
    let parsed = parse_line("echo-parameters   x  y   ");
    assert_eq!(parsed.parameter_count(), 2);
    assert_eq!(parsed.parameter(1), Some("x"));
    assert_eq!(parsed.parameter(2), Some("y"));
}

#[test]
fn test_trailing_space_is_not_a_parameter() {
    assert_eq!(parse_line("version ").parameter_count(), 0);
}

#[test]
fn test_leading_space_gives_empty_command() {
    let parsed = parse_line(" help");
    assert_eq!(parsed.command, "");
    assert_eq!(parsed.parameter(1), Some("help"));
}

#[test]
fn test_empty_line() {
    let parsed = parse_line("");
    assert_eq!(parsed.command, "");
    assert_eq!(parsed.parameter_count(), 0);
}
