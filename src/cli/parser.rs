//! Command line splitting
//!
//! Words are separated by single or repeated spaces. Only `' '` separates;
//! tabs never reach the interpreter because the line editor drops them.

/// A line split into its command word and the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// The command name (first word)
    pub command: &'a str,
    /// Everything after the command word, separators included
    pub rest: &'a str,
}

impl<'a> ParsedLine<'a> {
    /// Parameters, in order.
    pub fn parameters(&self) -> impl Iterator<Item = &'a str> {
        self.rest.split(' ').filter(|w| !w.is_empty())
    }

    /// Get parameter by position (1-based)
    pub fn parameter(&self, n: usize) -> Option<&'a str> {
        n.checked_sub(1).and_then(|i| self.parameters().nth(i))
    }

    /// Number of parameters; trailing spaces do not count.
    pub fn parameter_count(&self) -> usize {
        self.parameters().count()
    }
}

/// Split a command line. The command must start at the first byte.
pub fn parse_line(line: &str) -> ParsedLine<'_> {
    match line.find(' ') {
        Some(i) => ParsedLine {
            command: &line[..i],
            rest: &line[i..],
        },
        None => ParsedLine { command: line, rest: "" },
    }
}

/// The `n`-th (1-based) parameter of `line`.
pub fn parameter(line: &str, n: usize) -> Option<&str> {
    parse_line(line).parameter(n)
}
