//! Interpreter error types

/// Why a line produced an error message instead of running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliError {
    /// E01: No registered command matches the line
    UnknownCommand,
    /// E02: Command found, wrong number of parameters
    IncorrectParameters,
}

impl CliError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::IncorrectParameters => "E02",
        }
    }

    /// Text sent to the operator.
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => {
                "Command not recognised.  Enter 'help' to view a list of available commands.\r\n\r\n"
            }
            Self::IncorrectParameters => {
                "Incorrect command parameter(s).  Enter \"help\" to view a list of available commands.\r\n\r\n"
            }
        }
    }
}

impl core::fmt::Display for CliError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
