//! Errors raised by commands and by the runner.

use ::std::io;

use ::color_eyre::Report;

/// Expected failure raised by a command, carrying the process exit status.
#[derive(Debug, Clone, PartialEq, Eq, ::thiserror::Error)]
#[error("{}", .message.as_deref().unwrap_or("command failed"))]
pub struct CommandError {
    /// Message written to the error stream, if any.
    message: Option<String>,
    /// Exit status of the process.
    status: i32,
}

impl CommandError {
    /// Status used when none is given.
    pub const DEFAULT_STATUS: i32 = 1;

    /// Silent failure with the default status.
    pub const fn new() -> Self {
        Self {
            message: None,
            status: Self::DEFAULT_STATUS,
        }
    }

    /// Failure with a message and the default status.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new()
        }
    }

    /// Replace the exit status.
    pub fn status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Exit status.
    pub const fn exit_status(&self) -> i32 {
        self.status
    }
}

impl Default for CommandError {
    fn default() -> Self {
        Self::new()
    }
}

/// Ways a command's run step can fail.
#[derive(Debug, ::thiserror::Error)]
pub enum RunError {
    /// Expected failure, mapped to an exit status.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The user interrupted the command.
    #[error("interrupted")]
    Interrupted,

    /// Anything else, never mapped to an exit status.
    #[error("{0}")]
    Unexpected(Report),
}

impl From<Report> for RunError {
    fn from(value: Report) -> Self {
        Self::Unexpected(value)
    }
}

impl From<io::Error> for RunError {
    fn from(value: io::Error) -> Self {
        Self::Unexpected(Report::new(value))
    }
}

/// Faults raised while a command is constructed.
#[derive(Debug, ::thiserror::Error)]
pub enum StartupError {
    /// Command line could not be parsed, also raised for help and version requests.
    #[error(transparent)]
    Arguments(#[from] ::clap::Error),

    /// Interrupt handler could not be installed.
    #[error("could not install interrupt handler\n{0}")]
    Interrupt(#[source] io::Error),

    /// Tool specific construction failed.
    #[error("could not set up command\n{0}")]
    Tool(Report),
}

/// Failures that escape the runner instead of becoming an exit status.
#[derive(Debug, ::thiserror::Error)]
pub enum RunnerError {
    /// Command could not be constructed.
    #[error(transparent)]
    Startup(#[from] StartupError),

    /// Command failed in a way that is not a [CommandError].
    #[error("{0}")]
    Unexpected(Report),
}

impl RunnerError {
    /// Convert into a report, keeping an unexpected failure's own report intact.
    pub fn into_report(self) -> Report {
        match self {
            Self::Unexpected(report) | Self::Startup(StartupError::Tool(report)) => report,
            Self::Startup(err) => Report::new(err),
        }
    }
}
