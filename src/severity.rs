//! [Severity] impl.

use ::std::fmt::{self, Display};

use ::clap::ValueEnum;

/// Ordinal log level, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, ValueEnum)]
pub enum Severity {
    /// Diagnostic detail.
    Debug = 10,
    /// Normal progress messages.
    #[default]
    Info = 20,
    /// Something unexpected that does not stop the tool.
    #[value(alias = "warn")]
    Warning = 30,
    /// An operation failed.
    Error = 40,
    /// The tool cannot continue.
    Critical = 50,
}

impl Severity {
    /// Most permissive severity, every record passes it.
    pub const MOST_PERMISSIVE: Self = Self::Debug;

    /// Upper case name used in formatted log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Numeric rank, used for ordering in const contexts.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Look up a severity by name, ignoring case.
    ///
    /// # Errors
    /// If `name` is not a known severity or alias.
    pub fn from_name(name: &str) -> Result<Self, UnknownSeverity> {
        <Self as ValueEnum>::from_str(name, true).map_err(|_| UnknownSeverity(name.to_owned()))
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<::log::Level> for Severity {
    fn from(value: ::log::Level) -> Self {
        match value {
            ::log::Level::Error => Self::Error,
            ::log::Level::Warn => Self::Warning,
            ::log::Level::Info => Self::Info,
            ::log::Level::Debug | ::log::Level::Trace => Self::Debug,
        }
    }
}

/// Error raised when a severity name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, ::thiserror::Error)]
#[error("unknown log level '{0}'")]
pub struct UnknownSeverity(pub String);
