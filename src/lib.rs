#![doc = include_str!("../README.md")]

pub mod arguments;
pub mod command;
pub mod error;
pub mod interrupt;
pub mod logger;
pub mod runner;
pub mod severity;
pub mod streams;
pub mod writer;

pub use self::{
    arguments::ParsedArguments,
    command::{Command, CommandBase, Environment, RunResult},
    error::{CommandError, RunError, RunnerError, StartupError},
    interrupt::Interrupt,
    logger::Logger,
    runner::{execute, run_command},
    severity::Severity,
    streams::{MemoryStream, SharedWriter, Streams},
    writer::{LogRecord, RecordFormat, Route, SeverityRoutedWriter, StandardFormat, Thresholds},
};
