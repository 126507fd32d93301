//! [Command] trait and the [CommandBase] every command is built on.

use ::color_eyre::Report;

use crate::{
    arguments::{self, ParsedArguments},
    error::{CommandError, RunError, StartupError},
    interrupt::Interrupt,
    logger::Logger,
    streams::Streams,
    writer::{SeverityRoutedWriter, Thresholds},
};

/// Result of a command's run step, `None` and `Some(0)` both mean success.
pub type RunResult = Result<Option<i32>, RunError>;

/// Process level inputs a command is constructed with.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Output streams.
    pub streams: Streams,
    /// Interrupt flag.
    pub interrupt: Interrupt,
}

impl Environment {
    /// Standard streams and the process interrupt handler.
    ///
    /// # Errors
    /// If the interrupt handler cannot be installed.
    pub fn process() -> Result<Self, StartupError> {
        Ok(Self {
            streams: Streams::stdio(),
            interrupt: Interrupt::install().map_err(StartupError::Interrupt)?,
        })
    }

    /// Environment not connected to the process, for embedding and tests.
    pub fn detached(streams: Streams) -> Self {
        Self {
            streams,
            interrupt: Interrupt::manual(),
        }
    }
}

/// State shared by every command: parser, parsed arguments and logger.
#[derive(Debug)]
pub struct CommandBase {
    /// Argument parser, with every option registered.
    parser: ::clap::Command,
    /// Parse result.
    arguments: ParsedArguments,
    /// Logger named after the command.
    logger: Logger,
    /// Output streams.
    streams: Streams,
    /// Interrupt flag.
    interrupt: Interrupt,
}

impl CommandBase {
    /// Build the parser for `C`, parse `argv` and configure logging.
    ///
    /// # Errors
    /// If `argv` cannot be parsed, including an unknown log level, or if help
    /// or version output is requested.
    pub fn new<C, I, T>(argv: I, environment: Environment) -> Result<Self, StartupError>
    where
        C: Command,
        I: IntoIterator<Item = T>,
        T: Into<::std::ffi::OsString>,
    {
        let Environment { streams, interrupt } = environment;
        let name = C::name();

        let mut parser = C::fill_parser(arguments::base_parser(name.clone(), C::about()));
        let arguments = ParsedArguments::parse(&mut parser, argv)?;

        let thresholds =
            Thresholds::new(arguments.log_level()).with_error_boundary(C::error_boundary());
        let logger = Logger::new(name, SeverityRoutedWriter::new(thresholds, streams.clone()));

        Ok(Self {
            parser,
            arguments,
            logger,
            streams,
            interrupt,
        })
    }

    /// Argument parser.
    pub const fn parser(&self) -> &::clap::Command {
        &self.parser
    }

    /// Parsed arguments.
    pub const fn arguments(&self) -> &ParsedArguments {
        &self.arguments
    }

    /// Alias of [CommandBase::arguments].
    pub const fn args(&self) -> &ParsedArguments {
        &self.arguments
    }

    /// Logger named after the command.
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Output streams.
    pub const fn streams(&self) -> &Streams {
        &self.streams
    }

    /// Interrupt flag.
    pub const fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    /// Make the command's logger the global [::log] backend.
    ///
    /// # Errors
    /// If a global logger has already been set.
    pub fn install_global_logger(&self) -> Result<(), ::log::SetLoggerError> {
        self.logger.install()
    }
}

/// A command line tool run by [run_command](crate::run_command).
///
/// Only [Command::from_base], [Command::base] and [Command::run] are required.
pub trait Command: Sized {
    /// Tool identity, used as parser and logger name.
    ///
    /// Defaults to the type name without its module path.
    fn name() -> String {
        let full = ::std::any::type_name::<Self>();
        let path = full.split('<').next().unwrap_or(full);
        path.rsplit("::").next().unwrap_or(path).to_owned()
    }

    /// Description shown in help output.
    fn about() -> Option<&'static str> {
        None
    }

    /// Severity at and above which log lines go to the error stream.
    fn error_boundary() -> crate::Severity {
        Thresholds::DEFAULT_ERROR_BOUNDARY
    }

    /// Register further options before arguments are parsed.
    fn fill_parser(parser: ::clap::Command) -> ::clap::Command {
        parser
    }

    /// Finish construction from a configured base.
    ///
    /// # Errors
    /// On tool specific setup failures.
    fn from_base(base: CommandBase) -> Result<Self, Report>;

    /// Configured base.
    fn base(&self) -> &CommandBase;

    /// Tool behavior.
    ///
    /// # Errors
    /// [RunError::Command] for expected failures, [RunError::Interrupted] when
    /// the user cancelled, anything else as [RunError::Unexpected].
    fn run(&mut self) -> RunResult;

    /// Release resources, called once after [Command::run] however it ended.
    ///
    /// # Errors
    /// On cleanup failures, these are logged and do not change the exit status.
    fn quit(&mut self) -> Result<(), Report> {
        Ok(())
    }

    /// Last chance diagnostics, called after [Command::quit] when exiting
    /// with a non-zero status.
    fn on_exiting_with_error(&mut self, _error: Option<&CommandError>, _status: i32) {}
}
