#![doc = include_str!("../README.md")]

use ::std::{
    ffi::OsString,
    process::{self, ExitStatus},
};

use ::clap::{Arg, ValueHint};
use ::color_eyre::{Report, eyre::WrapErr};
use ::command_base::{Command, CommandBase, CommandError, RunError, RunResult, RunnerError};

/// Status used when the executable cannot be started.
const NOT_RUNNABLE: i32 = 127;

/// Status used when no executable is given.
const USAGE: i32 = 2;

/// Run an executable, forwarding every argument not recognized here to it.
#[derive(Debug)]
struct CommandRunner {
    /// Configured base.
    base: CommandBase,
    /// Executable.
    exe: OsString,
    /// Arguments for the executable.
    args: Vec<OsString>,
}

impl Command for CommandRunner {
    fn about() -> Option<&'static str> {
        Some(
            "
Run an executable, forwarding every argument not recognized here to it.

The executable is taken from --exe, or else from the first forwarded argument.
",
        )
    }

    fn fill_parser(parser: ::clap::Command) -> ::clap::Command {
        parser.version(env!("CARGO_PKG_VERSION")).arg(
            Arg::new("exe")
                .short('e')
                .long("exe")
                .value_name("EXE")
                .value_hint(ValueHint::CommandName)
                .help("Executable to run"),
        )
    }

    fn from_base(base: CommandBase) -> Result<Self, Report> {
        base.install_global_logger()
            .wrap_err("could not install logger")?;

        let mut args = base.arguments().remaining().to_vec();
        let exe = match base.arguments().get_one::<String>("exe") {
            Some(exe) => OsString::from(exe),
            None if args.is_empty() => OsString::new(),
            None => args.remove(0),
        };

        Ok(Self { base, exe, args })
    }

    fn base(&self) -> &CommandBase {
        &self.base
    }

    fn run(&mut self) -> RunResult {
        if self.exe.is_empty() {
            return Err(CommandError::with_message("no executable given")
                .status(USAGE)
                .into());
        }

        ::log::info!("running {}", self.command_line());
        let status = process::Command::new(&self.exe)
            .args(&self.args)
            .status()
            .map_err(|err| {
                CommandError::with_message(format!(
                    "could not run {exe}: {err}",
                    exe = self.exe.to_string_lossy()
                ))
                .status(NOT_RUNNABLE)
            })?;
        ::log::debug!("process finished with {status}");

        self.map_status(status)
    }

    fn quit(&mut self) -> Result<(), Report> {
        ::log::debug!("done");
        Ok(())
    }

    fn on_exiting_with_error(&mut self, _error: Option<&CommandError>, status: i32) {
        ::log::debug!("exiting with status {status}");
    }
}

impl CommandRunner {
    /// Quoted command line, for display.
    fn command_line(&self) -> String {
        let words = ::std::iter::once(&self.exe)
            .chain(&self.args)
            .map(|word| word.to_string_lossy())
            .collect::<Vec<_>>();
        ::shell_words::join(words)
    }

    /// Map the child's exit status to the outcome of this run.
    fn map_status(&self, status: ExitStatus) -> RunResult {
        if self.base.interrupt().is_set() {
            return Err(RunError::Interrupted);
        }
        if status.success() {
            return Ok(None);
        }
        if let Some(code) = status.code() {
            return Err(CommandError::new().status(code).into());
        }

        #[cfg(unix)]
        if let Some(signal) = ::std::os::unix::process::ExitStatusExt::signal(&status) {
            return Err(CommandError::with_message(format!("terminated by signal {signal}"))
                .status(128 + signal)
                .into());
        }

        Err(CommandError::with_message(format!("process ended with {status}")).into())
    }
}

fn main() -> ::color_eyre::Result<()> {
    ::color_eyre::install()?;

    let never = ::command_base::run_command::<CommandRunner>().map_err(RunnerError::into_report)?;
    match never {}
}
