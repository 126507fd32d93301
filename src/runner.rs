//! Entry point turning a [Command] into a process exit status.

use ::std::{
    convert::Infallible,
    ffi::OsString,
    panic::{self, AssertUnwindSafe},
};

use ::color_eyre::Report;

use crate::{
    command::{Command, CommandBase, Environment},
    error::{CommandError, RunError, RunnerError, StartupError},
};

/// How a run step ended, before cleanup.
enum Outcome {
    /// Exit status and the error that produced it, if any.
    Status(i32, Option<CommandError>),
    /// Failure that is not turned into a status.
    Unexpected(Report),
}

/// Construct `C`, run it and clean up, returning the exit status.
///
/// [Command::quit] is called exactly once after [Command::run], also when run
/// fails or panics. A panic is resumed after cleanup. If the interrupt flag is
/// set once run returns, the status is 0 and nothing is reported.
///
/// # Errors
/// [RunnerError::Startup] if the command cannot be constructed, in which case
/// nothing is run. [RunnerError::Unexpected] if run fails with anything but a
/// [CommandError] or an interrupt.
pub fn execute<C, I, T>(argv: I, environment: Environment) -> Result<i32, RunnerError>
where
    C: Command,
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let base = CommandBase::new::<C, I, T>(argv, environment)?;
    let mut command = C::from_base(base).map_err(StartupError::Tool)?;

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| command.run())) {
        // An interrupt decides the outcome whatever run returned.
        Ok(_) if command.base().interrupt().is_set() => Outcome::Status(0, None),
        Ok(result) => classify(&command, result),
        Err(payload) => {
            quit(&mut command);
            panic::resume_unwind(payload);
        }
    };

    quit(&mut command);

    match outcome {
        Outcome::Unexpected(report) => Err(RunnerError::Unexpected(report)),
        Outcome::Status(status, error) => {
            if status != 0 {
                command.on_exiting_with_error(error.as_ref(), status);
            }
            Ok(status)
        }
    }
}

/// Run `C` against the process arguments and streams, then exit.
///
/// Only returns on startup faults that are not argument errors. Argument
/// errors, including help and version requests, exit through clap.
///
/// # Errors
/// If the interrupt handler cannot be installed, if the command's own setup
/// fails, or if run fails with an unexpected error.
pub fn run_command<C>() -> Result<Infallible, RunnerError>
where
    C: Command,
{
    let environment = Environment::process()?;
    match execute::<C, _, _>(::std::env::args_os(), environment) {
        Ok(status) => ::std::process::exit(status),
        Err(RunnerError::Startup(StartupError::Arguments(err))) => err.exit(),
        Err(err) => Err(err),
    }
}

/// Map the result of a run step to an outcome.
fn classify<C: Command>(command: &C, result: Result<Option<i32>, RunError>) -> Outcome {
    match result {
        Ok(status) => Outcome::Status(status.unwrap_or(0), None),
        Err(RunError::Interrupted) => Outcome::Status(0, None),
        Err(RunError::Command(err)) => {
            if let Some(message) = err.message().filter(|message| !message.is_empty()) {
                if let Err(io_err) = command.base().streams().err.write_line(message) {
                    return Outcome::Unexpected(Report::new(io_err));
                }
            }
            Outcome::Status(err.exit_status(), Some(err))
        }
        Err(RunError::Unexpected(report)) => Outcome::Unexpected(report),
    }
}

/// Call [Command::quit], logging a failure instead of propagating it.
fn quit<C: Command>(command: &mut C) {
    if let Err(report) = command.quit() {
        // The exit status is already decided, a logging failure changes nothing.
        _ = command
            .base()
            .logger()
            .error(format_args!("cleanup failed: {report:#}"));
    }
}
