//! [Interrupt] impl.
//!
//! A user interrupt (Ctrl-C) is turned into a flag a command can observe,
//! instead of killing the process before cleanup has run.

use ::std::{
    io, process,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// Set by the process level interrupt handler.
static PROCESS_INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Exit status of a second interrupt, 128 + SIGINT.
const INTERRUPTED_TWICE: i32 = 130;

/// Shared interrupt flag.
#[derive(Debug, Clone)]
pub struct Interrupt {
    /// Where the flag lives.
    source: Source,
}

/// Backing storage of an [Interrupt].
#[derive(Debug, Clone)]
enum Source {
    /// The process wide flag set by the interrupt handler.
    Process,
    /// A flag only set through [Interrupt::trigger].
    Manual(Arc<AtomicBool>),
}

impl Interrupt {
    /// Install the process interrupt handler and return its flag.
    ///
    /// The first interrupt only sets the flag, a second one exits the process
    /// with status 130. Installing more than once returns the same flag.
    ///
    /// # Errors
    /// If the handler cannot be installed.
    pub fn install() -> io::Result<Self> {
        let installed = ::ctrlc::set_handler(|| {
            if PROCESS_INTERRUPTED.swap(true, Ordering::SeqCst) {
                process::exit(INTERRUPTED_TWICE);
            }
        });
        match installed {
            Ok(()) | Err(::ctrlc::Error::MultipleHandlers) => Ok(Self {
                source: Source::Process,
            }),
            Err(err) => Err(io::Error::other(err)),
        }
    }

    /// Flag not connected to any signal.
    pub fn manual() -> Self {
        Self {
            source: Source::Manual(Arc::default()),
        }
    }

    /// Whether an interrupt has been received.
    pub fn is_set(&self) -> bool {
        self.flag().load(Ordering::SeqCst)
    }

    /// Mark the flag as interrupted.
    pub fn trigger(&self) {
        self.flag().store(true, Ordering::SeqCst);
    }

    /// Backing flag.
    fn flag(&self) -> &AtomicBool {
        match &self.source {
            Source::Process => &PROCESS_INTERRUPTED,
            Source::Manual(flag) => &**flag,
        }
    }
}
