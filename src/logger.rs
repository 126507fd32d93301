//! [Logger] impl.

use ::std::{fmt, io, sync::Arc};

use ::chrono::Local;

use crate::{
    Severity,
    writer::{LogRecord, Route, SeverityRoutedWriter},
};

/// Named logger owned by a command.
///
/// Cloning is cheap, clones share the same writer.
#[derive(Debug, Clone)]
pub struct Logger {
    /// Shared state.
    inner: Arc<Inner>,
}

/// Shared [Logger] state.
#[derive(Debug)]
struct Inner {
    /// Logger name, part of every formatted line.
    name: String,
    /// Logger level, checked before the writer's own threshold.
    level: Severity,
    /// Attached sink.
    writer: SeverityRoutedWriter,
}

impl Logger {
    /// Create a logger that passes every record on to `writer`.
    pub fn new(name: impl Into<String>, writer: SeverityRoutedWriter) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                level: Severity::MOST_PERMISSIVE,
                writer,
            }),
        }
    }

    /// Logger name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Attached writer.
    pub fn writer(&self) -> &SeverityRoutedWriter {
        &self.inner.writer
    }

    /// Whether a record of `severity` would be written anywhere.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.inner.level && self.inner.writer.route(severity) != Route::Suppress
    }

    /// Log a message.
    ///
    /// # Errors
    /// If the selected output stream cannot be written.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) -> io::Result<()> {
        if !self.enabled(severity) {
            return Ok(());
        }
        let owned;
        let message = match args.as_str() {
            Some(message) => message,
            None => {
                owned = args.to_string();
                &owned
            }
        };
        self.inner.writer.emit(&LogRecord {
            timestamp: Local::now(),
            name: &self.inner.name,
            severity,
            message,
        })
    }

    /// Log at [Severity::Debug].
    ///
    /// # Errors
    /// See [Logger::log].
    pub fn debug(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.log(Severity::Debug, args)
    }

    /// Log at [Severity::Info].
    ///
    /// # Errors
    /// See [Logger::log].
    pub fn info(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.log(Severity::Info, args)
    }

    /// Log at [Severity::Warning].
    ///
    /// # Errors
    /// See [Logger::log].
    pub fn warning(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.log(Severity::Warning, args)
    }

    /// Log at [Severity::Error].
    ///
    /// # Errors
    /// See [Logger::log].
    pub fn error(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.log(Severity::Error, args)
    }

    /// Log at [Severity::Critical].
    ///
    /// # Errors
    /// See [Logger::log].
    pub fn critical(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.log(Severity::Critical, args)
    }

    /// Install a clone of this logger as the global [::log] backend.
    ///
    /// # Errors
    /// If a global logger has already been set.
    pub fn install(&self) -> Result<(), ::log::SetLoggerError> {
        ::log::set_boxed_logger(Box::new(self.clone()))?;
        ::log::set_max_level(::log::LevelFilter::Trace);
        Ok(())
    }
}

impl ::log::Log for Logger {
    fn enabled(&self, metadata: &::log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    /// # Panics
    /// If the output stream cannot be written, the same way `println!` does.
    fn log(&self, record: &::log::Record) {
        if let Err(err) = Logger::log(self, record.level().into(), *record.args()) {
            panic!("failed writing log record: {err}");
        }
    }

    fn flush(&self) {
        // Nothing is buffered across records.
        _ = self.inner.writer.flush();
    }
}
