//! [SeverityRoutedWriter] impl.
//!
//! Every record is either suppressed, written to the normal stream, or written
//! to the error stream. The choice is made by [Route::decide] from the record's
//! severity and two fixed [Thresholds].

use ::std::{fmt, io};

use ::chrono::{DateTime, Local};

use crate::{Severity, streams::Streams};

/// A single log record as seen by a [RecordFormat].
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// Time the record was created.
    pub timestamp: DateTime<Local>,
    /// Name of the logger emitting the record.
    pub name: &'a str,
    /// Record severity.
    pub severity: Severity,
    /// Rendered message.
    pub message: &'a str,
}

/// Severity limits of a [SeverityRoutedWriter].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Records below this severity are suppressed.
    pub threshold: Severity,
    /// Records at or above this severity go to the error stream.
    pub error_boundary: Severity,
}

impl Thresholds {
    /// Default error boundary, warnings and worse go to the error stream.
    pub const DEFAULT_ERROR_BOUNDARY: Severity = Severity::Warning;

    /// Thresholds with the default error boundary.
    pub const fn new(threshold: Severity) -> Self {
        Self {
            threshold,
            error_boundary: Self::DEFAULT_ERROR_BOUNDARY,
        }
    }

    /// Replace the error boundary.
    pub const fn with_error_boundary(self, error_boundary: Severity) -> Self {
        Self {
            error_boundary,
            ..self
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(Severity::default())
    }
}

/// Where a record ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Record is dropped.
    Suppress,
    /// Record goes to the normal stream.
    Normal,
    /// Record goes to the error stream.
    Error,
}

impl Route {
    /// Decide the route of a record with the given severity.
    pub const fn decide(severity: Severity, thresholds: Thresholds) -> Self {
        if severity.rank() < thresholds.threshold.rank() {
            Self::Suppress
        } else if severity.rank() >= thresholds.error_boundary.rank() {
            Self::Error
        } else {
            Self::Normal
        }
    }
}

/// Renders a record to a single line, without the trailing newline.
pub trait RecordFormat: Send + Sync {
    /// Format `record`.
    fn format(&self, record: &LogRecord<'_>) -> String;
}

impl<F> RecordFormat for F
where
    F: Fn(&LogRecord<'_>) -> String + Send + Sync,
{
    fn format(&self, record: &LogRecord<'_>) -> String {
        self(record)
    }
}

/// `timestamp - name - SEVERITY - message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormat;

impl StandardFormat {
    /// Timestamp layout, milliseconds after a comma.
    pub const TIMESTAMP: &'static str = "%Y-%m-%d %H:%M:%S,%3f";
}

impl RecordFormat for StandardFormat {
    fn format(&self, record: &LogRecord<'_>) -> String {
        let LogRecord {
            timestamp,
            name,
            severity,
            message,
        } = record;
        format!(
            "{timestamp} - {name} - {severity} - {message}",
            timestamp = timestamp.format(Self::TIMESTAMP)
        )
    }
}

/// Log sink writing to one of two streams depending on severity.
pub struct SeverityRoutedWriter {
    /// Severity limits.
    thresholds: Thresholds,
    /// Line formatter.
    format: Box<dyn RecordFormat>,
    /// Output streams.
    streams: Streams,
}

impl fmt::Debug for SeverityRoutedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeverityRoutedWriter")
            .field("thresholds", &self.thresholds)
            .field("streams", &self.streams)
            .finish_non_exhaustive()
    }
}

impl SeverityRoutedWriter {
    /// Create a writer using [StandardFormat].
    pub fn new(thresholds: Thresholds, streams: Streams) -> Self {
        Self::with_format(thresholds, streams, StandardFormat)
    }

    /// Create a writer using a custom format.
    pub fn with_format(
        thresholds: Thresholds,
        streams: Streams,
        format: impl RecordFormat + 'static,
    ) -> Self {
        Self {
            thresholds,
            format: Box::new(format),
            streams,
        }
    }

    /// Configured thresholds.
    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Route a record of the given severity would take.
    pub const fn route(&self, severity: Severity) -> Route {
        Route::decide(severity, self.thresholds)
    }

    /// Write `record` to the stream its severity selects.
    ///
    /// # Errors
    /// If the selected stream cannot be written or flushed.
    pub fn emit(&self, record: &LogRecord<'_>) -> io::Result<()> {
        let stream = match self.route(record.severity) {
            Route::Suppress => return Ok(()),
            Route::Normal => &self.streams.out,
            Route::Error => &self.streams.err,
        };
        stream.write_line(&self.format.format(record))
    }

    /// Flush both streams.
    ///
    /// # Errors
    /// If either stream fails to flush.
    pub fn flush(&self) -> io::Result<()> {
        self.streams.out.flush()?;
        self.streams.err.flush()
    }
}

#[cfg(test)]
mod tests {
    use ::chrono::TimeZone;

    use super::*;

    /// All severities in ascending order.
    const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    fn record(severity: Severity) -> LogRecord<'static> {
        LogRecord {
            timestamp: Local.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap(),
            name: "Tool",
            severity,
            message: "hello",
        }
    }

    #[test]
    fn route_table() {
        let thresholds = Thresholds::new(Severity::Info);
        let routes = ALL.map(|severity| Route::decide(severity, thresholds));
        assert_eq!(
            routes,
            [
                Route::Suppress,
                Route::Normal,
                Route::Error,
                Route::Error,
                Route::Error
            ]
        );

        let thresholds = Thresholds::new(Severity::Debug).with_error_boundary(Severity::Critical);
        assert_eq!(Route::decide(Severity::Debug, thresholds), Route::Normal);
        assert_eq!(Route::decide(Severity::Error, thresholds), Route::Normal);
        assert_eq!(Route::decide(Severity::Critical, thresholds), Route::Error);
    }

    #[test]
    fn threshold_above_boundary_only_reaches_error_stream() {
        let thresholds = Thresholds::new(Severity::Error);
        for severity in ALL {
            let route = Route::decide(severity, thresholds);
            if severity < Severity::Error {
                assert_eq!(route, Route::Suppress, "{severity}");
            } else {
                assert_eq!(route, Route::Error, "{severity}");
            }
        }
    }

    #[test]
    fn standard_format() {
        let line = StandardFormat.format(&record(Severity::Warning));
        assert_eq!(line, "2024-05-17 09:30:00,000 - Tool - WARNING - hello");
    }

    #[test]
    fn emit_routes_records() {
        let (streams, out, err) = Streams::memory();
        let writer = SeverityRoutedWriter::with_format(
            Thresholds::new(Severity::Info),
            streams,
            |record: &LogRecord<'_>| format!("{} {}", record.severity, record.message),
        );

        for severity in ALL {
            writer.emit(&record(severity)).unwrap();
        }

        assert_eq!(out.lines(), ["INFO hello"]);
        assert_eq!(
            err.lines(),
            ["WARNING hello", "ERROR hello", "CRITICAL hello"]
        );
    }

    #[test]
    fn suppressed_records_write_nothing() {
        let (streams, out, err) = Streams::memory();
        let writer = SeverityRoutedWriter::new(Thresholds::new(Severity::Critical), streams);

        for severity in &ALL[..4] {
            writer.emit(&record(*severity)).unwrap();
        }

        assert_eq!(out.contents(), "");
        assert_eq!(err.contents(), "");
    }
}
