//! Output streams shared between the logger and the runner.

use ::std::{
    fmt,
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

/// A line oriented, flushed-per-write output stream that can be shared.
#[derive(Clone)]
pub struct SharedWriter {
    /// Wrapped writer.
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

impl SharedWriter {
    /// Wrap a writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Write `line` followed by a newline, then flush.
    ///
    /// # Errors
    /// If writing or flushing the underlying writer fails.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")?;
        writer.flush()
    }

    /// Flush the underlying writer.
    ///
    /// # Errors
    /// If the underlying writer fails to flush.
    pub fn flush(&self) -> io::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

/// The normal and the error output stream of a tool.
#[derive(Debug, Clone)]
pub struct Streams {
    /// Normal output, standard output for a process.
    pub out: SharedWriter,
    /// Error output, standard error for a process.
    pub err: SharedWriter,
}

impl Streams {
    /// Standard output and standard error.
    pub fn stdio() -> Self {
        Self {
            out: SharedWriter::new(io::stdout()),
            err: SharedWriter::new(io::stderr()),
        }
    }

    /// In-memory streams, returned together with handles to read them back.
    pub fn memory() -> (Self, MemoryStream, MemoryStream) {
        let out = MemoryStream::default();
        let err = MemoryStream::default();
        let streams = Self {
            out: SharedWriter::new(out.clone()),
            err: SharedWriter::new(err.clone()),
        };
        (streams, out, err)
    }
}

/// Growable in-memory stream, clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    /// Bytes written so far.
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryStream {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
