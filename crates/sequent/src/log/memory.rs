use core::{convert::Infallible, fmt, future::Future};

use parking_lot::Mutex;

use crate::ErrorLog;

/// One entry captured by a [`MemoryLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// The queue's component label, when it has one.
    pub component: Option<String>,
    /// The operation that produced the entry (`"consume"` for item
    /// failures).
    pub process: String,
    /// Free-form context supplied by the writer.
    pub context: String,
    /// The rendered failure.
    pub message: String,
}

/// An error log that keeps every record in memory.
///
/// Intended for tests and diagnostics: share one instance with the queue
/// through an `Arc`, then inspect [`records`] after the interesting calls.
///
/// ```
/// use std::sync::Arc;
/// use sequent::MemoryLog;
///
/// let log = Arc::new(MemoryLog::new());
/// // hand `Arc::clone(&log)` to a queue builder, then later:
/// assert!(log.is_empty());
/// ```
///
/// [`records`]: MemoryLog::records
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record written so far, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl ErrorLog for MemoryLog {
    type Error = Infallible;

    fn write_error(
        &self,
        component: Option<&str>,
        process: &str,
        context: &str,
        error: &(dyn fmt::Display + Sync),
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.records.lock().push(LogRecord {
            component: component.map(str::to_owned),
            process: process.to_owned(),
            context: context.to_owned(),
            message: error.to_string(),
        });
        async { Ok(()) }
    }
}
