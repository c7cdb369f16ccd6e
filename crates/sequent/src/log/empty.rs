use core::{convert::Infallible, fmt, future::Future};

use crate::ErrorLog;

/// An error log that ignores everything written to it.
///
/// This is the default logging collaborator of a queue built without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLog;

impl ErrorLog for NoopLog {
    type Error = Infallible;

    fn write_error(
        &self,
        _component: Option<&str>,
        _process: &str,
        _context: &str,
        _error: &(dyn fmt::Display + Sync),
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async { Ok(()) }
    }
}
