use core::{convert::Infallible, fmt, future::Future};

use crate::ErrorLog;

/// An error log that forwards each record to [`tracing::error!`].
///
/// Bridges the queue's logging collaborator onto a `tracing` subscriber so
/// that item failures show up alongside the rest of a service's telemetry.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl ErrorLog for TracingLog {
    type Error = Infallible;

    fn write_error(
        &self,
        component: Option<&str>,
        process: &str,
        context: &str,
        error: &(dyn fmt::Display + Sync),
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        tracing::error!(
            component = component.unwrap_or_default(),
            process,
            context,
            error = %error,
            "work item failed"
        );
        async { Ok(()) }
    }
}
