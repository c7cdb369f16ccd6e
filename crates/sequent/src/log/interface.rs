use core::{fmt, future::Future};
use std::sync::Arc;

/// The error-logging capability of a [`WorkQueue`].
///
/// The queue's worker reports each failed item here exactly once, carrying
/// the queue's component label, the fixed process name `"consume"`, a
/// context string, and the failure itself (the consumer's error, or a
/// rendered panic message).
///
/// The worker treats this sink as best-effort: a returned error or a panic
/// from [`write_error`] is swallowed so that logging can never take the
/// worker down with it.
///
/// [`WorkQueue`]: crate::WorkQueue
/// [`write_error`]: ErrorLog::write_error
pub trait ErrorLog: Send + Sync + 'static {
    /// The sink's own failure type. The queue discards it.
    type Error: fmt::Display;

    /// Records one error-level entry.
    ///
    /// # Errors
    ///
    /// May fail if the underlying sink does; callers inside the queue ignore
    /// the result.
    fn write_error(
        &self,
        component: Option<&str>,
        process: &str,
        context: &str,
        error: &(dyn fmt::Display + Sync),
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<L> ErrorLog for Arc<L>
where
    L: ErrorLog,
{
    type Error = L::Error;

    fn write_error(
        &self,
        component: Option<&str>,
        process: &str,
        context: &str,
        error: &(dyn fmt::Display + Sync),
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).write_error(component, process, context, error)
    }
}
