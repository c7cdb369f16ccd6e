use core::{any::Any, fmt, ops::ControlFlow};
use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;

use crate::{
    Consumer, ErrorLog, MetricsSink,
    queue::{envelope::Envelope, shared::Shared},
};

/// Why one consume call failed. Rendered into the error log.
pub(crate) enum ConsumeFailure<E> {
    /// The consumer returned an error.
    Error(E),
    /// The consumer panicked; the payload is rendered best-effort.
    Panic(String),
}

impl<E> fmt::Display for ConsumeFailure<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(e) => write!(f, "{e}"),
            Self::Panic(msg) => write!(f, "consumer panicked: {msg}"),
        }
    }
}

/// Worker task that drains the queue one item at a time.
///
/// Spawned at most once per queue, on the first `start` (explicit or
/// implicit). The worker owns the consumer outright, which is what makes
/// "never concurrently with itself" hold: there is exactly one task that can
/// call [`Consumer::consume`], and it awaits each call before dequeuing the
/// next item.
///
/// The loop ends only when it dequeues the end-of-stream marker. Item
/// failures are reported to the logging collaborator and skipped; a panic
/// anywhere in an iteration is swallowed and the next iteration begins.
pub(crate) async fn worker_loop<T, C, L, M>(shared: Arc<Shared<T, L, M>>, mut consumer: C)
where
    T: Send + 'static,
    C: Consumer<T>,
    L: ErrorLog,
    M: MetricsSink,
{
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker started");

    loop {
        // The outer guard keeps the loop alive through anything but the
        // marker, including panics that escape an iteration's own handling.
        match AssertUnwindSafe(run_iteration(&shared, &mut consumer))
            .catch_unwind()
            .await
        {
            Ok(ControlFlow::Continue(())) => {}
            Ok(ControlFlow::Break(())) => break,
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Worker iteration panicked; continuing with the next item");
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker stopped");
}

/// Dequeues and processes a single envelope.
///
/// Returns `Break` only for the end-of-stream marker.
async fn run_iteration<T, C, L, M>(shared: &Shared<T, L, M>, consumer: &mut C) -> ControlFlow<()>
where
    T: Send + 'static,
    C: Consumer<T>,
    L: ErrorLog,
    M: MetricsSink,
{
    let item = match shared.dequeue().await {
        Envelope::Item(item) => item,
        Envelope::EndOfStream => return ControlFlow::Break(()),
    };

    match AssertUnwindSafe(consumer.consume(item)).catch_unwind().await {
        Ok(Ok(())) => shared.record_current_depth(),
        Ok(Err(error)) => {
            shared.report_failure(&ConsumeFailure::Error(error)).await;
        }
        Err(panic) => {
            let failure = ConsumeFailure::<C::Error>::Panic(panic_message(panic));
            shared.report_failure(&failure).await;
        }
    }

    ControlFlow::Continue(())
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(message) => *message,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(_) => "opaque panic payload".to_owned(),
        },
    }
}
