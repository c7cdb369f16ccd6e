use core::fmt;
use std::{
    collections::VecDeque,
    panic::{AssertUnwindSafe, catch_unwind},
};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{ErrorLog, MetricsSink, queue::envelope::Envelope};

/// State shared between the queue handle and its worker task.
///
/// The pending queue is the only hand-off point. Its mutex guards nothing
/// but the `VecDeque` itself and is never held across an await or across a
/// collaborator call.
pub(crate) struct Shared<T, L, M> {
    pending: Mutex<VecDeque<Envelope<T>>>,
    ready: Notify,
    component: Option<String>,
    metric_name: String,
    log: Option<L>,
    metrics: Option<M>,
}

impl<T, L, M> Shared<T, L, M> {
    pub(crate) fn new(
        component: Option<String>,
        metric_name: String,
        log: Option<L>,
        metrics: Option<M>,
    ) -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            ready: Notify::new(),
            component,
            metric_name,
            log,
            metrics,
        }
    }

    pub(crate) fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    /// Appends the drain marker and wakes the worker.
    ///
    /// Every item enqueued before this call sits ahead of the marker, so the
    /// worker consumes all of them before it exits.
    pub(crate) fn enqueue_end_of_stream(&self) {
        self.pending.lock().push_back(Envelope::EndOfStream);
        self.ready.notify_one();
    }

    /// Removes and returns the next envelope, waiting while the queue is
    /// empty.
    pub(crate) async fn dequeue(&self) -> Envelope<T> {
        loop {
            if let Some(envelope) = self.pending.lock().pop_front() {
                return envelope;
            }
            // `notify_one` stores a permit when no waiter is registered, so
            // a push landing between the check above and this await still
            // wakes the worker.
            self.ready.notified().await;
        }
    }
}

impl<T, L, M> Shared<T, L, M>
where
    L: ErrorLog,
    M: MetricsSink,
{
    /// Appends an item, wakes the worker, and samples the depth gauge with
    /// the length observed under the queue lock.
    pub(crate) fn enqueue(&self, item: T) {
        let depth = {
            let mut pending = self.pending.lock();
            pending.push_back(Envelope::Item(item));
            pending.len()
        };
        self.ready.notify_one();
        self.record_depth(depth);
    }

    /// Samples the depth gauge with the current queue length.
    pub(crate) fn record_current_depth(&self) {
        if self.metrics.is_none() {
            return;
        }
        let depth = self.pending.lock().len();
        self.record_depth(depth);
    }

    fn record_depth(&self, depth: usize) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        // The sink is foreign code; a panic in it must not reach produce or
        // the worker.
        if catch_unwind(AssertUnwindSafe(|| {
            metrics.record_gauge(&self.metric_name, depth as u64)
        }))
        .is_err()
        {
            #[cfg(feature = "tracing")]
            tracing::debug!("Metrics sink panicked; gauge sample dropped");
        }
    }

    /// Hands one failure to the logging collaborator, when there is one.
    ///
    /// Called at most once per failed item. The sink is best-effort: its
    /// error result and any panic it raises end here.
    pub(crate) async fn report_failure(&self, failure: &(dyn fmt::Display + Sync)) {
        let Some(log) = &self.log else {
            return;
        };
        // The call itself runs inside the guard too, so a sink that panics
        // before returning its future is contained just the same.
        let write = async {
            log.write_error(self.component.as_deref(), "consume", "", failure)
                .await
        };
        match AssertUnwindSafe(write).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(_e)) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Error log rejected a record: {_e}");
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Error log panicked; record dropped");
            }
        }
    }
}
