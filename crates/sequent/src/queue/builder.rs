use core::marker::PhantomData;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::{
    Consumer, Error, ErrorLog, MetricsSink, NoopLog, NoopMetrics, Result,
    queue::{handle::WorkQueue, shared::Shared},
};

/// Builds a [`WorkQueue`], wiring in the optional collaborators.
///
/// Obtained from [`WorkQueue::builder`]. The component label feeds both log
/// records and the gauge name; the logging and metrics collaborators are
/// disabled until injected.
///
/// # Example
///
/// ```
/// use core::convert::Infallible;
/// use std::sync::Arc;
/// use sequent::{MemoryLog, WorkQueue};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), sequent::Error> {
/// let log = Arc::new(MemoryLog::new());
/// let queue = WorkQueue::builder(|item: u32| async move {
///     let _ = item;
///     Ok::<(), Infallible>(())
/// })
/// .component("order-feed")
/// .log(Arc::clone(&log))
/// .build()?;
///
/// queue.produce(7);
/// queue.stop().await;
/// assert!(log.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct WorkQueueBuilder<T, C, L = NoopLog, M = NoopMetrics> {
    consumer: C,
    component: Option<String>,
    log: Option<L>,
    metrics: Option<M>,
    _item: PhantomData<fn(T)>,
}

impl<T, C> WorkQueueBuilder<T, C> {
    pub(crate) fn new(consumer: C) -> Self {
        Self {
            consumer,
            component: None,
            log: None,
            metrics: None,
            _item: PhantomData,
        }
    }
}

impl<T, C, L, M> WorkQueueBuilder<T, C, L, M> {
    /// Labels the queue. The label shows up in every log record and as the
    /// gauge-name suffix.
    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Injects the logging collaborator that receives failed items.
    pub fn log<L2>(self, log: L2) -> WorkQueueBuilder<T, C, L2, M> {
        WorkQueueBuilder {
            consumer: self.consumer,
            component: self.component,
            log: Some(log),
            metrics: self.metrics,
            _item: PhantomData,
        }
    }

    /// Injects the metrics collaborator. Its presence is what enables depth
    /// gauge sampling.
    pub fn metrics<M2>(self, metrics: M2) -> WorkQueueBuilder<T, C, L, M2> {
        WorkQueueBuilder {
            consumer: self.consumer,
            component: self.component,
            log: self.log,
            metrics: Some(metrics),
            _item: PhantomData,
        }
    }

    /// Validates the configuration and creates the queue.
    ///
    /// The worker is not spawned yet; that happens on the first [`start`] or
    /// [`produce`] call.
    ///
    /// # Errors
    ///
    /// - [`Error::BlankComponentName`] when a component label was supplied
    ///   but contains no visible characters.
    /// - [`Error::RuntimeUnavailable`] when no tokio runtime handle can be
    ///   captured from the calling thread.
    ///
    /// [`start`]: WorkQueue::start
    /// [`produce`]: WorkQueue::produce
    pub fn build(self) -> Result<WorkQueue<T, C, L, M>>
    where
        T: Send + 'static,
        C: Consumer<T>,
        L: ErrorLog,
        M: MetricsSink,
    {
        if self
            .component
            .as_deref()
            .is_some_and(|component| component.trim().is_empty())
        {
            return Err(Error::BlankComponentName);
        }

        // Captured here so `produce` works from plain threads later; only
        // construction needs to happen inside the runtime.
        let runtime = Handle::try_current()?;

        let metric_name = match self.component.as_deref() {
            Some(component) => format!("work_queue_depth.{component}"),
            None => "work_queue_depth".to_owned(),
        };
        let shared = Arc::new(Shared::new(
            self.component,
            metric_name,
            self.log,
            self.metrics,
        ));
        Ok(WorkQueue::from_parts(shared, self.consumer, runtime))
    }
}
