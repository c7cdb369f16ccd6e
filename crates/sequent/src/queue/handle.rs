use core::{
    fmt, mem,
    sync::atomic::{AtomicBool, Ordering},
};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{runtime::Handle, task::JoinHandle};

use crate::{
    Consumer, ErrorLog, MetricsSink, NoopLog, NoopMetrics, Result,
    queue::{builder::WorkQueueBuilder, shared::Shared, worker::worker_loop},
};

/// Lifecycle of the single worker task.
///
/// The variants carry exactly the data that exists in each phase: the
/// consumer waits in `Idle` until the one `Idle -> Running` transition moves
/// it into the spawned worker, and the join handle lives in `Running` until
/// the one `Running -> Stopping` transition hands it to the stopping caller.
enum LifecycleState<C> {
    /// Not started. The next `start` (or first `produce`) spawns the worker.
    Idle { consumer: C },
    /// The worker is consuming.
    Running { worker: JoinHandle<()> },
    /// A stop is in flight; its caller holds the join handle.
    Stopping,
    /// The worker has exited. Terminal: the queue cannot be restarted.
    Stopped,
}

impl<C> LifecycleState<C> {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "idle",
            Self::Running { .. } => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

/// An ordered, single-consumer work queue.
///
/// Items go in through [`produce`] from any thread or task; exactly one
/// background worker takes them out and feeds them to the queue's
/// [`Consumer`], one at a time, in production order. A failed item is
/// reported to the logging collaborator and skipped; the worker itself keeps
/// running until [`stop`] drains it.
///
/// # Example
///
/// ```
/// use core::convert::Infallible;
/// use sequent::WorkQueue;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), sequent::Error> {
/// let queue = WorkQueue::new(|item: u32| async move {
///     println!("handled {item}");
///     Ok::<(), Infallible>(())
/// })?;
///
/// queue.produce(1);
/// queue.produce(2);
/// queue.produce(3);
///
/// // Resolves once all three items have been consumed.
/// queue.stop().await;
/// # Ok(())
/// # }
/// ```
///
/// Dropping the queue without calling [`stop`] also shuts the worker down,
/// but without waiting: the worker keeps draining in the background. Await
/// [`stop`] when the drain must have finished.
///
/// [`produce`]: WorkQueue::produce
/// [`stop`]: WorkQueue::stop
pub struct WorkQueue<T, C, L = NoopLog, M = NoopMetrics> {
    shared: Arc<Shared<T, L, M>>,
    lifecycle: Mutex<LifecycleState<C>>,
    /// Fast-path mirror of `Running`, so `produce` skips the lifecycle lock
    /// once the worker is up.
    started: AtomicBool,
    runtime: Handle,
}

impl<T, C> WorkQueue<T, C>
where
    T: Send + 'static,
    C: Consumer<T>,
{
    /// Creates a queue with no component label, no logging, and no metrics.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::RuntimeUnavailable`] when called outside a tokio
    /// runtime.
    ///
    /// [`Error::RuntimeUnavailable`]: crate::Error::RuntimeUnavailable
    pub fn new(consumer: C) -> Result<Self> {
        Self::builder(consumer).build()
    }

    /// Starts building a queue around the given consume capability.
    pub fn builder(consumer: C) -> WorkQueueBuilder<T, C> {
        WorkQueueBuilder::new(consumer)
    }
}

impl<T, C, L, M> WorkQueue<T, C, L, M>
where
    T: Send + 'static,
    C: Consumer<T>,
    L: ErrorLog,
    M: MetricsSink,
{
    pub(crate) fn from_parts(shared: Arc<Shared<T, L, M>>, consumer: C, runtime: Handle) -> Self {
        Self {
            shared,
            lifecycle: Mutex::new(LifecycleState::Idle { consumer }),
            started: AtomicBool::new(false),
            runtime,
        }
    }

    /// The component label supplied at construction, if any.
    pub fn component(&self) -> Option<&str> {
        self.shared.component()
    }

    /// Enqueues one item for the worker.
    ///
    /// Fire-and-forget: the call returns as soon as the item is in the
    /// queue. It never blocks on the consumer, never returns an error, and
    /// is safe to call from plain threads as well as tasks. The first call
    /// starts the worker implicitly.
    ///
    /// After [`stop`] the queue no longer accepts work; the item is dropped.
    ///
    /// [`stop`]: WorkQueue::stop
    pub fn produce(&self, item: T) {
        if !self.ensure_started() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                component = self.shared.component().unwrap_or_default(),
                "Item produced after stop; dropped"
            );
            return;
        }
        self.shared.enqueue(item);
    }

    /// Starts the worker if it has not started yet.
    ///
    /// Idempotent and race-free: concurrent calls spawn exactly one worker.
    /// After [`stop`] this is a no-op; a stopped queue stays stopped.
    ///
    /// [`stop`]: WorkQueue::stop
    pub fn start(&self) {
        self.ensure_started();
    }

    /// Stops the worker and waits for the drain.
    ///
    /// Every item accepted before this call is consumed before the returned
    /// future resolves; there is no timeout. Idempotent: concurrent and
    /// repeated calls return immediately, only the caller that performs the
    /// `Running -> Stopping` transition waits. Stopping a queue that never
    /// started leaves it startable.
    pub async fn stop(&self) {
        let worker = {
            let mut lifecycle = self.lifecycle.lock();
            match mem::replace(&mut *lifecycle, LifecycleState::Stopping) {
                LifecycleState::Running { worker } => {
                    self.started.store(false, Ordering::Release);
                    worker
                }
                state => {
                    // Idle, Stopping or Stopped: nothing to drain here. Put
                    // the state back before the lock drops.
                    *lifecycle = state;
                    return;
                }
            }
        };

        // The marker lands behind every item accepted above, so joining the
        // worker is exactly the drain guarantee.
        self.shared.enqueue_end_of_stream();

        if let Err(_e) = worker.await {
            #[cfg(feature = "tracing")]
            tracing::error!("Worker task did not join cleanly during stop: {_e}");
        }

        *self.lifecycle.lock() = LifecycleState::Stopped;
    }

    /// Returns whether the queue currently accepts work, starting the worker
    /// on the way when it has never run.
    fn ensure_started(&self) -> bool {
        if self.started.load(Ordering::Acquire) {
            return true;
        }
        self.start_locked()
    }

    fn start_locked(&self) -> bool {
        let mut lifecycle = self.lifecycle.lock();
        // Take the state out to move the consumer; every arm puts a state
        // back before the lock drops.
        match mem::replace(&mut *lifecycle, LifecycleState::Stopping) {
            LifecycleState::Idle { consumer } => {
                let worker = self
                    .runtime
                    .spawn(worker_loop(Arc::clone(&self.shared), consumer));
                *lifecycle = LifecycleState::Running { worker };
                self.started.store(true, Ordering::Release);
                true
            }
            state @ LifecycleState::Running { .. } => {
                // Lost the start race; the winner already spawned.
                *lifecycle = state;
                true
            }
            state @ (LifecycleState::Stopping | LifecycleState::Stopped) => {
                *lifecycle = state;
                false
            }
        }
    }
}

impl<T, C, L, M> fmt::Debug for WorkQueue<T, C, L, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self
            .lifecycle
            .try_lock()
            .map_or("<locked>", |state| state.name());
        f.debug_struct("WorkQueue")
            .field("component", &self.shared.component())
            .field("state", &state)
            .finish_non_exhaustive()
    }
}

impl<T, C, L, M> Drop for WorkQueue<T, C, L, M> {
    fn drop(&mut self) {
        let lifecycle = self.lifecycle.get_mut();
        if matches!(*lifecycle, LifecycleState::Running { .. }) {
            *self.started.get_mut() = false;
            // Dropping the join handle detaches the worker: it drains the
            // items already queued and exits at the marker, unobserved.
            *lifecycle = LifecycleState::Stopped;
            self.shared.enqueue_end_of_stream();
        }
    }
}
