use core::{fmt, future::Future};

/// The consume capability of a [`WorkQueue`].
///
/// The queue's background worker calls [`consume`] for every produced item,
/// one call at a time, in production order. The worker is the sole owner of
/// the consumer, so the method takes `&mut self` and implementations can
/// keep mutable state without any internal locking.
///
/// A returned error (or a panic) affects only the item that caused it: the
/// failure is handed to the queue's logging collaborator and the worker
/// moves on to the next item.
///
/// Closures implement this trait too, so a plain `FnMut` can act as the
/// consume capability:
///
/// ```
/// use core::convert::Infallible;
///
/// let consumer = |item: u64| async move {
///     println!("{item}");
///     Ok::<(), Infallible>(())
/// };
/// # fn takes_consumer(_: impl sequent::Consumer<u64>) {}
/// # takes_consumer(consumer);
/// ```
///
/// [`WorkQueue`]: crate::WorkQueue
/// [`consume`]: Consumer::consume
pub trait Consumer<T>: Send + 'static {
    /// The per-item failure type, reported to the logging collaborator.
    type Error: fmt::Display + Send + Sync + 'static;

    /// Processes a single item.
    ///
    /// Called at most once per produced item, never concurrently with
    /// itself. The next item is not dequeued until the returned future
    /// resolves.
    ///
    /// # Errors
    ///
    /// An error marks this one item as failed. It is logged and discarded;
    /// the worker keeps running.
    fn consume(&mut self, item: T) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<T, F, Fut, E> Consumer<T> for F
where
    F: FnMut(T) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send,
    E: fmt::Display + Send + Sync + 'static,
{
    type Error = E;

    fn consume(&mut self, item: T) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (self)(item)
    }
}
