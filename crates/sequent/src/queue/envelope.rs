/// One entry in the pending queue.
///
/// The end-of-stream marker is a distinct variant rather than a reserved
/// item value, so the full value space of `T` (including any "empty" or
/// default value) can be produced. Only [`stop`] and the drop teardown push
/// the marker; the worker exits when it dequeues one.
///
/// [`stop`]: crate::WorkQueue::stop
#[derive(Debug)]
pub(crate) enum Envelope<T> {
    /// A produced item, awaiting its single consume call.
    Item(T),
    /// The drain marker. Everything produced before it has already been
    /// dequeued by the time the worker sees it.
    EndOfStream,
}
