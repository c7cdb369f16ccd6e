use std::sync::Arc;

/// The metrics capability of a [`WorkQueue`].
///
/// The queue reports its pending depth as a named integer gauge: once per
/// `produce` call and once after every successfully consumed item. Samples
/// are fire-and-forget; implementations should hand them off cheaply (an
/// atomic store, a channel send) and must not block.
///
/// A sink is only consulted when one was injected at construction, so the
/// unconfigured queue pays nothing for this hook.
///
/// [`WorkQueue`]: crate::WorkQueue
pub trait MetricsSink: Send + Sync + 'static {
    /// Records one sample of the named gauge.
    fn record_gauge(&self, name: &str, value: u64);
}

/// A metrics sink that discards every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_gauge(&self, _name: &str, _value: u64) {}
}

impl<M> MetricsSink for Arc<M>
where
    M: MetricsSink + ?Sized,
{
    fn record_gauge(&self, name: &str, value: u64) {
        (**self).record_gauge(name, value)
    }
}
