//! The ordered work queue and its single worker.
//!
//! This module defines the [`WorkQueue`] handle, its builder, and the worker
//! task behind it. Producers and the worker meet at one mutex-guarded
//! `VecDeque` of envelopes; lifecycle transitions live in a second, separate
//! critical section so that `produce` never contends with start/stop
//! bookkeeping beyond one atomic load.

mod builder;
mod envelope;
mod handle;
mod shared;
mod worker;


pub use crate::queue::{builder::*, handle::*};
