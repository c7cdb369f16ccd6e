//! Logging collaborators.
//!
//! The queue never logs on its own behalf. Every failed item is handed to an
//! [`ErrorLog`] injected at construction; the implementations here cover the
//! common cases: discard ([`NoopLog`]), capture for assertions
//! ([`MemoryLog`]), and forward to `tracing` (`TracingLog`, behind the
//! `tracing` feature).

#[cfg(feature = "tracing")]
mod bridge;
mod empty;
mod interface;
mod memory;

#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
pub use crate::log::bridge::*;
pub use crate::log::{empty::*, interface::*, memory::*};
