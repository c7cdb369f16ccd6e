//! Error types for work queue construction.
//!
//! This module defines the central `Error` enum. Construction is the only
//! fallible surface of the crate: once a [`WorkQueue`] exists, `produce`,
//! `start`, and `stop` never return errors and never panic across the API
//! boundary. Item-level failures are routed to the queue's logging
//! collaborator instead (see [`ErrorLog`]).
//!
//! ## Error Cases
//! - `BlankComponentName`: A component label was supplied but is empty or
//!   all-whitespace.
//! - `RuntimeUnavailable`: No tokio runtime handle could be captured, so the
//!   worker task would have nowhere to run.
//!
//! [`WorkQueue`]: crate::WorkQueue
//! [`ErrorLog`]: crate::ErrorLog

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for work queue construction.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A component label was supplied but contains no visible characters.
    #[error("Component name must not be blank")]
    BlankComponentName,

    /// No tokio runtime is reachable from the constructing thread.
    #[error("No tokio runtime available to host the worker: {0}")]
    RuntimeUnavailable(#[from] tokio::runtime::TryCurrentError),
}
