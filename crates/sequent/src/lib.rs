#![doc = include_str!("../README.md")]

mod consumer;
mod error;
mod log;
mod metrics;
mod queue;

pub use crate::consumer::*;
pub use crate::error::*;
pub use crate::log::*;
pub use crate::metrics::*;
pub use crate::queue::*;
