//! readyq: ready-queue scheduling for reactor-driven output producers.
//!
//! # Overview
//!
//! A reactor-style connection handler keeps a queue of output producers per
//! socket. On every loop tick it asks the queue whether anything can be
//! written now, drains the head producer, and retires it once exhausted.
//! Producers may be registered from other threads, and on multiplexed
//! connections they belong to logical streams that can be cancelled and that
//! carry HTTP/2-style weight and dependency.
//!
//! # Core Guarantees
//!
//! - **Non-blocking**: `length()` polls each pending producer at most once and never waits
//! - **Fair rotation**: producers that are not ready keep their relative order; none is starved
//! - **Orderly close**: the terminator is served exactly once, after every real producer
//! - **Precise cancellation**: `remove(stream_id)` drops all and only that stream's entries
//!
//! # Module Structure
//!
//! - [`producer`]: the capability contract producers implement
//! - [`queue`]: [`ReadyQueue`], [`ThreadSafeReadyQueue`], [`PriorityReadyQueue`]
//! - [`config`]: queue tunables, environment and file loading
//! - [`error`]: configuration errors

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod producer;
pub mod queue;
pub mod tracing_compat;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::QueueConfig;
pub use error::ConfigError;
pub use producer::{Producer, StreamPriority, StreamProducer, DEFAULT_WEIGHT, ROOT_STREAM_ID};
pub use queue::{
    DrainReady, Entry, Prioritized, PriorityReadyQueue, Readiness, ReadyQueue,
    ThreadSafeReadyQueue,
};
