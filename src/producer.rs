//! Producer capability contract.
//!
//! The queue never reads bytes from a producer. It only needs to know whether
//! a producer has output available right now, and for multiplexed
//! connections, which logical stream the producer belongs to and how that
//! stream is prioritized.
//!
//! - [`Producer`]: readiness probe, consulted only for pollable entries.
//! - [`StreamProducer`]: HTTP/2-style stream metadata (id, weight, parent).
//! - [`StreamPriority`]: the metadata carried by a prioritized queue entry.

use std::sync::Arc;

/// Weight assigned to streams that do not specify one (RFC 7540 §5.3.5).
pub const DEFAULT_WEIGHT: u16 = 16;

/// Smallest valid stream weight.
pub const MIN_WEIGHT: u16 = 1;

/// Largest valid stream weight.
pub const MAX_WEIGHT: u16 = 256;

/// Stream id of the root of the dependency tree.
pub const ROOT_STREAM_ID: u32 = 0;

/// An output producer that can report whether it has data available.
///
/// `ready` is called from the reactor thread while the queue lock is held.
/// It must not block and must be safe to call repeatedly.
pub trait Producer {
    /// Returns true if the producer can yield its next chunk without blocking.
    fn ready(&self) -> bool;
}

impl<T: Producer + ?Sized> Producer for &T {
    fn ready(&self) -> bool {
        (**self).ready()
    }
}

impl<T: Producer + ?Sized> Producer for Box<T> {
    fn ready(&self) -> bool {
        (**self).ready()
    }
}

impl<T: Producer + ?Sized> Producer for Arc<T> {
    fn ready(&self) -> bool {
        (**self).ready()
    }
}

/// A producer bound to one logical stream of a multiplexed connection.
pub trait StreamProducer: Producer {
    /// Identifier of the logical stream, used for cancellation.
    fn stream_id(&self) -> u32;

    /// Relative weight among siblings (1..=256).
    fn weight(&self) -> u16 {
        DEFAULT_WEIGHT
    }

    /// Stream this one depends on; [`ROOT_STREAM_ID`] for none.
    fn depends_on(&self) -> u32 {
        ROOT_STREAM_ID
    }

    /// Collects the priority metadata into a [`StreamPriority`].
    fn priority(&self) -> StreamPriority {
        StreamPriority::new(self.stream_id(), self.weight(), self.depends_on())
    }
}

impl<T: StreamProducer + ?Sized> StreamProducer for &T {
    fn stream_id(&self) -> u32 {
        (**self).stream_id()
    }

    fn weight(&self) -> u16 {
        (**self).weight()
    }

    fn depends_on(&self) -> u32 {
        (**self).depends_on()
    }
}

impl<T: StreamProducer + ?Sized> StreamProducer for Arc<T> {
    fn stream_id(&self) -> u32 {
        (**self).stream_id()
    }

    fn weight(&self) -> u16 {
        (**self).weight()
    }

    fn depends_on(&self) -> u32 {
        (**self).depends_on()
    }
}

impl<T: StreamProducer + ?Sized> StreamProducer for Box<T> {
    fn stream_id(&self) -> u32 {
        (**self).stream_id()
    }

    fn weight(&self) -> u16 {
        (**self).weight()
    }

    fn depends_on(&self) -> u32 {
        (**self).depends_on()
    }
}

/// Scheduling metadata for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamPriority {
    stream_id: u32,
    weight: u16,
    depends_on: u32,
}

impl StreamPriority {
    /// Creates priority metadata. The weight is clamped into `1..=256`.
    #[must_use]
    pub fn new(stream_id: u32, weight: u16, depends_on: u32) -> Self {
        Self {
            stream_id,
            weight: weight.clamp(MIN_WEIGHT, MAX_WEIGHT),
            depends_on,
        }
    }

    /// Root-level stream with the default weight.
    #[must_use]
    pub fn for_stream(stream_id: u32) -> Self {
        Self::new(stream_id, DEFAULT_WEIGHT, ROOT_STREAM_ID)
    }

    /// Builds metadata from an HTTP/2 PRIORITY field, whose weight octet
    /// encodes `weight - 1`.
    #[must_use]
    pub fn from_wire_weight(stream_id: u32, wire_weight: u8, depends_on: u32) -> Self {
        Self::new(stream_id, u16::from(wire_weight) + 1, depends_on)
    }

    /// Stream identifier.
    #[must_use]
    pub const fn stream_id(&self) -> u32 {
        self.stream_id
    }

    /// Weight in `1..=256`.
    #[must_use]
    pub const fn weight(&self) -> u16 {
        self.weight
    }

    /// Parent stream id.
    #[must_use]
    pub const fn depends_on(&self) -> u32 {
        self.depends_on
    }

    /// Returns a copy with a different weight.
    #[must_use]
    pub fn with_weight(self, weight: u16) -> Self {
        Self::new(self.stream_id, weight, self.depends_on)
    }

    /// Returns a copy with a different parent stream.
    #[must_use]
    pub fn with_dependency(self, depends_on: u32) -> Self {
        Self::new(self.stream_id, self.weight, depends_on)
    }
}
