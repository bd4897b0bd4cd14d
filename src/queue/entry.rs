//! Queue entries.

use crate::producer::{Producer, StreamPriority, StreamProducer};

/// How a queue decides whether an entry can be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Always ready; never polled.
    Immediate,
    /// Polled through [`Producer::ready`] before it is served.
    Polled,
}

/// A producer carrying stream priority metadata.
#[derive(Debug, Clone)]
pub struct Prioritized<P> {
    producer: P,
    readiness: Readiness,
    priority: StreamPriority,
}

impl<P> Prioritized<P> {
    /// Creates a prioritized entry payload.
    #[must_use]
    pub fn new(producer: P, readiness: Readiness, priority: StreamPriority) -> Self {
        Self {
            producer,
            readiness,
            priority,
        }
    }

    /// The wrapped producer.
    #[must_use]
    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Unwraps the producer.
    #[must_use]
    pub fn into_producer(self) -> P {
        self.producer
    }

    /// Readiness mode.
    #[must_use]
    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Priority metadata.
    #[must_use]
    pub fn priority(&self) -> &StreamPriority {
        &self.priority
    }
}

/// One slot in a ready queue.
#[derive(Debug, Clone)]
pub enum Entry<P> {
    /// Always ready, served in FIFO order.
    Plain(P),
    /// Served once [`Producer::ready`] reports true.
    Pollable(P),
    /// Plain or pollable producer with stream metadata.
    Prioritized(Prioritized<P>),
    /// Close the connection once every real producer has drained.
    Terminator,
}

impl<P> Entry<P> {
    /// Prioritized entry that is always ready.
    #[must_use]
    pub fn prioritized(producer: P, priority: StreamPriority) -> Self {
        Self::Prioritized(Prioritized::new(producer, Readiness::Immediate, priority))
    }

    /// Prioritized entry that must be polled.
    #[must_use]
    pub fn prioritized_pollable(producer: P, priority: StreamPriority) -> Self {
        Self::Prioritized(Prioritized::new(producer, Readiness::Polled, priority))
    }

    /// Returns true for the close sentinel.
    #[must_use]
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Terminator)
    }

    /// Returns true if the entry has to be polled before it is served.
    #[must_use]
    pub fn is_pollable(&self) -> bool {
        match self {
            Self::Pollable(_) => true,
            Self::Prioritized(p) => p.readiness == Readiness::Polled,
            Self::Plain(_) | Self::Terminator => false,
        }
    }

    /// The producer, if this is not the terminator.
    #[must_use]
    pub fn producer(&self) -> Option<&P> {
        match self {
            Self::Plain(p) | Self::Pollable(p) => Some(p),
            Self::Prioritized(p) => Some(&p.producer),
            Self::Terminator => None,
        }
    }

    /// Consumes the entry and returns its producer.
    #[must_use]
    pub fn into_producer(self) -> Option<P> {
        match self {
            Self::Plain(p) | Self::Pollable(p) => Some(p),
            Self::Prioritized(p) => Some(p.producer),
            Self::Terminator => None,
        }
    }

    /// Priority metadata, for prioritized entries only.
    #[must_use]
    pub fn priority(&self) -> Option<&StreamPriority> {
        match self {
            Self::Prioritized(p) => Some(&p.priority),
            _ => None,
        }
    }

    /// Stream id, for prioritized entries only.
    #[must_use]
    pub fn stream_id(&self) -> Option<u32> {
        self.priority().map(StreamPriority::stream_id)
    }
}

impl<P: Producer> Entry<P> {
    /// Whether the entry can be served now. Non-pollable entries are always
    /// ready; pollable ones ask their producer.
    #[must_use]
    pub fn poll_ready(&self) -> bool {
        match self {
            Self::Plain(_) | Self::Terminator => true,
            Self::Pollable(p) => p.ready(),
            Self::Prioritized(p) => match p.readiness {
                Readiness::Immediate => true,
                Readiness::Polled => p.producer.ready(),
            },
        }
    }
}

impl<P: StreamProducer> Entry<P> {
    /// Builds a prioritized entry from the producer's own stream metadata.
    #[must_use]
    pub fn from_stream(producer: P, readiness: Readiness) -> Self {
        let priority = producer.priority();
        Self::Prioritized(Prioritized::new(producer, readiness, priority))
    }
}
