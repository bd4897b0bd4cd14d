//! Priority-aware ready queue for multiplexed connections.
//!
//! Adds two things on top of [`ThreadSafeReadyQueue`]:
//!
//! 1. **Cancellation by stream id**: [`PriorityReadyQueue::remove`] drops
//!    every queued entry of a stream from both sequences.
//! 2. **Best-effort ordering**: a prioritized entry that is ready at
//!    insertion is placed in `front` ahead of entries that sit deeper in the
//!    dependency tree, or that share its parent but carry a smaller weight.
//!
//! This is not weighted fair queueing: weights only order insertions, and
//! entries already in `pending` are never reordered.
//!
//! An insertion may land ahead of the current head of `front`, so a reactor
//! that peeked an entry retires it with
//! [`pop_front_if`](PriorityReadyQueue::pop_front_if) rather than a blind
//! `pop_front`.

use std::collections::HashMap;
use std::collections::VecDeque;

use crate::config::QueueConfig;
use crate::producer::{Producer, StreamPriority, ROOT_STREAM_ID};
use crate::tracing_compat::trace;

use super::entry::Entry;
use super::ready::ReadyQueue;
use super::sync::ThreadSafeReadyQueue;

/// Ready queue with stream cancellation and priority-ordered insertion.
#[derive(Debug)]
pub struct PriorityReadyQueue<P> {
    inner: ThreadSafeReadyQueue<P>,
}

impl<P> Default for PriorityReadyQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PriorityReadyQueue<P> {
    /// Creates an empty queue with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Creates an empty queue.
    #[must_use]
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            inner: ThreadSafeReadyQueue::with_config(config),
        }
    }

    /// Registers an entry.
    ///
    /// Ready prioritized entries ignore `index` and take their priority
    /// position in `front`. Everything else behaves as
    /// [`ReadyQueue::insert`].
    pub fn insert(&self, index: usize, entry: Entry<P>) {
        let mut queue = self.inner.lock();
        match entry.priority() {
            Some(&priority) if !entry.is_pollable() => {
                let pos = priority_position(&*queue, &priority);
                trace!(
                    stream_id = priority.stream_id(),
                    weight = priority.weight(),
                    depends_on = priority.depends_on(),
                    pos,
                    "prioritized entry placed"
                );
                queue.insert_front_at(pos, entry);
            }
            _ => queue.insert(index, entry),
        }
    }

    /// Registers an entry at the tail (or its priority position).
    pub fn append(&self, entry: Entry<P>) {
        self.insert(usize::MAX, entry);
    }

    /// Registers an entry at the head (or its priority position).
    pub fn append_left(&self, entry: Entry<P>) {
        self.insert(0, entry);
    }

    /// Cancels every queued entry of `stream_id`. Returns the number removed;
    /// unknown ids remove nothing.
    pub fn remove(&self, stream_id: u32) -> usize {
        self.inner.lock().remove_stream(stream_id)
    }

    /// Removes the entry at `index` in `front`, if present.
    pub fn remove_at(&self, index: usize) -> Option<Entry<P>> {
        self.inner.remove(index)
    }

    /// Clone of the entry at `index` in `front`, or `None` if it is gone.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<Entry<P>>
    where
        P: Clone,
    {
        self.inner.peek(index)
    }

    /// See [`ThreadSafeReadyQueue::with_peek`].
    pub fn with_peek<R>(&self, index: usize, f: impl FnOnce(&Entry<P>) -> R) -> Option<R> {
        self.inner.with_peek(index, f)
    }

    /// Removes the head of `front`, if any.
    pub fn pop_front(&self) -> Option<Entry<P>> {
        self.inner.pop_front()
    }

    /// See [`ThreadSafeReadyQueue::pop_front_if`].
    pub fn pop_front_if(&self, predicate: impl FnOnce(&Entry<P>) -> bool) -> Option<Entry<P>> {
        self.inner.pop_front_if(predicate)
    }

    /// Drops every entry and any outstanding terminator.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Entries currently serviceable without polling.
    #[must_use]
    pub fn front_len(&self) -> usize {
        self.inner.front_len()
    }

    /// Entries awaiting a readiness poll.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.pending_len()
    }

    /// True when no entry is queued and no terminator is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// True while a terminator is requested or queued.
    #[must_use]
    pub fn has_terminator(&self) -> bool {
        self.inner.has_terminator()
    }

    /// Stream ids of the entries in `front`, in serving order. Entries without
    /// stream metadata are skipped.
    #[must_use]
    pub fn front_stream_ids(&self) -> Vec<u32> {
        self.inner
            .lock()
            .front_entries()
            .iter()
            .filter_map(Entry::stream_id)
            .collect()
    }
}

impl<P: Producer> PriorityReadyQueue<P> {
    /// See [`ReadyQueue::length`]; priority does not change polling.
    pub fn length(&self) -> usize {
        self.inner.length()
    }
}

/// Index in `front` where a ready entry with `new` priority belongs.
///
/// Scans from the head: the first entry that is the terminator, that depends
/// on a stream which is neither the new entry's parent nor one of its
/// ancestors, or that is a lighter sibling, is where the new entry goes.
fn priority_position<P>(queue: &ReadyQueue<P>, new: &StreamPriority) -> usize {
    let front = queue.front_entries();
    if front.is_empty() {
        return 0;
    }
    let parents = parent_links(front, queue.pending_entries());
    let max_depth = queue.config().max_dependency_depth;

    front
        .iter()
        .enumerate()
        .find_map(|(i, entry)| {
            if entry.is_terminator() {
                return Some(i);
            }
            let existing = entry.priority()?;
            let goes_before = if existing.depends_on() == new.depends_on() {
                existing.weight() < new.weight()
            } else {
                !is_ancestor(existing.depends_on(), new.depends_on(), &parents, max_depth)
            };
            goes_before.then_some(i)
        })
        .unwrap_or(front.len())
}

/// Child → parent links known from queued entries.
fn parent_links<P>(front: &VecDeque<Entry<P>>, pending: &VecDeque<Entry<P>>) -> HashMap<u32, u32> {
    front
        .iter()
        .chain(pending.iter())
        .filter_map(Entry::priority)
        .map(|p| (p.stream_id(), p.depends_on()))
        .collect()
}

/// True if `candidate` is `stream` or lies on its path to the root.
///
/// Streams with no known parent hang off the root, which is an ancestor of
/// every stream. The walk stops after `max_depth` links.
fn is_ancestor(candidate: u32, stream: u32, parents: &HashMap<u32, u32>, max_depth: usize) -> bool {
    let mut current = stream;
    for _ in 0..=max_depth {
        if current == candidate {
            return true;
        }
        if current == ROOT_STREAM_ID {
            return false;
        }
        match parents.get(&current) {
            Some(&parent) if parent != current => current = parent,
            _ => return candidate == ROOT_STREAM_ID,
        }
    }
    false
}
