//! Lock-guarded ready queue.
//!
//! Every method takes the queue lock for the duration of that one call. A
//! `length()` followed by `peek(0)` is two critical sections, so a concurrent
//! `remove` may empty `front` in between; `peek` and `pop_front` therefore
//! return `Option` here instead of panicking.
//!
//! Producers' `ready()` runs while the lock is held and must not call back
//! into the queue.

use parking_lot::{Mutex, MutexGuard};

use crate::config::QueueConfig;
use crate::producer::Producer;

use super::entry::Entry;
use super::ready::ReadyQueue;

/// [`ReadyQueue`] shared between the reactor and registering threads.
#[derive(Debug)]
pub struct ThreadSafeReadyQueue<P> {
    inner: Mutex<ReadyQueue<P>>,
}

impl<P> Default for ThreadSafeReadyQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ThreadSafeReadyQueue<P> {
    /// Creates an empty queue with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Creates an empty queue.
    #[must_use]
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            inner: Mutex::new(ReadyQueue::with_config(config)),
        }
    }

    /// See [`ReadyQueue::insert`].
    pub fn insert(&self, index: usize, entry: Entry<P>) {
        self.inner.lock().insert(index, entry);
    }

    /// Registers an entry at the tail.
    pub fn append(&self, entry: Entry<P>) {
        self.inner.lock().append(entry);
    }

    /// Registers an entry at the head.
    pub fn append_left(&self, entry: Entry<P>) {
        self.inner.lock().append_left(entry);
    }

    /// Clone of the entry at `index` in `front`, or `None` if it is gone.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<Entry<P>>
    where
        P: Clone,
    {
        self.inner.lock().get(index).cloned()
    }

    /// Runs `f` on the entry at `index` in `front` while holding the lock.
    ///
    /// For producers that are not `Clone`. `f` must not touch this queue.
    pub fn with_peek<R>(&self, index: usize, f: impl FnOnce(&Entry<P>) -> R) -> Option<R> {
        self.inner.lock().get(index).map(f)
    }

    /// Removes the head of `front`, if any.
    pub fn pop_front(&self) -> Option<Entry<P>> {
        self.inner.lock().try_pop_front()
    }

    /// Removes the head of `front` only if `predicate` accepts it.
    ///
    /// Lets the reactor retire the producer it just drained without popping
    /// an unrelated entry when the head changed since its `peek`.
    pub fn pop_front_if(&self, predicate: impl FnOnce(&Entry<P>) -> bool) -> Option<Entry<P>> {
        let mut queue = self.inner.lock();
        if queue.get(0).is_some_and(predicate) {
            queue.try_pop_front()
        } else {
            None
        }
    }

    /// Removes the entry at `index` in `front`, if present.
    pub fn remove(&self, index: usize) -> Option<Entry<P>> {
        self.inner.lock().try_remove(index)
    }

    /// Drops every entry and any outstanding terminator.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// See [`ReadyQueue::front_len`].
    #[must_use]
    pub fn front_len(&self) -> usize {
        self.inner.lock().front_len()
    }

    /// See [`ReadyQueue::pending_len`].
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending_len()
    }

    /// See [`ReadyQueue::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// See [`ReadyQueue::has_terminator`].
    #[must_use]
    pub fn has_terminator(&self) -> bool {
        self.inner.lock().has_terminator()
    }

    /// Consumes the wrapper and returns the unsynchronized queue.
    #[must_use]
    pub fn into_inner(self) -> ReadyQueue<P> {
        self.inner.into_inner()
    }

    /// Exclusive access for compound operations built on top of this queue.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ReadyQueue<P>> {
        self.inner.lock()
    }
}

impl<P: Producer> ThreadSafeReadyQueue<P> {
    /// See [`ReadyQueue::length`].
    pub fn length(&self) -> usize {
        self.inner.lock().length()
    }
}

impl<P> From<ReadyQueue<P>> for ThreadSafeReadyQueue<P> {
    fn from(queue: ReadyQueue<P>) -> Self {
        Self {
            inner: Mutex::new(queue),
        }
    }
}
