//! Dual-sequence ready queue.
//!
//! ```text
//!   insert(Plain)     ──► front   [a][b][c]  ──► peek(0) / pop_front()
//!   insert(Pollable)  ──► pending [x][y][z]  ──► length() polls, moves first ready to front
//!   insert(Terminator)──► flag, released into front once both sequences drain
//! ```
//!
//! `length()` answers "is something serviceable now" with 0 or 1. Every call
//! polls each pending producer at most once, starting after the last producer
//! it served, so a producer that eventually becomes ready is never starved.

use std::collections::VecDeque;

use crate::config::QueueConfig;
use crate::producer::Producer;
use crate::tracing_compat::{debug, trace, warn};

use super::entry::Entry;

/// Single-threaded ready queue.
#[derive(Debug)]
pub struct ReadyQueue<P> {
    /// Entries that can be served, in serving order.
    front: VecDeque<Entry<P>>,
    /// Entries awaiting a readiness poll, scanned as a ring.
    pending: VecDeque<Entry<P>>,
    /// A terminator was requested but not yet released into `front`.
    terminator_pending: bool,
    config: QueueConfig,
}

impl<P> Default for ReadyQueue<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ReadyQueue<P> {
    /// Creates an empty queue with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Creates an empty queue.
    #[must_use]
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            front: VecDeque::with_capacity(config.initial_capacity),
            pending: VecDeque::with_capacity(config.initial_capacity),
            terminator_pending: false,
            config,
        }
    }

    /// The configuration this queue was built with.
    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Registers an entry.
    ///
    /// `index == 0` places the entry at the head of its sequence; any other
    /// value places it at the tail. Pollable entries go to `pending`, plain
    /// ones to `front`. A terminator ignores `index` and is dropped if one is
    /// already outstanding.
    pub fn insert(&mut self, index: usize, entry: Entry<P>) {
        if entry.is_terminator() {
            self.request_terminator();
        } else if entry.is_pollable() {
            push_at(&mut self.pending, index, entry);
            self.check_pending_len();
        } else {
            push_at(&mut self.front, index, entry);
        }
    }

    /// Registers an entry at the tail.
    pub fn append(&mut self, entry: Entry<P>) {
        self.insert(usize::MAX, entry);
    }

    /// Registers an entry at the head.
    pub fn append_left(&mut self, entry: Entry<P>) {
        self.insert(0, entry);
    }

    /// Marks the terminator as requested unless one is already outstanding.
    fn request_terminator(&mut self) {
        if self.has_terminator() {
            debug!("duplicate terminator ignored");
            return;
        }
        self.terminator_pending = true;
    }

    /// True while a terminator is requested or sitting in `front` unserved.
    #[must_use]
    pub fn has_terminator(&self) -> bool {
        self.terminator_pending || self.front.iter().any(Entry::is_terminator)
    }

    /// Entry at `index` in `front`.
    ///
    /// # Panics
    ///
    /// Panics if `front` has no such slot; call [`length`](Self::length) first.
    #[must_use]
    pub fn peek(&self, index: usize) -> &Entry<P> {
        match self.front.get(index) {
            Some(entry) => entry,
            None => panic!(
                "peek({index}) on ready queue with {} serviceable entries",
                self.front.len()
            ),
        }
    }

    /// Entry at `index` in `front`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry<P>> {
        self.front.get(index)
    }

    /// Removes the served head of `front`.
    ///
    /// # Panics
    ///
    /// Panics if `front` is empty.
    pub fn pop_front(&mut self) -> Entry<P> {
        match self.front.pop_front() {
            Some(entry) => entry,
            None => panic!("pop_front on ready queue with no serviceable entry"),
        }
    }

    /// Removes the head of `front` if there is one.
    pub fn try_pop_front(&mut self) -> Option<Entry<P>> {
        self.front.pop_front()
    }

    /// Removes the entry at `index` in `front`.
    ///
    /// # Panics
    ///
    /// Panics if `front` has no such slot.
    pub fn remove(&mut self, index: usize) -> Entry<P> {
        let len = self.front.len();
        match self.front.remove(index) {
            Some(entry) => entry,
            None => panic!("remove({index}) on ready queue with {len} serviceable entries"),
        }
    }

    /// Removes the entry at `index` in `front` if it exists.
    pub fn try_remove(&mut self, index: usize) -> Option<Entry<P>> {
        self.front.remove(index)
    }

    /// Cancels every queued entry of `stream_id`, in both sequences.
    ///
    /// Entries without stream metadata never match. Returns how many entries
    /// were dropped.
    pub fn remove_stream(&mut self, stream_id: u32) -> usize {
        let before = self.front.len() + self.pending.len();
        self.front.retain(|e| e.stream_id() != Some(stream_id));
        self.pending.retain(|e| e.stream_id() != Some(stream_id));
        let removed = before - (self.front.len() + self.pending.len());
        if removed > 0 {
            debug!(stream_id, removed, "stream entries cancelled");
        }
        removed
    }

    /// Drops every entry and any outstanding terminator.
    pub fn clear(&mut self) {
        debug!(
            front = self.front.len(),
            pending = self.pending.len(),
            "ready queue cleared"
        );
        self.front.clear();
        self.pending.clear();
        self.terminator_pending = false;
    }

    /// Entries currently serviceable without polling.
    #[must_use]
    pub fn front_len(&self) -> usize {
        self.front.len()
    }

    /// Entries awaiting a readiness poll.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// True when no entry is queued and no terminator is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.pending.is_empty() && !self.terminator_pending
    }

    pub(crate) fn front_entries(&self) -> &VecDeque<Entry<P>> {
        &self.front
    }

    pub(crate) fn pending_entries(&self) -> &VecDeque<Entry<P>> {
        &self.pending
    }

    /// Inserts directly into `front` at `pos` (clamped to its length).
    pub(crate) fn insert_front_at(&mut self, pos: usize, entry: Entry<P>) {
        let pos = pos.min(self.front.len());
        self.front.insert(pos, entry);
    }

    fn check_pending_len(&self) {
        let threshold = self.config.pending_warn_threshold;
        if threshold > 0 && self.pending.len() > threshold {
            warn!(
                pending = self.pending.len(),
                threshold, "pending producers above threshold"
            );
        }
    }
}

impl<P: Producer> ReadyQueue<P> {
    /// Returns 1 if an entry can be served now, else 0.
    ///
    /// Releases the terminator once nothing else is queued. Demotes a head
    /// entry that stopped being ready, then scans `pending` once around the
    /// ring; the first ready producer is promoted into `front`.
    pub fn length(&mut self) -> usize {
        if self.terminator_pending && self.front.is_empty() && self.pending.is_empty() {
            self.terminator_pending = false;
            self.front.push_back(Entry::Terminator);
            debug!("terminator released");
            return 1;
        }

        // Demoted entries were just polled; the scan below skips them.
        let scan = self.pending.len();
        while let Some(head) = self.front.front() {
            if head.poll_ready() {
                return 1;
            }
            if let Some(entry) = self.front.pop_front() {
                trace!(stream_id = ?entry.stream_id(), "head not ready, demoted");
                self.pending.push_back(entry);
            }
        }

        match self.pending.iter().take(scan).position(Entry::poll_ready) {
            Some(pos) => {
                // Entries passed over move behind the rest, as a ring rotation would.
                self.pending.rotate_left(pos);
                if let Some(entry) = self.pending.pop_front() {
                    trace!(offset = pos, stream_id = ?entry.stream_id(), "pending entry ready");
                    self.front.push_back(entry);
                }
                1
            }
            None => {
                if self.pending.len() > scan {
                    self.pending.rotate_left(scan);
                }
                0
            }
        }
    }

    /// Pops entries for as long as [`length`](Self::length) reports one.
    ///
    /// The terminator, if released, is the last item yielded.
    pub fn drain_ready(&mut self) -> DrainReady<'_, P> {
        DrainReady { queue: self }
    }
}

/// Iterator returned by [`ReadyQueue::drain_ready`].
#[derive(Debug)]
pub struct DrainReady<'a, P: Producer> {
    queue: &'a mut ReadyQueue<P>,
}

impl<P: Producer> Iterator for DrainReady<'_, P> {
    type Item = Entry<P>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.queue.length() == 0 {
            return None;
        }
        self.queue.try_pop_front()
    }
}

fn push_at<P>(seq: &mut VecDeque<Entry<P>>, index: usize, entry: Entry<P>) {
    if index == 0 {
        seq.push_front(entry);
    } else {
        seq.push_back(entry);
    }
}
