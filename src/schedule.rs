//! Deferred one-shot actions.
//!
//! A min-heap keyed by due time; each entry gets a handle that can cancel it
//! before it fires.  The scheduler never runs anything itself: callers pull
//! due actions with [`Scheduler::pop_due`] and decide, by checking whatever
//! the action refers to, whether it still applies.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
pub struct Scheduler<A> {
    /// (due, seq) — seq keeps same-time actions in insertion order.
    queue: BinaryHeap<Reverse<(Duration, u64)>>,
    pending: HashMap<u64, A>,
    next_seq: u64,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: Duration, action: A) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse((due, seq)));
        self.pending.insert(seq, action);
        TaskHandle(seq)
    }

    /// Returns the action if it had not fired or been cancelled yet.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<A> {
        self.pending.remove(&handle.0)
    }

    /// Pop the earliest action whose due time is `<= now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<A> {
        while let Some(Reverse((due, seq))) = self.queue.peek().copied() {
            if due > now {
                return None;
            }
            self.queue.pop();
            // Cancelled entries leave a tombstone in the heap; skip it.
            if let Some(action) = self.pending.remove(&seq) {
                return Some(action);
            }
        }
        None
    }

    /// Drain everything due at `now`, earliest first.
    pub fn drain_due(&mut self, now: Duration) -> Vec<A> {
        let mut due = Vec::new();
        while let Some(action) = self.pop_due(now) {
            due.push(action);
        }
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}
