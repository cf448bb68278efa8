//! Timer queue
//!
//! Delayed callbacks on a virtual clock. The host advances time; due
//! tasks come out ordered by due time, then by scheduling order.

use std::collections::BTreeMap;

/// Handle returned by `set_timeout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Virtual-clock timer queue
#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<(u64, u64), T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            pending: BTreeMap::new(),
        }
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn set_timeout(&mut self, delay_ms: u64, task: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert((self.now_ms.saturating_add(delay_ms), id), task);
        TimerId(id)
    }

    /// Pop the earliest task due at or before `deadline`, moving the
    /// clock to its due time.
    pub fn pop_due(&mut self, deadline: u64) -> Option<T> {
        let &(due, id) = self.pending.keys().next()?;
        if due > deadline {
            return None;
        }
        self.now_ms = self.now_ms.max(due);
        self.pending.remove(&(due, id))
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, time_ms: u64) {
        self.now_ms = self.now_ms.max(time_ms);
    }

    /// Time until the next timer fires
    pub fn time_until_next(&self) -> Option<u64> {
        self.pending
            .keys()
            .next()
            .map(|&(due, _)| due.saturating_sub(self.now_ms))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
