// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A hashed, single-level time wheel with O(1) insert/delete.
//!
//! Ported from the original's `node/tw/timewheel.go`: `S` slots advanced one
//! per tick of `Δ` seconds; an entry scheduled further out than one
//! revolution records how many extra revolutions (`circle`) it must wait
//! through before it is due. The wheel itself is a pure data structure —
//! it does not own a ticker or a thread; callers drive it by calling
//! [`TimeWheel::trigger`] once per tick (see `tw-engine`'s control loop).

use crate::job::JobId;
use std::collections::{HashMap, VecDeque};

/// Default number of slots (one hour of one-second ticks).
pub const DEFAULT_SLOT_NUM: usize = 3600;

/// Default tick interval, in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

struct Entry {
    id: JobId,
    circle: u64,
}

/// Where an id currently sits in the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelPosition {
    pub slot: usize,
    pub circle: u64,
}

pub struct TimeWheel {
    interval_secs: u64,
    slot_num: usize,
    slots: Vec<VecDeque<Entry>>,
    index: HashMap<JobId, usize>,
    cursor: usize,
}

impl TimeWheel {
    /// Construct a wheel with `slot_num` slots and tick interval
    /// `interval_secs` seconds. Both must be non-zero.
    ///
    /// # Panics
    /// Panics if `interval_secs == 0` or `slot_num == 0` — these are
    /// configuration errors caught at startup, not runtime conditions.
    pub fn new(interval_secs: u64, slot_num: usize) -> Self {
        assert!(interval_secs > 0, "time wheel interval must be non-zero");
        assert!(slot_num > 0, "time wheel slot_num must be non-zero");
        Self {
            interval_secs,
            slot_num,
            slots: (0..slot_num).map(|_| VecDeque::new()).collect(),
            index: HashMap::new(),
            cursor: 0,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn slot_num(&self) -> usize {
        self.slot_num
    }

    /// Insert `id`, due in `delay_secs` seconds from now. Delays shorter
    /// than one tick are clamped up to one tick. O(1).
    pub fn insert(&mut self, delay_secs: u64, id: JobId) {
        let delay_secs = delay_secs.max(self.interval_secs);
        let ticks = delay_secs / self.interval_secs;
        let slot = (self.cursor + ticks as usize) % self.slot_num;
        let circle = ticks / self.slot_num as u64;

        self.slots[slot].push_back(Entry { id, circle });
        self.index.insert(id, slot);
    }

    /// Remove `id` if present. Returns whether anything was removed.
    /// O(bucket length).
    pub fn delete(&mut self, id: JobId) -> bool {
        let Some(slot) = self.index.remove(&id) else {
            return false;
        };
        let bucket = &mut self.slots[slot];
        if let Some(pos) = bucket.iter().position(|e| e.id == id) {
            bucket.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether `id` is currently scheduled.
    pub fn check(&self, id: JobId) -> bool {
        self.index.contains_key(&id)
    }

    /// Current `(slot, circle)` for `id`, if scheduled.
    pub fn get(&self, id: JobId) -> Option<WheelPosition> {
        let slot = *self.index.get(&id)?;
        let circle = self.slots[slot].iter().find(|e| e.id == id)?.circle;
        Some(WheelPosition { slot, circle })
    }

    /// Advance one tick: decrement `circle` for every entry still waiting
    /// its turn, and emit (removing) every entry whose `circle` has reached
    /// zero. Emission order within the slot equals insertion order.
    pub fn trigger(&mut self) -> Vec<JobId> {
        let mut emitted = Vec::new();
        let bucket = std::mem::take(&mut self.slots[self.cursor]);
        let mut remaining = VecDeque::with_capacity(bucket.len());

        for mut entry in bucket {
            if entry.circle > 0 {
                entry.circle -= 1;
                remaining.push_back(entry);
            } else {
                self.index.remove(&entry.id);
                emitted.push(entry.id);
            }
        }

        self.slots[self.cursor] = remaining;
        self.cursor = (self.cursor + 1) % self.slot_num;
        emitted
    }
}

#[cfg(test)]
#[path = "time_wheel_tests.rs"]
mod tests;
