//! Bounded snapshot history for rewind.

use std::collections::VecDeque;

use autodrone_core::Value;
use autodrone_world::WorldSnapshot;
use indexmap::IndexMap;

/// An atomic snapshot of VM and world state, captured before a tick
/// dispatches.
#[derive(Clone, Debug, PartialEq)]
pub struct VmSnapshot {
    /// Instruction pointer.
    pub(crate) ip: usize,
    /// Operand stack.
    pub(crate) stack: Vec<Value>,
    /// Instructions executed so far.
    pub(crate) instruction_count: u32,
    /// Per-site backward-jump counts for the loop budget.
    pub(crate) backjump_counts: IndexMap<usize, u32>,
    /// The world, deep-copied.
    pub(crate) world: WorldSnapshot,
}

/// A bounded buffer of [`VmSnapshot`]s.
///
/// Append-only during execution; at capacity the oldest snapshot is
/// trimmed from the front. Rewinding restores an entry near the tail
/// and truncates everything after it.
#[derive(Clone, Debug)]
pub struct HistoryRing {
    snaps: VecDeque<VmSnapshot>,
    capacity: usize,
}

impl HistoryRing {
    /// An empty ring holding at most `capacity` snapshots.
    pub fn new(capacity: usize) -> HistoryRing {
        HistoryRing {
            snaps: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Snapshots currently held.
    pub fn len(&self) -> usize {
        self.snaps.len()
    }

    /// Whether the ring is empty.
    pub fn is_empty(&self) -> bool {
        self.snaps.is_empty()
    }

    /// The configured bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a snapshot, trimming the oldest past capacity.
    pub fn push(&mut self, snap: VmSnapshot) {
        self.snaps.push_back(snap);
        while self.snaps.len() > self.capacity {
            self.snaps.pop_front();
        }
    }

    /// Take the snapshot `n` back from the tail (`n = 1` is the most
    /// recent) and drop everything after it. `None` when fewer than
    /// `n` snapshots are held or `n` is 0.
    pub(crate) fn rewind(&mut self, n: usize) -> Option<VmSnapshot> {
        if n == 0 || n > self.snaps.len() {
            return None;
        }
        let index = self.snaps.len() - n;
        let snap = self.snaps[index].clone();
        self.snaps.truncate(index + 1);
        Some(snap)
    }

    /// Drop all snapshots.
    pub fn clear(&mut self) {
        self.snaps.clear();
    }
}
