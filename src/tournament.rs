//! Lock-free concurrent tournament tree.
//!
//! A complete binary min-tournament over a fixed set of leaf slots: every
//! internal node holds the winner (smaller value) of its two children, so
//! the root is always the global minimum. All operations take `&self` and
//! synchronize through atomics, so the tree can be driven from many threads
//! at once with no locks.
//!
//! Each node packs a 32-bit value and a 32-bit version into one `AtomicU64`.
//! Versions come from a shared counter and make every write distinct, which
//! keeps the compare-and-swap loops safe from ABA reuse. A per-node dirty
//! flag lets the upward repair walk stop early once a node's value is
//! already current. Winner extraction descends from the root chasing the
//! winning value and restarts from the root when a concurrent writer moves
//! it; a lost extraction race reports the sentinel rather than a stale
//! value.
//!
//! Nodes are aligned to 128 bytes so neighbouring slots never share a cache
//! line.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use crate::error::{Error, Result};

#[repr(align(128))]
#[derive(Debug)]
struct Slot {
    cell: AtomicU64,
    dirty: AtomicBool,
}

impl Slot {
    fn new(packed: u64) -> Self {
        Self {
            cell: AtomicU64::new(packed),
            dirty: AtomicBool::new(false),
        }
    }
}

#[inline]
fn pack(value: u32, version: u32) -> u64 {
    (u64::from(value) << 32) | u64::from(version)
}

#[inline]
fn value_of(packed: u64) -> u32 {
    (packed >> 32) as u32
}

/// Concurrent min-tournament tree over `u32` values.
#[derive(Debug)]
pub struct LockFreeTournamentTree {
    slots: Box<[Slot]>,
    leaf_count: usize,
    first_leaf: usize,
    sentinel: u32,
    version: AtomicU32,
}

impl LockFreeTournamentTree {
    /// Tree with `capacity` leaf slots, all initially holding `sentinel`.
    ///
    /// The sentinel must be larger than every value that will be inserted;
    /// it doubles as the "empty slot" marker and the return value of
    /// operations that lose a race.
    pub fn new(capacity: usize, sentinel: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        let width = capacity.next_power_of_two();
        let total = 2 * width - 1;
        let slots: Vec<Slot> = (0..total).map(|_| Slot::new(pack(sentinel, 0))).collect();
        Ok(Self {
            slots: slots.into_boxed_slice(),
            leaf_count: capacity,
            first_leaf: width - 1,
            sentinel,
            version: AtomicU32::new(1),
        })
    }

    /// Number of leaf slots.
    pub fn capacity(&self) -> usize {
        self.leaf_count
    }

    /// Current winner, or the sentinel when the tree is empty.
    pub fn get_winner(&self) -> u32 {
        self.value_at(0)
    }

    /// True when every slot holds the sentinel.
    pub fn is_empty(&self) -> bool {
        self.value_at(0) == self.sentinel
    }

    /// Set the leaf at `index` to `value` and repair the root path.
    ///
    /// Inserting the sentinel clears the slot.
    pub fn insert(&self, index: usize, value: u32) -> Result<()> {
        if index >= self.leaf_count {
            return Err(Error::PositionOutOfBounds {
                pos: index,
                len: self.leaf_count,
            });
        }
        let leaf = self.first_leaf + index;
        let packed = pack(value, self.next_version());
        self.slots[leaf].cell.store(packed, Ordering::SeqCst);
        self.mark_path(leaf);
        self.repair_path(leaf);
        Ok(())
    }

    /// Swap the winner out for the sentinel and return it.
    ///
    /// Returns the sentinel when the tree is empty or when another thread
    /// claimed the same winner first.
    pub fn extract_winner(&self) -> u32 {
        self.take_winner(None)
    }

    /// Swap the winner out for `value` and return it.
    ///
    /// Returns the sentinel when the tree is empty or the race was lost,
    /// in which case `value` is not installed anywhere.
    pub fn replace_winner(&self, value: u32) -> u32 {
        self.take_winner(Some(value))
    }

    fn take_winner(&self, replacement: Option<u32>) -> u32 {
        let Some(leaf) = self.find_winner_leaf() else {
            return self.sentinel;
        };

        let cell = &self.slots[leaf].cell;
        let mut current = cell.load(Ordering::SeqCst);
        if value_of(current) == self.sentinel {
            // Another thread drained this slot between descent and claim.
            return self.sentinel;
        }
        let winner = value_of(current);
        let incoming = replacement.unwrap_or(self.sentinel);

        loop {
            let next = pack(incoming, self.next_version());
            match cell.compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => break,
                Err(observed) => {
                    if value_of(observed) != winner {
                        return self.sentinel;
                    }
                    current = observed;
                }
            }
        }

        self.mark_path(leaf);
        self.repair_path(leaf);
        winner
    }

    #[inline]
    fn value_at(&self, idx: usize) -> u32 {
        value_of(self.slots[idx].cell.load(Ordering::SeqCst))
    }

    #[inline]
    fn next_version(&self) -> u32 {
        self.version.fetch_add(1, Ordering::AcqRel)
    }

    /// Flag every node from `start` up to the root as needing repair.
    fn mark_path(&self, start: usize) {
        let mut current = start;
        while current > 0 {
            let parent = (current - 1) / 2;
            self.slots[parent].dirty.store(true, Ordering::SeqCst);
            current = parent;
        }
    }

    /// Walk from `start` toward the root, refreshing dirty nodes.
    ///
    /// Stops early when a node is clean or a refresh finds its value
    /// already correct, since every ancestor is then correct too.
    fn repair_path(&self, start: usize) {
        let mut current = start;
        while current > 0 {
            let parent = (current - 1) / 2;
            if !self.slots[parent].dirty.load(Ordering::SeqCst) {
                break;
            }
            if !self.refresh_node(parent) {
                break;
            }
            current = parent;
        }
        if self.first_leaf > 0 && self.slots[0].dirty.load(Ordering::SeqCst) {
            self.refresh_node(0);
        }
    }

    /// Recompute one internal node from its children. Returns true when
    /// the stored value changed.
    fn refresh_node(&self, idx: usize) -> bool {
        if idx >= self.first_leaf {
            return false;
        }
        let slot = &self.slots[idx];
        // Clear the flag before reading the children: a write that lands
        // after the clear re-marks this node, and a write that landed
        // before the clear is visible to the reads below, so no update
        // can be dropped between the two.
        slot.dirty.store(false, Ordering::SeqCst);
        loop {
            let left = self.value_at(2 * idx + 1);
            let right = self.value_at(2 * idx + 2);
            let winner = if left == self.sentinel {
                right
            } else if right == self.sentinel {
                left
            } else {
                left.min(right)
            };

            let current = slot.cell.load(Ordering::SeqCst);
            if value_of(current) == winner {
                return false;
            }
            let next = pack(winner, self.next_version());
            if slot
                .cell
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return true;
            }
            // Lost a race on this node; recompute from fresh children.
        }
    }

    /// Descend from the root chasing the winning value, restarting from
    /// the root whenever a concurrent writer invalidates the path.
    fn find_winner_leaf(&self) -> Option<usize> {
        'restart: loop {
            let winner = self.value_at(0);
            if winner == self.sentinel {
                return None;
            }
            let mut current = 0;
            while current < self.first_leaf {
                let left = 2 * current + 1;
                let right = left + 1;
                if self.value_at(left) == winner {
                    current = left;
                } else if self.value_at(right) == winner {
                    current = right;
                } else {
                    continue 'restart;
                }
            }
            return Some(current);
        }
    }
}
