//! Jump Table
//!
//! A sparse index of node references, one every `increment` logical
//! positions. Slot `s` refers to the node at position `s * increment`, which
//! bounds the walk needed to reach any index to half an increment.
//!
//! ```text
//! slot:       0                 1                 2
//!             |                 |                 |
//! position:   0 -> 1 -> ... -> 1000 -> ... ->    2000 -> ... -> 2417 (tail)
//! ```
//!
//! # Slot Semantics
//!
//! - `slots.len()` is the table capacity; unused slots hold `NULL`.
//! - A slot inside the valid range `0..=(size - 1) / increment` either holds
//!   the exact node at its position or `NULL` (only if growing the table
//!   failed). Slots past the valid range are always `NULL`, never stale.
//! - Growth doubles the capacity and copies the slots; existing entries are
//!   untouched.
//!
//! # Maintenance
//!
//! - `record_append`: a new tail landed on a slot boundary.
//! - `on_remove`: entries at or after the removed position advance one node.
//! - `on_insert`: entries at or after the inserted position step back one node.
//! - `truncate_from`: a suffix of the list left (split).
//! - `restamp`: walk the chain and rewrite every boundary (merge, sort).

use smallvec::SmallVec;
use tracing::debug;

use super::chain::{Chain, Idx, NULL};
use super::cursor::Cursor;
use crate::config::INITIAL_TABLE_CAPACITY;
use crate::error::ListError;

pub(crate) struct JumpTable {
    slots: SmallVec<[Idx; INITIAL_TABLE_CAPACITY]>,
    increment: usize,
}

impl JumpTable {
    pub(crate) fn new(increment: usize, capacity: usize) -> Self {
        JumpTable {
            slots: SmallVec::from_elem(NULL, capacity.max(1)),
            increment: increment.max(1),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn increment(&self) -> usize {
        self.increment
    }

    /// The node recorded at `slot`, or `NULL`.
    #[inline]
    pub(crate) fn get(&self, slot: usize) -> Idx {
        self.slots.get(slot).copied().unwrap_or(NULL)
    }

    /// Record `node` at `slot`. Slots past the capacity are dropped silently;
    /// callers grow first when they need the entry.
    #[inline]
    fn set(&mut self, slot: usize, node: Idx) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = node;
        }
    }

    /// Make sure `slot` exists, doubling the capacity as many times as needed.
    pub(crate) fn reserve_slot(&mut self, slot: usize) -> Result<(), ListError> {
        let capacity = self.slots.len();
        if slot < capacity {
            return Ok(());
        }
        let mut target = capacity;
        while target <= slot {
            target = target.checked_mul(2).ok_or(ListError::AllocationFailure)?;
        }
        self.slots
            .try_reserve_exact(target - capacity)
            .map_err(|_| ListError::AllocationFailure)?;
        self.slots.resize(target, NULL);
        debug!(from = capacity, to = target, "grew jump table");
        Ok(())
    }

    /// Drop slots past `capacity`, as if growing the table had failed.
    #[cfg(test)]
    pub(crate) fn shrink_to(&mut self, capacity: usize) {
        self.slots.truncate(capacity.max(1));
    }

    /// Forget every entry, keeping the capacity.
    pub(crate) fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = NULL;
        }
    }

    // --- Index resolution ---

    /// Pick the recorded node closest to `index`, with its position.
    ///
    /// Candidates are the slot at or below `index` and the slot just above
    /// it. The upper slot wins only when strictly closer. A missing lower
    /// slot falls back to the nearest populated slot beneath it. Returns
    /// `None` if nothing at or below `index` is recorded.
    pub(crate) fn nearest(&self, index: usize) -> Option<(Idx, usize)> {
        let lower = index / self.increment;

        let mut best = None;
        let mut slot = lower.min(self.slots.len() - 1);
        loop {
            let node = self.slots[slot];
            if node != NULL {
                best = Some((node, slot * self.increment));
                break;
            }
            if slot == 0 {
                break;
            }
            slot -= 1;
        }

        let upper = lower + 1;
        let node = self.get(upper);
        if node != NULL {
            let position = upper * self.increment;
            let upper_distance = position - index;
            let closer = match best {
                Some((_, at)) => upper_distance < index - at,
                None => true,
            };
            if closer {
                best = Some((node, position));
            }
        }

        best
    }

    // --- Maintenance ---

    /// A node was appended at `position` (the list's old size). Records it
    /// when the position falls on a slot boundary, growing the table first.
    pub(crate) fn record_append(&mut self, position: usize, node: Idx) -> Result<(), ListError> {
        if position % self.increment != 0 {
            return Ok(());
        }
        let slot = position / self.increment;
        self.reserve_slot(slot)?;
        self.set(slot, node);
        Ok(())
    }

    /// The node at `index` is about to be removed from a list of `old_size`
    /// elements. Every entry at or after `index` advances to its successor;
    /// the last entry is dropped instead if the old tail sat on a boundary.
    ///
    /// Must run before the node is released; stepping through the removed
    /// node itself is allowed.
    pub(crate) fn on_remove<T>(&mut self, chain: &Chain<T>, index: usize, old_size: usize) {
        let k = self.increment;
        let last = (old_size - 1) / k;

        for slot in index / k..last {
            if index <= slot * k {
                self.advance(chain, slot);
            }
        }

        if (old_size - 1) % k == 0 {
            self.set(last, NULL);
        } else if index <= last * k {
            self.advance(chain, last);
        }
    }

    fn advance<T>(&mut self, chain: &Chain<T>, slot: usize) {
        let node = self.get(slot);
        if node != NULL {
            self.set(slot, chain.next(node));
        }
    }

    /// A node was just linked in at `index` of a list that held `old_size`
    /// elements. Every entry at or after `index` steps back to its
    /// predecessor, and a new trailing entry is recorded if the grown list
    /// now reaches a fresh boundary.
    pub(crate) fn on_insert<T>(
        &mut self,
        chain: &Chain<T>,
        index: usize,
        old_size: usize,
    ) -> Result<(), ListError> {
        let k = self.increment;
        if old_size > 0 {
            let last = (old_size - 1) / k;
            for slot in index / k..=last {
                if index <= slot * k {
                    let node = self.get(slot);
                    if node != NULL {
                        self.set(slot, chain.prev(node));
                    }
                }
            }
        }
        self.record_append(old_size, chain.tail)
    }

    /// Drop every entry at position `index` or later.
    pub(crate) fn truncate_from(&mut self, index: usize) {
        let first = index.div_ceil(self.increment);
        for slot in self.slots.iter_mut().skip(first) {
            *slot = NULL;
        }
    }

    /// Walk forward from `node`, which sits at `position`, to the end of the
    /// chain, recording every boundary on the way. The table is grown up
    /// front to cover `size` elements; if that fails the walk still runs and
    /// fills what fits. The cursor learns its node's new position if the walk
    /// passes it.
    pub(crate) fn restamp<T>(
        &mut self,
        chain: &Chain<T>,
        mut node: Idx,
        mut position: usize,
        size: usize,
        cursor: &mut Cursor,
    ) -> Result<(), ListError> {
        let grown = match size {
            0 => Ok(()),
            _ => self.reserve_slot((size - 1) / self.increment),
        };

        while node != NULL {
            cursor.relocate(node, position);
            if position % self.increment == 0 {
                self.set(position / self.increment, node);
            }
            node = chain.next(node);
            position += 1;
        }

        grown
    }
}
