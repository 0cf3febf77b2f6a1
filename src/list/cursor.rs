//! Cursor Cache
//!
//! Remembers the node most recently reached by `get` together with its
//! logical index. Access patterns have strong locality: a scan touches
//! `i, i+1, i+2, ...` and a walk back touches `i, i-1, ...`, so starting from
//! the cached node turns those lookups into a single link step.
//!
//! Mutating operations keep the cache honest: inserts and removals ahead of
//! the cursor shift its index, removing the cursor node itself moves the
//! cursor to a neighbour, and anything that cannot cheaply prove the new
//! position clears it.

use super::chain::{Idx, NULL};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cursor {
    /// `NULL` when the cache is empty.
    node: Idx,
    index: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    pub(crate) fn new() -> Cursor {
        Cursor { node: NULL, index: 0 }
    }

    #[inline]
    pub(crate) fn get(&self) -> Option<(Idx, usize)> {
        if self.node == NULL {
            None
        } else {
            Some((self.node, self.index))
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, node: Idx, index: usize) {
        self.node = node;
        self.index = index;
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        *self = Cursor::new();
    }

    /// A node was linked in at `index`; everything at or after it moved up.
    pub(crate) fn on_insert(&mut self, index: usize) {
        if self.node != NULL && self.index >= index {
            self.index += 1;
        }
    }

    /// `node` at `index` is about to be unlinked. `next` and `prev` are its
    /// neighbours before the unlink.
    pub(crate) fn on_remove(&mut self, node: Idx, index: usize, next: Idx, prev: Idx) {
        if self.node == NULL {
            return;
        }
        if self.node == node {
            if next != NULL {
                // The successor slides into the vacated index.
                self.node = next;
            } else if prev != NULL {
                self.node = prev;
                self.index -= 1;
            } else {
                self.clear();
            }
        } else if index < self.index {
            self.index -= 1;
        }
    }

    /// Everything from `index` on left the list.
    pub(crate) fn on_truncate(&mut self, index: usize) {
        if self.node != NULL && self.index >= index {
            self.clear();
        }
    }

    /// Called for every node visited while renumbering the chain.
    #[inline]
    pub(crate) fn relocate(&mut self, node: Idx, index: usize) {
        if self.node == node {
            self.index = index;
        }
    }
}
