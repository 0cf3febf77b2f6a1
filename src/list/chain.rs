//! Node Chain
//!
//! The doubly-linked chain every list is built on. Nodes live in an arena
//! (`Vec<Node<T>>`) and refer to each other by `u32` index rather than by
//! pointer, so the jump table and cursor are plain index caches that can never
//! dangle. Vacated slots go on a free list and are reused by later allocations.
//!
//! ```text
//! head                                   tail
//!  |                                       |
//!  v                                       v
//! [3] <-> [0] <-> [4] <-> [1] <-> [2] <-> [5]     (arena indices, list order)
//! ```
//!
//! The chain only knows about links. Sizes, the jump table and the cursor are
//! kept by the owning list.

use crate::error::ListError;

/// Node index type. u32 saves space vs usize on 64-bit.
pub(crate) type Idx = u32;

/// Null index marker.
pub(crate) const NULL: Idx = Idx::MAX;

/// Most nodes an arena can hold: every index below `NULL`.
const MAX_NODES: usize = NULL as usize;

/// Index for the next node pushed onto an arena of `len` nodes, if one is left.
fn fresh_index(len: usize) -> Option<Idx> {
    Idx::try_from(len).ok().filter(|&idx| idx != NULL)
}

struct Node<T> {
    /// `None` only while the slot sits on the free list.
    value: Option<T>,
    next: Idx,
    prev: Idx,
}

pub(crate) struct Chain<T> {
    nodes: Vec<Node<T>>,
    free_list: Vec<Idx>,
    /// Cap on `nodes.len()`, checked by `reserve`.
    limit: usize,
    pub(crate) head: Idx,
    pub(crate) tail: Idx,
}

impl<T> Chain<T> {
    pub(crate) fn new() -> Self {
        Chain {
            nodes: Vec::new(),
            free_list: Vec::new(),
            limit: MAX_NODES,
            head: NULL,
            tail: NULL,
        }
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit
    }

    /// Cap the number of nodes this arena may grow to.
    pub(crate) fn set_limit(&mut self, limit: usize) {
        self.limit = limit.min(MAX_NODES);
    }

    #[cfg(test)]
    pub(crate) fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn free_len(&self) -> usize {
        self.free_list.len()
    }

    // --- Node access helpers ---

    #[inline]
    fn node(&self, idx: Idx) -> &Node<T> {
        &self.nodes[idx as usize]
    }

    #[inline]
    fn node_mut(&mut self, idx: Idx) -> &mut Node<T> {
        &mut self.nodes[idx as usize]
    }

    #[inline]
    pub(crate) fn next(&self, idx: Idx) -> Idx {
        self.node(idx).next
    }

    #[inline]
    pub(crate) fn prev(&self, idx: Idx) -> Idx {
        self.node(idx).prev
    }

    #[inline]
    pub(crate) fn set_next(&mut self, idx: Idx, next: Idx) {
        self.node_mut(idx).next = next;
    }

    #[inline]
    pub(crate) fn value(&self, idx: Idx) -> &T {
        self.node(idx).value.as_ref().expect("linked node holds a value")
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, idx: Idx) -> &mut T {
        self.node_mut(idx).value.as_mut().expect("linked node holds a value")
    }

    // --- Allocation ---

    /// Make room for `additional` fresh nodes without aborting on failure.
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), ListError> {
        let fresh = additional.saturating_sub(self.free_list.len());
        if self.nodes.len().saturating_add(fresh) > self.limit {
            return Err(ListError::AllocationFailure);
        }
        self.nodes
            .try_reserve(fresh)
            .map_err(|_| ListError::AllocationFailure)
    }

    /// Allocate an unlinked node, reporting allocation failure instead of
    /// aborting. On failure the value is dropped and the chain is untouched.
    pub(crate) fn alloc(&mut self, value: T) -> Result<Idx, ListError> {
        if self.free_list.is_empty() {
            self.reserve(1)?;
        }
        Ok(self.alloc_reserved(value))
    }

    /// Allocate an unlinked node into space obtained through [`Chain::reserve`].
    pub(crate) fn alloc_reserved(&mut self, value: T) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            let node = self.node_mut(idx);
            node.value = Some(value);
            node.next = NULL;
            node.prev = NULL;
            idx
        } else {
            let idx = fresh_index(self.nodes.len()).expect("node arena is full");
            self.nodes.push(Node {
                value: Some(value),
                next: NULL,
                prev: NULL,
            });
            idx
        }
    }

    /// Free an unlinked node and hand back its value.
    pub(crate) fn release(&mut self, idx: Idx) -> T {
        let node = self.node_mut(idx);
        let value = node.value.take().expect("released node holds a value");
        node.next = NULL;
        node.prev = NULL;
        self.free_list.push(idx);
        value
    }

    /// Forget every node. Values still in the arena are dropped.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = NULL;
        self.tail = NULL;
    }

    // --- Linking ---

    /// Link `node` as the only element of an empty chain.
    pub(crate) fn link_first(&mut self, node: Idx) {
        debug_assert!(self.head == NULL && self.tail == NULL);
        let n = self.node_mut(node);
        n.prev = NULL;
        n.next = NULL;
        self.head = node;
        self.tail = node;
    }

    /// Link `node` in front of the current head.
    pub(crate) fn link_head(&mut self, node: Idx) {
        if self.head == NULL {
            return self.link_first(node);
        }
        let old_head = self.head;
        let n = self.node_mut(node);
        n.next = old_head;
        n.prev = NULL;
        self.node_mut(old_head).prev = node;
        self.head = node;
    }

    /// Link `node` after the current tail.
    pub(crate) fn link_tail(&mut self, node: Idx) {
        if self.tail == NULL {
            return self.link_first(node);
        }
        let old_tail = self.tail;
        let n = self.node_mut(node);
        n.prev = old_tail;
        n.next = NULL;
        self.node_mut(old_tail).next = node;
        self.tail = node;
    }

    /// Link `node` directly before `at`, which must not be the head.
    pub(crate) fn link_before(&mut self, at: Idx, node: Idx) {
        let before = self.prev(at);
        debug_assert!(before != NULL, "link_before on head, use link_head");
        let n = self.node_mut(node);
        n.prev = before;
        n.next = at;
        self.node_mut(before).next = node;
        self.node_mut(at).prev = node;
    }

    /// Detach `node` from its neighbours. The node's own links are left as
    /// they were so callers can still step from it until it is released.
    pub(crate) fn unlink(&mut self, node: Idx) {
        let prev = self.prev(node);
        let next = self.next(node);
        if prev == NULL {
            self.head = next;
        } else {
            self.node_mut(prev).next = next;
        }
        if next == NULL {
            self.tail = prev;
        } else {
            self.node_mut(next).prev = prev;
        }
    }

    /// Cut the chain so that `node` becomes the first node of a detached run.
    /// Everything before `node` stays in the chain.
    pub(crate) fn cut_before(&mut self, node: Idx) {
        let prev = self.prev(node);
        if prev == NULL {
            self.head = NULL;
            self.tail = NULL;
        } else {
            self.node_mut(prev).next = NULL;
            self.tail = prev;
        }
        self.node_mut(node).prev = NULL;
    }

    /// Append `node` to a run being assembled by hand, tracked through
    /// `head` and `tail`. Only the backward link is finalized here; the
    /// run's last `next` must be terminated by the caller.
    pub(crate) fn append_to_run(&mut self, head: &mut Idx, tail: &mut Idx, node: Idx) {
        if *tail == NULL {
            self.node_mut(node).prev = NULL;
            *head = node;
        } else {
            self.node_mut(*tail).next = node;
            self.node_mut(node).prev = *tail;
        }
        *tail = node;
    }

    /// Step `delta` links from `from`: forward when positive, backward when
    /// negative.
    pub(crate) fn walk(&self, from: Idx, delta: isize) -> Idx {
        let mut node = from;
        if delta >= 0 {
            for _ in 0..delta {
                node = self.next(node);
            }
        } else {
            for _ in 0..delta.unsigned_abs() {
                node = self.prev(node);
            }
        }
        node
    }

    /// Unlink and free the head node.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.head == NULL {
            return None;
        }
        let node = self.head;
        self.unlink(node);
        Some(self.release(node))
    }
}
