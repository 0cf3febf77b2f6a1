//! The `JumpList` sequence.
//!
//! A doubly-linked list with amortized O(1) append and near O(1) indexed
//! access. Index resolution starts from whichever of three places is
//! closest to the target and walks the remaining links:
//!
//! - the tail, when the last index is requested;
//! - the [jump table](jump_table), a node reference every `increment`
//!   positions;
//! - the [cursor](cursor), the node most recently reached by `get`.
//!
//! Every mutating operation edits the chain and then repairs the jump table
//! and cursor before returning, so both caches are exact at all times.
//!
//! # Operations
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `add`, `pop` | O(1) amortized |
//! | `get`, `get_mut` | O(increment / 2) worst case, O(1) near the cursor |
//! | `insert`, `remove` | lookup + O(size / increment) table repair |
//! | `split`, `merge` | O(moved elements) |
//! | `sort` | O(n log n), no per-element allocation |

mod chain;
mod cursor;
mod jump_table;
mod sort;

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use self::chain::{Chain, Idx, NULL};
use self::cursor::Cursor;
use self::jump_table::JumpTable;
use crate::compare::{ByOrdering, Comparator, NaturalOrder};
use crate::config::Config;
use crate::error::{ErrorHandler, ListError, default_handler, report};

/// Receives each element a list destroys on its own account.
pub type ReleaseHook<T> = Rc<dyn Fn(T)>;

/// A doubly-linked sequence with a jump table and cursor cache.
///
/// `C` orders elements for [`JumpList::sort`]; it defaults to the natural
/// `PartialOrd` ordering.
pub struct JumpList<T, C = NaturalOrder> {
    chain: Chain<T>,
    table: JumpTable,
    cursor: Cursor,
    size: usize,
    config: Config,
    comparator: C,
    handler: ErrorHandler,
    release: Option<ReleaseHook<T>>,
}

impl<T> JumpList<T, NaturalOrder> {
    /// Create an empty list with the default configuration.
    pub fn new() -> Self {
        Self::with_config_and_comparator(Config::default(), NaturalOrder)
    }

    /// Create an empty list with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_comparator(config, NaturalOrder)
    }
}

impl<T, C> JumpList<T, C> {
    /// Create an empty list that sorts with `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_config_and_comparator(Config::default(), comparator)
    }

    pub fn with_config_and_comparator(config: Config, comparator: C) -> Self {
        JumpList {
            chain: Chain::new(),
            table: JumpTable::new(config.increment(), config.initial_capacity()),
            cursor: Cursor::new(),
            size: 0,
            config,
            comparator,
            handler: default_handler(),
            release: None,
        }
    }

    /// An empty list sharing this list's configuration, comparator, handler
    /// and release hook.
    fn sibling(&self) -> Self
    where
        C: Clone,
    {
        let mut list = Self::with_config_and_comparator(self.config, self.comparator.clone());
        list.chain.set_limit(self.chain.limit());
        list.handler = self.handler.clone();
        list.release = self.release.clone();
        list
    }

    // --- Accessors ---

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Number of elements. Same as [`JumpList::len`].
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn first(&self) -> Option<&T> {
        self.value_of(self.chain.head)
    }

    pub fn last(&self) -> Option<&T> {
        self.value_of(self.chain.tail)
    }

    fn value_of(&self, node: Idx) -> Option<&T> {
        if node == NULL {
            None
        } else {
            Some(self.chain.value(node))
        }
    }

    // --- Error reporting ---

    /// Install a new error handler, returning the previous one.
    pub fn set_error_handler(&mut self, handler: ErrorHandler) -> ErrorHandler {
        std::mem::replace(&mut self.handler, handler)
    }

    pub fn error_handler(&self) -> ErrorHandler {
        self.handler.clone()
    }

    /// Install a hook that receives every element the list destroys on its
    /// own (on drop and [`JumpList::clear`]). Returns the previous hook.
    pub fn set_release_hook(&mut self, hook: Option<ReleaseHook<T>>) -> Option<ReleaseHook<T>> {
        std::mem::replace(&mut self.release, hook)
    }

    fn fail(&self, operation: &str, error: ListError) -> ListError {
        report(&self.handler, operation, error)
    }

    /// Report a failure that does not abort the current operation.
    fn note(&self, operation: &str, result: Result<(), ListError>) {
        if let Err(error) = result {
            self.fail(operation, error);
        }
    }

    fn check_index(&self, operation: &str, index: usize, bound: usize) -> Result<(), ListError> {
        if index >= bound {
            return Err(self.fail(
                operation,
                ListError::IndexOutOfRange {
                    index,
                    size: self.size,
                },
            ));
        }
        Ok(())
    }

    // --- Index resolution ---

    /// The node at `index`, which must be `< size`. Leaves the cursor alone.
    fn node_at(&self, index: usize) -> Idx {
        debug_assert!(index < self.size);
        if index == self.size - 1 {
            return self.chain.tail;
        }

        let (mut start, mut position) = self.table.nearest(index).unwrap_or((self.chain.head, 0));
        if let Some((node, at)) = self.cursor.get() {
            if index.abs_diff(at) < index.abs_diff(position) {
                start = node;
                position = at;
            }
        }

        self.chain.walk(start, index as isize - position as isize)
    }

    /// Value at `index` without touching the cursor or reporting errors.
    pub fn peek(&self, index: usize) -> Option<&T> {
        if index >= self.size {
            return None;
        }
        Some(self.chain.value(self.node_at(index)))
    }

    /// Value at `index`. The cursor moves to it.
    pub fn get(&mut self, index: usize) -> Result<&T, ListError> {
        self.check_index("get", index, self.size)?;
        let node = self.node_at(index);
        self.cursor.set(node, index);
        Ok(self.chain.value(node))
    }

    /// Mutable value at `index`. The cursor moves to it.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ListError> {
        self.check_index("get_mut", index, self.size)?;
        let node = self.node_at(index);
        self.cursor.set(node, index);
        Ok(self.chain.value_mut(node))
    }

    // --- Insertion ---

    /// Append `value`.
    pub fn add(&mut self, value: T) -> Result<(), ListError> {
        let node = self.chain.alloc(value).map_err(|e| self.fail("add", e))?;
        self.attach("add", self.size, node);
        Ok(())
    }

    /// Insert `value` so that it ends up at `index`; later elements shift up.
    /// `index == size` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), ListError> {
        self.check_index("insert", index, self.size + 1)?;
        let node = self.chain.alloc(value).map_err(|e| self.fail("insert", e))?;
        self.attach("insert", index, node);
        Ok(())
    }

    /// Link an allocated node at `index` and repair the table and cursor.
    fn attach(&mut self, operation: &str, index: usize, node: Idx) {
        let old_size = self.size;
        if old_size == 0 {
            self.chain.link_first(node);
        } else if index == old_size {
            self.chain.link_tail(node);
        } else if index == 0 {
            self.chain.link_head(node);
        } else {
            let at = self.node_at(index);
            self.chain.link_before(at, node);
        }

        let grown = self.table.on_insert(&self.chain, index, old_size);
        self.note(operation, grown);
        self.cursor.on_insert(index);
        self.size += 1;
    }

    /// Append without the fallible allocation path. Used where a panic on
    /// exhausted memory is the expected behaviour (`Extend`, `Clone`).
    fn push_unchecked(&mut self, value: T) {
        let node = self.chain.alloc_reserved(value);
        self.attach("add", self.size, node);
    }

    // --- Removal ---

    /// Remove and return the value at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T, ListError> {
        self.check_index("remove", index, self.size)?;
        let node = self.node_at(index);
        Ok(self.detach(node, index))
    }

    /// Remove and return the last value.
    pub fn pop(&mut self) -> Result<T, ListError> {
        if self.size == 0 {
            return Err(self.fail("pop", ListError::EmptySequence));
        }
        let tail = self.chain.tail;
        Ok(self.detach(tail, self.size - 1))
    }

    /// Unlink `node`, which sits at `index`, repair the caches and free it.
    fn detach(&mut self, node: Idx, index: usize) -> T {
        let old_size = self.size;
        self.cursor
            .on_remove(node, index, self.chain.next(node), self.chain.prev(node));
        self.table.on_remove(&self.chain, index, old_size);
        self.chain.unlink(node);
        self.size -= 1;
        self.chain.release(node)
    }

    /// Drop every element, passing each to the release hook if one is set.
    /// The jump table keeps its capacity.
    pub fn clear(&mut self) {
        self.release_all();
        self.chain.reset();
        self.table.clear();
        self.cursor.clear();
        self.size = 0;
    }

    fn release_all(&mut self) {
        if let Some(hook) = self.release.clone() {
            while let Some(value) = self.chain.pop_front() {
                hook(value);
            }
        }
    }

    // --- Split and merge ---

    /// Keep `[0, index)` in this list and return a new list holding
    /// `[index, size)`. Splitting at 0 leaves this list untouched and
    /// returns an empty list.
    ///
    /// Values move into the new list's own storage. The slots they leave
    /// behind stay allocated here and are reused by later inserts.
    pub fn split(&mut self, index: usize) -> Result<Self, ListError>
    where
        C: Clone,
    {
        self.check_index("split", index, self.size + 1)?;
        let mut rest = self.sibling();
        if index == 0 || index == self.size {
            return Ok(rest);
        }

        let moved = self.size - index;
        rest.chain
            .reserve(moved)
            .map_err(|e| self.fail("split", e))?;

        let start = self.node_at(index);
        self.cursor.on_truncate(index);
        self.table.truncate_from(index);
        self.chain.cut_before(start);
        self.size = index;

        let mut node = start;
        while node != NULL {
            let next = self.chain.next(node);
            let value = self.chain.release(node);
            let adopted = rest.chain.alloc_reserved(value);
            rest.chain.link_tail(adopted);
            node = next;
        }
        rest.size = moved;

        let head = rest.chain.head;
        let stamped = rest.table.restamp(&rest.chain, head, 0, moved, &mut rest.cursor);
        rest.note("split", stamped);
        Ok(rest)
    }

    /// Move every element of `other` to the end of this list, leaving
    /// `other` empty. Its jump table and cursor are discarded. If room for
    /// the moved elements cannot be allocated, both lists are left as they
    /// were.
    pub fn merge(&mut self, other: &mut Self) -> Result<(), ListError> {
        if other.size == 0 {
            return Ok(());
        }
        self.chain
            .reserve(other.size)
            .map_err(|e| self.fail("merge", e))?;

        let old_size = self.size;
        let mut first_moved = NULL;
        while let Some(value) = other.chain.pop_front() {
            let node = self.chain.alloc_reserved(value);
            self.chain.link_tail(node);
            if first_moved == NULL {
                first_moved = node;
            }
        }
        self.size += other.size;
        other.size = 0;
        other.chain.reset();
        other.table.clear();
        other.cursor.clear();

        // Repair from the first list's last boundary onward.
        let (start, position) = match old_size {
            0 => (self.chain.head, 0),
            _ => {
                let slot = (old_size - 1) / self.table.increment();
                match self.table.get(slot) {
                    NULL => (first_moved, old_size),
                    node => (node, slot * self.table.increment()),
                }
            }
        };
        let stamped = self
            .table
            .restamp(&self.chain, start, position, self.size, &mut self.cursor);
        self.note("merge", stamped);
        Ok(())
    }

    // --- Filtering ---

    /// A new list of clones of every element satisfying `predicate`, in
    /// order. This list is not modified.
    pub fn filter<P>(&self, mut predicate: P) -> Result<Self, ListError>
    where
        P: FnMut(&T) -> bool,
        T: Clone,
        C: Clone,
    {
        let mut selected = self.sibling();
        for value in self.iter() {
            if predicate(value) {
                let node = selected
                    .chain
                    .alloc(value.clone())
                    .map_err(|e| self.fail("where", e))?;
                selected.attach("where", selected.size, node);
            }
        }
        Ok(selected)
    }

    /// Move every element satisfying `predicate` into a new list. Both lists
    /// keep their relative order. Nothing moves unless room for every match
    /// was allocated first.
    pub fn split_where<P>(&mut self, mut predicate: P) -> Result<Self, ListError>
    where
        P: FnMut(&T) -> bool,
        C: Clone,
    {
        let mut matches: Vec<(Idx, usize)> = Vec::new();
        let mut node = self.chain.head;
        let mut index = 0usize;
        while node != NULL {
            if predicate(self.chain.value(node)) {
                matches
                    .try_reserve(1)
                    .map_err(|_| self.fail("split_where", ListError::AllocationFailure))?;
                matches.push((node, index));
            }
            node = self.chain.next(node);
            index += 1;
        }

        let mut selected = self.sibling();
        selected
            .chain
            .reserve(matches.len())
            .map_err(|e| self.fail("split_where", e))?;

        // Each earlier removal shifts the later matches down by one.
        for (removed, (node, index)) in matches.into_iter().enumerate() {
            let value = self.detach(node, index - removed);
            let adopted = selected.chain.alloc_reserved(value);
            selected.attach("split_where", selected.size, adopted);
        }
        Ok(selected)
    }

    // --- Sorting ---

    /// Stable in-place sort with the list's comparator.
    pub fn sort(&mut self)
    where
        C: Comparator<T>,
    {
        sort::merge_sort(&mut self.chain, &self.comparator);
        self.renumber("sort");
    }

    /// Stable in-place sort with a one-off ordering.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: Fn(&T, &T) -> Ordering,
    {
        sort::merge_sort(&mut self.chain, &ByOrdering(compare));
        self.renumber("sort_by");
    }

    /// Rebuild the whole jump table after the chain was reordered.
    fn renumber(&mut self, operation: &str) {
        if self.size == 0 {
            return;
        }
        self.table.clear();
        let head = self.chain.head;
        let stamped = self
            .table
            .restamp(&self.chain, head, 0, self.size, &mut self.cursor);
        self.note(operation, stamped);
        tracing::debug!(size = self.size, capacity = self.table.capacity(), "rebuilt jump table");
    }

    // --- Iteration ---

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: &self.chain,
            front: self.chain.head,
            back: self.chain.tail,
            remaining: self.size,
        }
    }

    // --- Diagnostics ---

    /// Current jump table capacity in slots.
    pub fn table_capacity(&self) -> usize {
        self.table.capacity()
    }

    /// The value recorded in jump table slot `slot`, if any.
    pub fn jump_value(&self, slot: usize) -> Option<&T> {
        self.value_of(self.table.get(slot))
    }

    /// Logical index of the cursor, if it is set.
    pub fn cursor_position(&self) -> Option<usize> {
        self.cursor.get().map(|(_, index)| index)
    }

    /// Walk the whole structure and panic if the chain, size, jump table or
    /// cursor disagree with each other. Jump table slots left empty by a
    /// failed table growth are accepted.
    pub fn check_invariants(&self) {
        self.verify(false);
    }

    /// Like [`JumpList::check_invariants`], but every slot covering a
    /// position inside the list must also be populated.
    pub fn check_invariants_strict(&self) {
        self.verify(true);
    }

    fn verify(&self, strict: bool) {
        let k = self.table.increment();
        let mut seen = FxHashSet::default();
        let mut boundaries = Vec::new();
        let mut cursor_found = false;

        let mut prev = NULL;
        let mut node = self.chain.head;
        let mut position = 0usize;
        while node != NULL {
            assert!(
                seen.insert(node),
                "INVARIANT VIOLATED: node {} reached twice, chain has a cycle",
                node
            );
            assert_eq!(
                self.chain.prev(node),
                prev,
                "INVARIANT VIOLATED: back link broken at position {}",
                position
            );
            if position % k == 0 {
                boundaries.push(node);
            }
            if let Some((cursor_node, cursor_index)) = self.cursor.get() {
                if cursor_node == node {
                    assert_eq!(
                        cursor_index, position,
                        "INVARIANT VIOLATED: cursor index {} but node sits at {}",
                        cursor_index, position
                    );
                    cursor_found = true;
                }
            }
            prev = node;
            node = self.chain.next(node);
            position += 1;
        }

        assert_eq!(
            position, self.size,
            "INVARIANT VIOLATED: {} reachable nodes != size {}",
            position, self.size
        );
        assert_eq!(self.chain.tail, prev, "INVARIANT VIOLATED: tail is not the last node");
        assert!(
            self.cursor.get().is_none() || cursor_found,
            "INVARIANT VIOLATED: cursor refers to a node outside the list"
        );

        for slot in 0..self.table.capacity() {
            let entry = self.table.get(slot);
            match boundaries.get(slot) {
                Some(&expected) => {
                    assert!(
                        entry == NULL || entry == expected,
                        "INVARIANT VIOLATED: jump table slot {} is stale",
                        slot
                    );
                    assert!(
                        !strict || entry != NULL,
                        "INVARIANT VIOLATED: jump table slot {} is missing",
                        slot
                    );
                }
                None => assert_eq!(
                    entry, NULL,
                    "INVARIANT VIOLATED: jump table slot {} set past the end",
                    slot
                ),
            }
        }
        assert!(
            !strict || boundaries.len() <= self.table.capacity(),
            "INVARIANT VIOLATED: {} boundaries but jump table holds {} slots",
            boundaries.len(),
            self.table.capacity()
        );
    }
}

/// Merge `second` into `first`, reporting a missing `first`.
///
/// Mirrors [`JumpList::merge`] for callers holding optional lists: an absent
/// `first` is a [`ListError::NullArgument`] (reported through `second`'s
/// handler, or the default one), and an absent or empty `second` is a no-op.
pub fn merge<T, C>(
    first: Option<&mut JumpList<T, C>>,
    second: Option<&mut JumpList<T, C>>,
) -> Result<(), ListError> {
    match (first, second) {
        (None, second) => {
            let handler = second.map_or_else(default_handler, |list| list.error_handler());
            Err(report(&handler, "merge", ListError::NullArgument))
        }
        (Some(_), None) => Ok(()),
        (Some(first), Some(second)) => first.merge(second),
    }
}

impl<T, C> Drop for JumpList<T, C> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<T> Default for JumpList<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Clone> Clone for JumpList<T, C> {
    fn clone(&self) -> Self {
        let mut list = self.sibling();
        for value in self.iter() {
            list.push_unchecked(value.clone());
        }
        list
    }
}

impl<T: fmt::Debug, C> fmt::Debug for JumpList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for JumpList<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for JumpList<T, C> {}

impl<T, C> Extend<T> for JumpList<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_unchecked(value);
        }
    }
}

impl<T> FromIterator<T> for JumpList<T, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = JumpList::new();
        list.extend(iter);
        list
    }
}

/// Borrowing iterator over a [`JumpList`], front to back.
pub struct Iter<'a, T> {
    chain: &'a Chain<T>,
    front: Idx,
    back: Idx,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front;
        self.front = self.chain.next(node);
        self.remaining -= 1;
        Some(self.chain.value(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back;
        self.back = self.chain.prev(node);
        self.remaining -= 1;
        Some(self.chain.value(node))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, C> IntoIterator for &'a JumpList<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`JumpList`], front to back.
pub struct IntoIter<T, C> {
    list: JumpList<T, C>,
}

impl<T, C> Iterator for IntoIter<T, C> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.list.chain.pop_front()?;
        self.list.size -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.size, Some(self.list.size))
    }
}

impl<T, C> ExactSizeIterator for IntoIter<T, C> {}

impl<T, C> IntoIterator for JumpList<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T, C>;

    fn into_iter(mut self) -> Self::IntoIter {
        // Values leave from the front without table upkeep.
        self.table.clear();
        self.cursor.clear();
        IntoIter { list: self }
    }
}
