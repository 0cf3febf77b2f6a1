//! Ordering strategies used by [`JumpList::sort`](crate::JumpList::sort).

use std::cmp::Ordering;

/// A strict "less than" over list values.
///
/// Must be a total order and stay consistent for the duration of one sort.
pub trait Comparator<T> {
    fn less(&self, a: &T, b: &T) -> bool;
}

/// Natural ordering through `PartialOrd`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: PartialOrd> Comparator<T> for NaturalOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Wraps a closure `Fn(&T, &T) -> bool` returning true when `a` sorts first.
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<T, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

/// Adapts a three-way `Ordering` function for one-off sorts.
pub(crate) struct ByOrdering<F>(pub F);

impl<T, F> Comparator<T> for ByOrdering<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b) == Ordering::Less
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural() {
        assert!(NaturalOrder.less(&1, &2));
        assert!(!NaturalOrder.less(&2, &2));
        assert!(!NaturalOrder.less(&3, &2));
    }

    #[test]
    fn closure() {
        let reverse = FnComparator(|a: &i32, b: &i32| a > b);
        assert!(reverse.less(&3, &2));
        assert!(!reverse.less(&2, &3));
    }

    #[test]
    fn by_ordering() {
        let by_len = ByOrdering(|a: &&str, b: &&str| a.len().cmp(&b.len()));
        assert!(by_len.less(&"a", &"bb"));
        assert!(!by_len.less(&"bb", &"cc"));
    }
}
