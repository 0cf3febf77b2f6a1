//! In-place merge sort over the chain.
//!
//! Bottom-up and iterative: each pass walks the chain once, merging adjacent
//! runs of length `run` into runs of length `2 * run` by relinking nodes. No
//! values move and the only extra state is a handful of indices. The pass
//! that performs a single merge produced the sorted chain, and only then are
//! the chain's `head` and `tail` replaced.
//!
//! Stable: when two values compare equal the one from the earlier run is
//! taken first, since the later run only wins on a strict `less`.

use tracing::trace;

use super::chain::{Chain, Idx, NULL};
use crate::compare::Comparator;

pub(crate) fn merge_sort<T, C>(chain: &mut Chain<T>, comparator: &C)
where
    C: Comparator<T> + ?Sized,
{
    if chain.head == NULL {
        return;
    }

    let mut run = 1usize;
    let mut start = chain.head;

    loop {
        let mut head: Idx = NULL;
        let mut tail: Idx = NULL;
        let mut merges = 0usize;
        let mut first = start;

        while first != NULL {
            merges += 1;

            let mut second = first;
            let mut first_len = 0usize;
            while first_len < run && second != NULL {
                second = chain.next(second);
                first_len += 1;
            }
            let mut second_len = run;

            while first_len > 0 || (second_len > 0 && second != NULL) {
                let take_second = if first_len == 0 {
                    true
                } else if second_len == 0 || second == NULL {
                    false
                } else {
                    comparator.less(chain.value(second), chain.value(first))
                };

                let node = if take_second {
                    let node = second;
                    second = chain.next(node);
                    second_len -= 1;
                    node
                } else {
                    let node = first;
                    first = chain.next(node);
                    first_len -= 1;
                    node
                };
                chain.append_to_run(&mut head, &mut tail, node);
            }

            first = second;
        }
        chain.set_next(tail, NULL);

        if merges <= 1 {
            chain.head = head;
            chain.tail = tail;
            return;
        }

        trace!(run, merges, "merge sort pass");
        run *= 2;
        start = head;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{FnComparator, NaturalOrder};

    fn chain_of<T>(values: Vec<T>) -> Chain<T> {
        let mut chain = Chain::new();
        for v in values {
            let idx = chain.alloc(v).unwrap();
            chain.link_tail(idx);
        }
        chain
    }

    fn forward<T: Clone>(chain: &Chain<T>) -> Vec<T> {
        let mut out = Vec::new();
        let mut idx = chain.head;
        while idx != NULL {
            out.push(chain.value(idx).clone());
            idx = chain.next(idx);
        }
        out
    }

    fn backward<T: Clone>(chain: &Chain<T>) -> Vec<T> {
        let mut out = Vec::new();
        let mut idx = chain.tail;
        while idx != NULL {
            out.push(chain.value(idx).clone());
            idx = chain.prev(idx);
        }
        out.reverse();
        out
    }

    #[test]
    fn empty_and_single() {
        let mut chain: Chain<i32> = Chain::new();
        merge_sort(&mut chain, &NaturalOrder);
        assert_eq!(chain.head, NULL);

        let mut chain = chain_of(vec![1]);
        merge_sort(&mut chain, &NaturalOrder);
        assert_eq!(forward(&chain), vec![1]);
        assert_eq!(chain.head, chain.tail);
    }

    #[test]
    fn reversed_input() {
        let mut chain = chain_of((0..100).rev().collect());
        merge_sort(&mut chain, &NaturalOrder);
        let expected: Vec<i32> = (0..100).collect();
        assert_eq!(forward(&chain), expected);
        assert_eq!(backward(&chain), expected);
    }

    #[test]
    fn odd_length_with_duplicates() {
        let values = vec![5, 3, 9, 3, 1, 5, 0, 7, 3];
        let mut chain = chain_of(values.clone());
        merge_sort(&mut chain, &NaturalOrder);
        let mut expected = values;
        expected.sort();
        assert_eq!(forward(&chain), expected);
        assert_eq!(backward(&chain), expected);
    }

    #[test]
    fn stable_on_ties() {
        // Sort by key only; payload records the original order.
        let values: Vec<(u8, usize)> = [2u8, 1, 2, 0, 1, 2, 0]
            .iter()
            .enumerate()
            .map(|(i, &k)| (k, i))
            .collect();
        let mut chain = chain_of(values.clone());
        merge_sort(&mut chain, &FnComparator(|a: &(u8, usize), b: &(u8, usize)| a.0 < b.0));

        let mut expected = values;
        expected.sort_by_key(|&(k, _)| k);
        assert_eq!(forward(&chain), expected);
    }

    #[test]
    fn custom_descending() {
        let mut chain = chain_of(vec![3, 1, 4, 1, 5, 9, 2, 6]);
        merge_sort(&mut chain, &FnComparator(|a: &i32, b: &i32| a > b));
        assert_eq!(forward(&chain), vec![9, 6, 5, 4, 3, 2, 1, 1]);
    }
}
