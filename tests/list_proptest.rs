//! Property-based tests: random operation sequences checked against a `Vec`
//! model, with structural invariants verified after every step.

use proptest::prelude::*;

use jumplist::{Config, JumpList};

// =============================================================================
// Test helpers
// =============================================================================

/// A random list operation. Positions are percentages so they stay valid as
/// the list grows and shrinks.
#[derive(Clone, Debug)]
enum Op {
    Add(u16),
    Insert { pos_pct: f64, value: u16 },
    Remove { pos_pct: f64 },
    Pop,
    Get { pos_pct: f64 },
    Sort,
    SplitMerge { pos_pct: f64 },
    SplitWhereMerge { modulus: u16 },
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u16>().prop_map(Op::Add),
        3 => (0.0..=1.0f64, any::<u16>()).prop_map(|(pos_pct, value)| Op::Insert { pos_pct, value }),
        2 => (0.0..=1.0f64).prop_map(|pos_pct| Op::Remove { pos_pct }),
        1 => Just(Op::Pop),
        3 => (0.0..=1.0f64).prop_map(|pos_pct| Op::Get { pos_pct }),
        1 => Just(Op::Sort),
        1 => (0.0..=1.0f64).prop_map(|pos_pct| Op::SplitMerge { pos_pct }),
        1 => (2..5u16).prop_map(|modulus| Op::SplitWhereMerge { modulus }),
    ]
}

fn scaled(pos_pct: f64, len: usize) -> usize {
    ((pos_pct * len as f64) as usize).min(len)
}

fn apply(list: &mut JumpList<u16>, model: &mut Vec<u16>, op: &Op) {
    match op {
        Op::Add(value) => {
            list.add(*value).unwrap();
            model.push(*value);
        }
        Op::Insert { pos_pct, value } => {
            let index = scaled(*pos_pct, model.len());
            list.insert(index, *value).unwrap();
            model.insert(index, *value);
        }
        Op::Remove { pos_pct } => {
            if model.is_empty() {
                assert!(list.remove(0).is_err());
                return;
            }
            let index = scaled(*pos_pct, model.len() - 1);
            assert_eq!(list.remove(index), Ok(model.remove(index)));
        }
        Op::Pop => {
            assert_eq!(list.pop().ok(), model.pop());
        }
        Op::Get { pos_pct } => {
            if model.is_empty() {
                assert!(list.get(0).is_err());
                return;
            }
            let index = scaled(*pos_pct, model.len() - 1);
            assert_eq!(list.get(index).ok(), model.get(index));
        }
        Op::Sort => {
            list.sort();
            model.sort();
        }
        Op::SplitMerge { pos_pct } => {
            let index = scaled(*pos_pct, model.len());
            let mut tail = list.split(index).unwrap();
            assert_eq!(list.len() + tail.len(), model.len());
            tail.check_invariants_strict();
            list.merge(&mut tail).unwrap();
        }
        Op::SplitWhereMerge { modulus } => {
            let modulus = *modulus;
            let mut picked = list.split_where(|v| v % modulus == 0).unwrap();
            picked.check_invariants_strict();
            list.check_invariants_strict();
            list.merge(&mut picked).unwrap();
            let (mut keep, moved): (Vec<u16>, Vec<u16>) =
                model.iter().partition(|v| **v % modulus != 0);
            keep.extend(moved);
            *model = keep;
        }
    }
}

fn small_config() -> Config {
    // A tiny increment puts table boundaries everywhere.
    Config::new().with_increment(4).with_initial_capacity(1)
}

// =============================================================================
// Model equivalence
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any sequence of operations leaves the list equal to the model and all
    /// caches exact.
    #[test]
    fn matches_vec_model(ops in prop::collection::vec(arbitrary_op(), 1..120)) {
        let mut list = JumpList::with_config(small_config());
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut list, &mut model, op);
            list.check_invariants_strict();
        }
        let contents: Vec<u16> = list.iter().copied().collect();
        prop_assert_eq!(contents, model);
    }

    /// Every index resolves to the same value through the jump table, the
    /// cursor, or a linear walk.
    #[test]
    fn get_agrees_with_linear_walk(
        values in prop::collection::vec(any::<u16>(), 1..300),
        probes in prop::collection::vec(0.0..=1.0f64, 1..50),
    ) {
        let mut list = JumpList::with_config(small_config());
        list.extend(values.iter().copied());
        for pct in probes {
            let index = scaled(pct, values.len() - 1);
            prop_assert_eq!(list.get(index).ok(), values.get(index));
            for (i, value) in values.iter().enumerate() {
                prop_assert_eq!(list.peek(i), Some(value));
            }
        }
    }

    /// Sorting is stable, idempotent, and matches `slice::sort`.
    #[test]
    fn sort_matches_std(values in prop::collection::vec(0..50u16, 0..400)) {
        let mut list = JumpList::with_config(small_config());
        list.extend(values.iter().copied());
        list.sort();
        let mut expected = values.clone();
        expected.sort();
        let once: Vec<u16> = list.iter().copied().collect();
        prop_assert_eq!(&once, &expected);
        list.sort();
        let twice: Vec<u16> = list.iter().copied().collect();
        prop_assert_eq!(once, twice);
        list.check_invariants_strict();
    }

    /// Splitting anywhere and merging back restores the original sequence.
    #[test]
    fn split_merge_round_trip(
        values in prop::collection::vec(any::<u16>(), 0..300),
        pct in 0.0..=1.0f64,
    ) {
        let mut list = JumpList::with_config(small_config());
        list.extend(values.iter().copied());
        let index = scaled(pct, values.len());
        let mut tail = list.split(index).unwrap();
        list.merge(&mut tail).unwrap();
        list.check_invariants_strict();
        let contents: Vec<u16> = list.iter().copied().collect();
        prop_assert_eq!(contents, values);
    }
}
