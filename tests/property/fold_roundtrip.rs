//! Round-trip and determinism properties of the fold/unfold pair.

use proptest::prelude::*;
use refold::{fold, unfold};

/// Word shape used for random sets: short words over a small alphabet that
/// includes the tricky-in-class characters space, `_`, and `-`.
const WORD: &str = "[ab01_ -]{0,6}";

proptest! {
    /// `unfold(fold(W))`, as a set, is `W` — for any valid word set.
    #[test]
    fn fold_then_unfold_is_identity(
        words in prop::collection::btree_set(WORD, 1..12_usize)
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let pattern = fold(&words).expect("valid word set folds");

        let mut expected = words.clone();
        expected.sort();
        prop_assert_eq!(
            unfold(&pattern).expect("generated pattern unfolds"),
            expected,
            "pattern was {:?}",
            pattern
        );
    }

    /// Folding never depends on the order words arrive in.
    #[test]
    fn folding_is_order_independent(
        words in prop::collection::btree_set(WORD, 1..10_usize),
        rotation in 0_usize..10
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let reference = fold(&words).expect("valid word set folds");

        let mut shuffled = words.clone();
        let len = shuffled.len().max(1);
        shuffled.rotate_left(rotation % len);
        prop_assert_eq!(fold(&shuffled).unwrap(), reference.clone());

        shuffled.reverse();
        prop_assert_eq!(fold(&shuffled).unwrap(), reference);
    }

    /// Folding the unfolded set reproduces the pattern byte for byte: the
    /// pipeline is a canonical form for word sets.
    #[test]
    fn fold_is_canonical_over_round_trips(
        words in prop::collection::btree_set("[ab01]{1,6}", 1..10_usize)
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let pattern = fold(&words).expect("valid word set folds");
        let recovered = unfold(&pattern).expect("generated pattern unfolds");
        prop_assert_eq!(fold(&recovered).unwrap(), pattern);
    }

    /// The inverse parser returns a result or a structured error, never
    /// panics, on arbitrary printable input.
    #[test]
    fn unfold_never_panics(pattern in "[ -~]{0,12}") {
        let _ = unfold(&pattern);
    }
}
