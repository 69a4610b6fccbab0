//! Exhaustive exactness checks against a real regex engine.
//!
//! The folded pattern is compiled as `^(?:pattern)$` with the `regex` crate
//! and compared against set membership over every string of a bounded
//! domain, so "matches exactly the input set" is verified by an independent
//! engine rather than by this crate's own inverse parser.

use proptest::prelude::*;
use regex::Regex;
use refold::fold;

/// Alphabet for exhaustive domain testing.
const ALPHABET: &[char] = &['a', 'b'];

/// Maximum string length for exhaustive enumeration.
/// Total strings: sum of ALPHABET.len()^i for i in 0..=EXHAUSTIVE_MAX_LEN
/// = 1 + 2 + 4 + 8 + 16 + 32 + 64 = 127 strings.
const EXHAUSTIVE_MAX_LEN: usize = 6;

/// Every string of length 0..=`max_len` over `alphabet`.
fn enumerate_domain(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut domain = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::with_capacity(frontier.len() * alphabet.len());
        for prefix in &frontier {
            for &c in alphabet {
                let mut s = prefix.clone();
                s.push(c);
                next.push(s);
            }
        }
        domain.extend(next.iter().cloned());
        frontier = next;
    }
    domain
}

fn compile_anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("generated pattern compiles")
}

/// Fold `words` and verify exact-match semantics over the whole domain.
fn assert_exact(words: &[String], domain: &[String]) {
    let pattern = fold(words).expect("valid word set folds");
    let re = compile_anchored(&pattern);
    for candidate in domain {
        let expected = words.iter().any(|w| w == candidate);
        assert_eq!(
            re.is_match(candidate),
            expected,
            "pattern {pattern:?} disagrees with the set on {candidate:?}"
        );
    }
}

#[test]
fn exhaustive_singletons_and_pairs() {
    let domain = enumerate_domain(ALPHABET, EXHAUSTIVE_MAX_LEN);
    let words = enumerate_domain(ALPHABET, 3);

    for w in &words {
        assert_exact(std::slice::from_ref(w), &domain);
    }
    for (i, a) in words.iter().enumerate() {
        for b in &words[i + 1..] {
            assert_exact(&[a.clone(), b.clone()], &domain);
        }
    }
}

#[test]
fn oracle_on_reference_sets() {
    let cases: &[&[&str]] = &[
        &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"],
        &["get", "set"],
        &["cat", "cats"],
        &["a", "ba"],
        &["do", "else", "elseif", "end", "for", "function", "if", "in"],
        &["clReleaseEvent", "clReleaseKernel", "clRetainEvent", "clRetainKernel"],
    ];

    for words in cases {
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        let pattern = fold(&words).unwrap();
        let re = compile_anchored(&pattern);

        for word in &words {
            assert!(re.is_match(word), "pattern {pattern:?} misses {word:?}");
            // Near misses must not match.
            let truncated = &word[..word.len().saturating_sub(1)];
            if !words.iter().any(|w| w == truncated) {
                assert!(!re.is_match(truncated));
            }
            let extended = format!("{word}x");
            if !words.iter().any(|w| w == &extended) {
                assert!(!re.is_match(&extended));
            }
        }
    }
}

proptest! {
    /// Random subsets of the bounded domain stay exact under the external
    /// engine.
    #[test]
    fn random_subsets_are_exact(
        words in prop::collection::btree_set("[ab]{0,4}", 1..8_usize)
    ) {
        let words: Vec<String> = words.into_iter().collect();
        let domain = enumerate_domain(ALPHABET, EXHAUSTIVE_MAX_LEN);
        let pattern = fold(&words).unwrap();
        let re = compile_anchored(&pattern);
        for candidate in &domain {
            prop_assert_eq!(
                re.is_match(candidate),
                words.iter().any(|w| w == candidate),
                "pattern {:?} disagrees on {:?}",
                pattern,
                candidate
            );
        }
    }
}
