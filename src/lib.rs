//! Exact regex-fragment synthesis for finite keyword sets.
//!
//! ## Scope
//! Given a finite set of literal keywords, [`fold`] produces the textually
//! shortest fragment it can find, in a restricted dialect (literals,
//! non-capturing groups, `|` alternation, optional `?`, character classes,
//! and the `\d` shorthand), that matches exactly that set. [`unfold`] parses
//! such a fragment back into its word set and serves as the correctness
//! oracle for the forward path.
//!
//! ## Key invariants
//! - The synthesized pattern matches every input word and nothing else:
//!   exactness is established at the automaton level (Hopcroft-minimal DFA),
//!   not by the text heuristics.
//! - Text minimization is best-effort: elimination order and distribution
//!   are greedy, so the output is short but not provably shortest.
//! - Output is deterministic: folding any permutation of the same word set
//!   yields byte-identical text.
//! - Each call owns all of its intermediate state; concurrent calls need no
//!   coordination.
//!
//! ## Pipeline flow
//! `words -> validate -> trie -> DFA -> prune dead states -> minimize ->
//! state elimination -> expression -> optimize/distribute -> pattern`
//!
//! ## Notable entry points
//! - [`fold`] / [`fold_with`] / [`fold_with_stats`]: the forward pipeline.
//! - [`unfold`]: the inverse parser.
//! - [`FoldOptions`]: case-insensitive mode and the distribution toggle.
//!
//! The fragment is meant for embedding: callers wrap it in their own group
//! if the surrounding context requires isolation from adjacent alternation.

mod api;
mod synth;
mod unfold;
mod words;

pub mod dfa;
pub mod expr;
pub mod trie;

pub use api::{FoldError, FoldOptions, FoldStats, UnfoldError, UnfoldErrorKind};
pub use unfold::unfold;
pub use words::{is_word_char, METACHARACTERS};

use dfa::Dfa;
use trie::Trie;

/// Folds a word set into a pattern fragment with default options.
pub fn fold<S: AsRef<str>>(words: &[S]) -> Result<String, FoldError> {
    fold_with(words, &FoldOptions::default())
}

/// Folds a word set into a pattern fragment.
pub fn fold_with<S: AsRef<str>>(words: &[S], options: &FoldOptions) -> Result<String, FoldError> {
    fold_with_stats(words, options).map(|(pattern, _)| pattern)
}

/// Folds a word set and reports pipeline size counters alongside the
/// pattern.
pub fn fold_with_stats<S: AsRef<str>>(
    words: &[S],
    options: &FoldOptions,
) -> Result<(String, FoldStats), FoldError> {
    let normalized = words::validate(words, options)?;

    let trie = Trie::build(&normalized, false);
    let mut dfa = Dfa::from_trie(&trie);
    dfa.remove_dead_states();
    if !dfa.has_accepting_state() {
        return Err(FoldError::Internal("initial state died during pruning"));
    }

    let minimized = dfa.minimize();
    let synthesis = synth::synthesize(&minimized)?;

    let expression = if options.distribute {
        expr::distribute(synthesis.expr)
    } else {
        synthesis.expr.optimize()
    };
    let pattern = expression.render();

    let stats = FoldStats {
        word_count: normalized.len(),
        trie_states: trie.node_count(),
        minimized_states: minimized.state_count(),
        trivial_splices: synthesis.trivial_splices,
        heuristic_eliminations: synthesis.heuristic_eliminations,
        pattern_len: pattern.len(),
    };
    Ok((pattern, stats))
}
