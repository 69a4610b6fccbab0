//! State elimination: minimized DFA to expression tree.
//!
//! Two fresh super-states bracket the automaton: `START` links to the initial
//! state and every accepting state links to `END`, all via empty literals.
//! Parallel transitions between the same pair of states collapse into one
//! edge labeled with an alternation of their symbols. The reduction loop then
//! splices out trivial single-in/single-out nodes, and when none remain,
//! eliminates the globally cheapest (node, out-edge) pair under the cost
//! estimate `sum(incoming label lengths) + in_degree * out-label length`,
//! until only a single `START -> END` edge is left.
//!
//! Nodes are visited in breadth-first order from `START` with ascending
//! target ids, and cost ties keep the first candidate in that order, so the
//! outcome never depends on map iteration order.
//!
//! A self-loop can only appear if the input automaton has a cycle, which a
//! finite word list can never produce; encountering one aborts with an
//! internal error instead of attempting Kleene-star support.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::api::FoldError;
use crate::dfa::Dfa;
use crate::expr::Expr;

const START: usize = 0;
const END: usize = 1;

/// Result of one elimination run, with counters for the fold report.
pub(crate) struct Synthesis {
    pub expr: Expr,
    pub trivial_splices: usize,
    pub heuristic_eliminations: usize,
}

struct Graph {
    /// Edge labels, `out[from][to]`.
    out: Vec<BTreeMap<usize, Expr>>,
    /// Edge sources, `inc[to]`; labels live in `out`.
    inc: Vec<BTreeSet<usize>>,
}

impl Graph {
    fn with_nodes(n: usize) -> Self {
        Self {
            out: vec![BTreeMap::new(); n],
            inc: vec![BTreeSet::new(); n],
        }
    }

    /// Adds an edge, merging with an existing parallel edge via alternation.
    fn link(&mut self, from: usize, to: usize, expr: Expr) {
        match self.out[from].remove(&to) {
            Some(existing) => {
                self.out[from].insert(to, Expr::Alternation(vec![expr, existing]));
            }
            None => {
                self.out[from].insert(to, expr);
            }
        }
        self.inc[to].insert(from);
    }

    fn unlink(&mut self, from: usize, to: usize) {
        self.out[from].remove(&to);
        self.inc[to].remove(&from);
    }

    /// Live nodes in breadth-first order from `START`.
    fn reachable(&self) -> Vec<usize> {
        let mut seen = vec![false; self.out.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([START]);
        seen[START] = true;
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &t in self.out[v].keys() {
                if !seen[t] {
                    seen[t] = true;
                    queue.push_back(t);
                }
            }
        }
        order
    }
}

pub(crate) fn synthesize(dfa: &Dfa) -> Result<Synthesis, FoldError> {
    let node = |s: usize| s + 2;
    let mut g = Graph::with_nodes(dfa.state_count() + 2);

    g.link(START, node(dfa.initial()), Expr::empty());
    for s in dfa.reachable_states() {
        if dfa.is_accepting(s) {
            g.link(node(s), END, Expr::empty());
        }

        let mut by_dest: BTreeMap<usize, Vec<char>> = BTreeMap::new();
        for (c, t) in dfa.transitions_from(s) {
            by_dest.entry(t).or_default().push(c);
        }
        for (t, symbols) in by_dest {
            let label = if symbols.len() == 1 {
                Expr::literal(symbols[0].to_string())
            } else {
                Expr::Alternation(symbols.iter().map(|c| Expr::literal(c.to_string())).collect())
            };
            g.link(node(s), node(t), label);
        }
    }

    let mut trivial_splices = 0;
    let mut heuristic_eliminations = 0;

    loop {
        let mut changed = false;
        for v in g.reachable() {
            if g.out[v].contains_key(&v) {
                return Err(FoldError::Internal("self-loop during state elimination"));
            }
            if v == START || v == END {
                continue;
            }
            if g.inc[v].len() == 1 && g.out[v].len() == 1 {
                let from = *g.inc[v].iter().next().expect("one predecessor");
                let (&to, out_label) = g.out[v].iter().next().expect("one successor");
                let out_label = out_label.clone();
                let in_label = g.out[from][&v].clone();
                g.unlink(from, v);
                g.unlink(v, to);
                g.link(from, to, Expr::Concatenation(vec![in_label, out_label]));
                trivial_splices += 1;
                changed = true;
            }
        }
        if changed {
            continue;
        }

        // No trivial splice left: flatten every remaining label so length
        // estimates are accurate, then take one out-edge away from the
        // cheapest branching node.
        let nodes = g.reachable();
        for &v in &nodes {
            for label in g.out[v].values_mut() {
                let owned = std::mem::replace(label, Expr::empty());
                *label = owned.optimize();
            }
        }

        let mut best: Option<(usize, usize, usize)> = None;
        for &v in &nodes {
            if v == START || v == END || g.inc[v].is_empty() || g.out[v].len() <= 1 {
                continue;
            }
            let in_total: usize = g.inc[v]
                .iter()
                .map(|&p| g.out[p][&v].rendered_len())
                .sum();
            for (&t, label) in &g.out[v] {
                let score = in_total + g.inc[v].len() * label.rendered_len();
                if best.map_or(true, |(s, _, _)| score < s) {
                    best = Some((score, v, t));
                }
            }
        }

        let Some((_, v, t)) = best else {
            break;
        };
        let out_label = g.out[v][&t].clone();
        let preds: Vec<usize> = g.inc[v].iter().copied().collect();
        for p in preds {
            let in_label = g.out[p][&v].clone();
            g.link(p, t, Expr::Concatenation(vec![in_label, out_label.clone()]));
        }
        g.unlink(v, t);
        heuristic_eliminations += 1;
    }

    if g.out[START].len() == 1 {
        if let Some(label) = g.out[START].get(&END) {
            return Ok(Synthesis {
                expr: label.clone(),
                trivial_splices,
                heuristic_eliminations,
            });
        }
    }
    Err(FoldError::Internal("state elimination did not converge"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Trie;

    fn synthesize_words(words: &[&str]) -> Synthesis {
        let trie = Trie::build(words, false);
        let mut dfa = Dfa::from_trie(&trie);
        dfa.remove_dead_states();
        let min = dfa.minimize();
        synthesize(&min).expect("synthesis succeeds on finite word sets")
    }

    fn pattern(words: &[&str]) -> String {
        synthesize_words(words).expr.optimize().render()
    }

    #[test]
    fn single_word_renders_verbatim() {
        assert_eq!(pattern(&["while"]), "while");
        assert_eq!(pattern(&[""]), "");
    }

    #[test]
    fn merged_branches_render_as_classes() {
        assert_eq!(pattern(&["a", "b", "c"]), "[abc]");
        assert_eq!(pattern(&["get", "set"]), "[gs]et");
    }

    #[test]
    fn optional_tail_renders_with_question_mark() {
        assert_eq!(pattern(&["cat", "cats"]), "cats?");
    }

    #[test]
    fn digit_set_renders_as_shorthand() {
        let digits = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        assert_eq!(pattern(&digits), "\\d");
    }

    #[test]
    fn splice_counters_track_reduction_work() {
        let synthesis = synthesize_words(&["cat", "cats"]);
        assert!(synthesis.trivial_splices > 0);

        // A branching middle state forces at least one heuristic elimination.
        let synthesis = synthesize_words(&["a", "ab", "b"]);
        assert!(synthesis.heuristic_eliminations > 0);
    }

    #[test]
    fn cyclic_automaton_is_an_internal_error() {
        let dfa = Dfa::from_parts(vec![(vec![('a', 0)], true)], 0);
        assert_eq!(
            synthesize(&dfa).err(),
            Some(FoldError::Internal("self-loop during state elimination"))
        );
    }
}
