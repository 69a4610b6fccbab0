//! Deterministic automaton view of the trie, with dead-state pruning and
//! Hopcroft minimization.
//!
//! The automaton is *partial*: a missing transition means rejection, there is
//! no explicit sink state. That shapes two pieces of this module:
//!
//! - Dead-state detection prunes edges instead of states; the arena keeps
//!   unreferenced entries around and reachability decides what exists.
//! - The Hopcroft worklist is seeded with *both* halves of the initial
//!   partition. With a partial transition function `pred(F, c)` and
//!   `pred(Q\F, c)` are not complements, so the textbook `{F}` seeding can
//!   miss splits between states that differ through a missing edge (for
//!   `{"a","ba"}` it would merge the initial state with the state after
//!   `b`, manufacturing a cycle that the finite-language pipeline must never
//!   see). Seeding both blocks restores the refinement invariant: for any
//!   processed block `Y` split into `Y1`/`Y2`, `pred(Y,c)` is the disjoint
//!   union of `pred(Y1,c)` and `pred(Y2,c)`, so splitting by the part kept
//!   out of the worklist stays implied.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use ahash::{AHashMap, AHashSet};

use crate::trie::{Trie, ROOT};

/// Index of an automaton state.
pub type StateId = usize;

#[derive(Debug, Clone)]
struct State {
    out: BTreeMap<char, StateId>,
    accepting: bool,
}

/// A deterministic finite automaton over `char` symbols.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<State>,
    initial: StateId,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unknown,
    OnStack,
    Alive,
    Dead,
}

impl Dfa {
    /// Reinterprets a trie as a DFA: nodes become states, terminal nodes
    /// become accepting states. State ids equal trie node ids.
    pub fn from_trie(trie: &Trie) -> Self {
        let mut states = Vec::with_capacity(trie.node_count());
        for id in 0..trie.node_count() {
            states.push(State {
                out: trie.children(id).collect(),
                accepting: trie.is_word(id),
            });
        }
        Self {
            states,
            initial: ROOT,
        }
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Total states in the arena, reachable or not.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.states[state].accepting
    }

    pub fn transition(&self, state: StateId, symbol: char) -> Option<StateId> {
        self.states[state].out.get(&symbol).copied()
    }

    /// Out-edges of `state` in ascending symbol order.
    pub fn transitions_from(&self, state: StateId) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.states[state].out.iter().map(|(&c, &t)| (c, t))
    }

    /// Whether the automaton accepts `word`.
    pub fn accepts(&self, word: &str) -> bool {
        let mut state = self.initial;
        for ch in word.chars() {
            match self.transition(state, ch) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.states[state].accepting
    }

    /// States reachable from the initial state, in ascending id order.
    pub fn reachable_states(&self) -> Vec<StateId> {
        let mut seen = vec![false; self.states.len()];
        let mut queue = VecDeque::from([self.initial]);
        seen[self.initial] = true;
        while let Some(state) = queue.pop_front() {
            for (_, next) in self.transitions_from(state) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        (0..self.states.len()).filter(|&s| seen[s]).collect()
    }

    /// Whether any reachable state accepts.
    pub fn has_accepting_state(&self) -> bool {
        self.reachable_states()
            .into_iter()
            .any(|s| self.states[s].accepting)
    }

    /// Removes every edge leading into a dead state (one from which no
    /// accepting state is reachable).
    ///
    /// Runs an explicit depth-first traversal with tri-state marks instead of
    /// language recursion, so pathological inputs cannot exhaust the call
    /// stack. A state still being resolved (on the traversal stack) is
    /// indeterminate: edges into it are neither pruned nor counted as alive.
    /// If the initial state itself turns out dead the accepting set is
    /// cleared; the language is empty and the caller treats that as an
    /// internal invariant violation for non-empty input.
    pub fn remove_dead_states(&mut self) {
        struct Frame {
            state: StateId,
            via: Option<char>,
            edges: Vec<(char, StateId)>,
            next: usize,
            has_alive: bool,
            prune: Vec<char>,
        }

        let mut mark = vec![Mark::Unknown; self.states.len()];
        let mut stack = vec![Frame {
            state: self.initial,
            via: None,
            edges: self.transitions_from(self.initial).collect(),
            next: 0,
            has_alive: false,
            prune: Vec::new(),
        }];
        mark[self.initial] = Mark::OnStack;

        while !stack.is_empty() {
            let top = stack.len() - 1;
            if stack[top].next < stack[top].edges.len() {
                let (ch, child) = stack[top].edges[stack[top].next];
                stack[top].next += 1;
                match mark[child] {
                    Mark::Unknown => {
                        mark[child] = Mark::OnStack;
                        let edges: Vec<(char, StateId)> = self.transitions_from(child).collect();
                        stack.push(Frame {
                            state: child,
                            via: Some(ch),
                            edges,
                            next: 0,
                            has_alive: false,
                            prune: Vec::new(),
                        });
                    }
                    Mark::Alive => stack[top].has_alive = true,
                    Mark::Dead => stack[top].prune.push(ch),
                    Mark::OnStack => {}
                }
            } else {
                let frame = stack.pop().expect("frame present");
                for ch in &frame.prune {
                    self.states[frame.state].out.remove(ch);
                }
                let alive = self.states[frame.state].accepting || frame.has_alive;
                mark[frame.state] = if alive { Mark::Alive } else { Mark::Dead };
                if let (Some(parent), Some(via)) = (stack.last_mut(), frame.via) {
                    if alive {
                        parent.has_alive = true;
                    } else {
                        parent.prune.push(via);
                    }
                }
            }
        }

        if mark[self.initial] == Mark::Dead {
            for state in &mut self.states {
                state.accepting = false;
            }
        }
    }

    /// Returns a language-equivalent DFA with the minimal number of states,
    /// via Hopcroft partition refinement over Myhill-Nerode equivalence.
    ///
    /// The result is canonical: blocks are renumbered by their smallest
    /// original state id, so the output never depends on hash-map iteration
    /// order.
    pub fn minimize(&self) -> Dfa {
        let reachable = self.reachable_states();

        // One traversal collects the alphabet and the in-transition index.
        let mut alphabet: BTreeSet<char> = BTreeSet::new();
        let mut in_trans: AHashMap<(StateId, char), Vec<StateId>> = AHashMap::new();
        for &s in &reachable {
            for (c, t) in self.transitions_from(s) {
                alphabet.insert(c);
                in_trans.entry((t, c)).or_default().push(s);
            }
        }

        // Initial partition: accepting vs non-accepting, both seeded into the
        // worklist (see the module docs for why both).
        let accepting: Vec<StateId> = reachable
            .iter()
            .copied()
            .filter(|&s| self.states[s].accepting)
            .collect();
        let rejecting: Vec<StateId> = reachable
            .iter()
            .copied()
            .filter(|&s| !self.states[s].accepting)
            .collect();

        let mut blocks: Vec<Vec<StateId>> = Vec::new();
        for block in [accepting, rejecting] {
            if !block.is_empty() {
                blocks.push(block);
            }
        }

        let mut worklist: VecDeque<usize> = (0..blocks.len()).collect();
        let mut queued: Vec<bool> = vec![true; blocks.len()];

        while let Some(a) = worklist.pop_front() {
            queued[a] = false;
            // The splitter may itself be split while we iterate the alphabet;
            // keep using the block as it was when dequeued.
            let splitter = blocks[a].clone();

            for &c in &alphabet {
                let mut x: AHashSet<StateId> = AHashSet::new();
                for &s in &splitter {
                    if let Some(preds) = in_trans.get(&(s, c)) {
                        x.extend(preds.iter().copied());
                    }
                }
                if x.is_empty() {
                    continue;
                }

                let existing = blocks.len();
                for y in 0..existing {
                    let (inter, diff): (Vec<StateId>, Vec<StateId>) =
                        blocks[y].iter().copied().partition(|s| x.contains(s));
                    if inter.is_empty() || diff.is_empty() {
                        continue;
                    }
                    blocks[y] = inter;
                    let fresh = blocks.len();
                    blocks.push(diff);

                    if queued[y] {
                        // Both halves stay in the worklist; index `y` now
                        // denotes the intersection half.
                        queued.push(true);
                        worklist.push_back(fresh);
                    } else if blocks[y].len() < blocks[fresh].len() {
                        queued[y] = true;
                        queued.push(false);
                        worklist.push_back(y);
                    } else {
                        queued.push(true);
                        worklist.push_back(fresh);
                    }
                }
            }
        }

        // Canonical order, then rebuild transitions off block representatives.
        let mut order: Vec<usize> = (0..blocks.len()).collect();
        order.sort_by_key(|&b| blocks[b][0]);
        let mut rank = vec![0usize; blocks.len()];
        for (new_id, &b) in order.iter().enumerate() {
            rank[b] = new_id;
        }

        let mut block_of: AHashMap<StateId, usize> = AHashMap::new();
        for (b, members) in blocks.iter().enumerate() {
            for &s in members {
                block_of.insert(s, b);
            }
        }

        let mut states = Vec::with_capacity(blocks.len());
        for &b in &order {
            let rep = blocks[b][0];
            let out = self.states[rep]
                .out
                .iter()
                .map(|(&c, &t)| (c, rank[block_of[&t]]))
                .collect();
            states.push(State {
                out,
                accepting: self.states[rep].accepting,
            });
        }

        Dfa {
            states,
            initial: rank[block_of[&self.initial]],
        }
    }

    /// Builds an automaton directly from `(out-edges, accepting)` state
    /// descriptions. Only tests use this; the pipeline always goes through
    /// [`Dfa::from_trie`].
    #[cfg(test)]
    pub(crate) fn from_parts(parts: Vec<(Vec<(char, StateId)>, bool)>, initial: StateId) -> Self {
        let states = parts
            .into_iter()
            .map(|(out, accepting)| State {
                out: out.into_iter().collect(),
                accepting,
            })
            .collect();
        Self { states, initial }
    }

    /// Enumerates the accepted language in sorted order. Intended for tests
    /// on the acyclic automata this crate builds; traversal depth is capped
    /// at the state count, which bounds word length in any acyclic DFA.
    pub fn words(&self) -> Vec<String> {
        let cap = self.states.len();
        let mut out = Vec::new();
        let mut path = String::new();
        self.collect_words(self.initial, cap, &mut path, &mut out);
        out.sort();
        out
    }

    fn collect_words(&self, state: StateId, depth: usize, path: &mut String, out: &mut Vec<String>) {
        if self.states[state].accepting {
            out.push(path.clone());
        }
        if depth == 0 {
            return;
        }
        for (c, t) in self.transitions_from(state) {
            path.push(c);
            self.collect_words(t, depth - 1, path, out);
            path.pop();
        }
    }
}
