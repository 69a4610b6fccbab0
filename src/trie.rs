//! Prefix trie over keyword characters.
//!
//! The trie doubles as the unminimized acyclic automaton: every node is a
//! state, edges are characters, and terminal nodes are accepting. Nodes live
//! in an index-based arena owned by the [`Trie`]; child maps are ordered so
//! every traversal is deterministic.
//!
//! Word enumeration can be memoized per node, but only after the trie has
//! been explicitly frozen with [`Trie::freeze`]. The cache is owned by this
//! trie alone and never outlives the fold call that built it.

use std::collections::BTreeMap;

/// Index of a trie node within its arena.
pub type NodeId = usize;

#[derive(Debug)]
struct Node {
    /// Character on the edge from the parent; `None` for the root.
    ch: Option<char>,
    parent: Option<NodeId>,
    children: BTreeMap<char, NodeId>,
    is_word: bool,
    /// Words encoded in this subtree, counting this node's own word.
    word_count: usize,
    cached_suffixes: Option<Vec<String>>,
}

impl Node {
    fn new(ch: Option<char>, parent: Option<NodeId>) -> Self {
        Self {
            ch,
            parent,
            children: BTreeMap::new(),
            is_word: false,
            word_count: 0,
            cached_suffixes: None,
        }
    }
}

/// An arena-backed prefix tree.
#[derive(Debug)]
pub struct Trie {
    nodes: Vec<Node>,
    reversed: bool,
    frozen: bool,
}

/// Root node id; the arena always stores the root first.
pub const ROOT: NodeId = 0;

impl Trie {
    /// Builds a trie over `words`. With `reversed` set, each word is inserted
    /// in reversed character order, turning the structure into a suffix tree
    /// of the original words; enumeration still yields words in their
    /// original orientation.
    pub fn build<S: AsRef<str>>(words: &[S], reversed: bool) -> Self {
        let mut trie = Self {
            nodes: vec![Node::new(None, None)],
            reversed,
            frozen: false,
        };
        for word in words {
            trie.insert(word.as_ref());
        }
        trie
    }

    fn insert(&mut self, word: &str) {
        let mut node = ROOT;
        self.nodes[node].word_count += 1;

        let chars: Vec<char> = if self.reversed {
            word.chars().rev().collect()
        } else {
            word.chars().collect()
        };
        for ch in chars {
            let next = self.nodes[node].children.get(&ch).copied();
            let next = match next {
                Some(id) => id,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Node::new(Some(ch), Some(node)));
                    self.nodes[node].children.insert(ch, id);
                    id
                }
            };
            node = next;
            self.nodes[node].word_count += 1;
        }

        debug_assert!(
            !self.nodes[node].is_word,
            "duplicate insertion; the validator screens duplicates first"
        );
        self.nodes[node].is_word = true;
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether this trie stores words in reversed orientation.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Whether the node's path spells a complete word.
    pub fn is_word(&self, id: NodeId) -> bool {
        self.nodes[id].is_word
    }

    /// Number of words encoded in the subtree at `id` (including `id` itself).
    pub fn word_count(&self, id: NodeId) -> usize {
        self.nodes[id].word_count
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id].children.len()
    }

    /// Child edges of `id` in ascending character order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (char, NodeId)> + '_ {
        self.nodes[id].children.iter().map(|(&c, &n)| (c, n))
    }

    /// Walks `prefix` (in stored orientation) from `from` and returns the
    /// node reached, or `None` if some edge is missing.
    pub fn child(&self, from: NodeId, prefix: &str) -> Option<NodeId> {
        let mut node = from;
        for ch in prefix.chars() {
            node = *self.nodes[node].children.get(&ch)?;
        }
        Some(node)
    }

    /// Whether `word` (in original orientation) is in the trie.
    pub fn contains(&self, word: &str) -> bool {
        let stored: String = if self.reversed {
            word.chars().rev().collect()
        } else {
            word.to_owned()
        };
        self.child(ROOT, &stored).is_some_and(|id| self.nodes[id].is_word)
    }

    /// Marks the trie immutable from here on, enabling per-node memoization
    /// of word enumeration. There is no way back; inserting after freezing is
    /// not supported.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// The characters from the root to `id`, in original word orientation.
    pub fn path(&self, id: NodeId) -> String {
        // Collected bottom-up, so the natural order is node-to-root. A
        // forward trie needs the reversal; a reversed trie is already in
        // original orientation.
        let mut chars = Vec::new();
        let mut node = id;
        while let Some(ch) = self.nodes[node].ch {
            chars.push(ch);
            node = self.nodes[node].parent.expect("non-root node has a parent");
        }
        if !self.reversed {
            chars.reverse();
        }
        chars.into_iter().collect()
    }

    /// Every word in the subtree at `id`, relative to `id` (the node's own
    /// path is not included). Results are memoized once the trie is frozen.
    pub fn suffixes(&mut self, id: NodeId) -> Vec<String> {
        if let Some(cached) = &self.nodes[id].cached_suffixes {
            return cached.clone();
        }

        let words = self.collect_suffixes(id);
        if self.frozen {
            self.nodes[id].cached_suffixes = Some(words.clone());
        }
        words
    }

    fn collect_suffixes(&mut self, id: NodeId) -> Vec<String> {
        let mut words = Vec::new();
        if self.nodes[id].is_word {
            words.push(String::new());
        }

        let children: Vec<(char, NodeId)> = self.children(id).collect();
        for (ch, child) in children {
            for sub in self.suffixes(child) {
                words.push(self.join(ch, &sub));
            }
        }
        words
    }

    /// Every complete word whose path passes through `id`: the node's path
    /// concatenated with each suffix below it.
    pub fn words_under(&mut self, id: NodeId) -> Vec<String> {
        let path = self.path(id);
        self.suffixes(id)
            .into_iter()
            .map(|suffix| {
                if self.reversed {
                    format!("{suffix}{path}")
                } else {
                    format!("{path}{suffix}")
                }
            })
            .collect()
    }

    /// Words in the subtree at `id` (relative to `id`) that do *not* continue
    /// with `prefix`. For a forward trie `prefix` is consumed front-to-back;
    /// for a reversed trie it is an original-orientation suffix consumed from
    /// its end. Retained as an analysis utility for prefix factoring; the
    /// automaton pipeline does not use it.
    pub fn words_without_prefix(&self, id: NodeId, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            // Every word continues with the empty prefix.
            return Vec::new();
        }

        let mut words = Vec::new();
        if self.nodes[id].is_word {
            words.push(String::new());
        }

        let chars: Vec<char> = prefix.chars().collect();
        let (head, rest) = if self.reversed {
            let (rest, last) = chars.split_at(chars.len() - 1);
            (last[0], rest.iter().collect::<String>())
        } else {
            (chars[0], chars[1..].iter().collect::<String>())
        };

        for (ch, child) in self.children(id) {
            let child_words = if ch == head {
                self.words_without_prefix(child, &rest)
            } else {
                self.all_suffixes_uncached(child)
            };
            for sub in child_words {
                words.push(self.join(ch, &sub));
            }
        }
        words
    }

    fn all_suffixes_uncached(&self, id: NodeId) -> Vec<String> {
        let mut words = Vec::new();
        if self.nodes[id].is_word {
            words.push(String::new());
        }
        for (ch, child) in self.children(id) {
            for sub in self.all_suffixes_uncached(child) {
                words.push(self.join(ch, &sub));
            }
        }
        words
    }

    #[inline]
    fn join(&self, ch: char, sub: &str) -> String {
        if self.reversed {
            format!("{sub}{ch}")
        } else {
            format!("{ch}{sub}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn builds_counts_and_terminals() {
        let trie = Trie::build(&["get", "set", "go"], false);
        assert_eq!(trie.word_count(ROOT), 3);

        let g = trie.child(ROOT, "g").unwrap();
        assert_eq!(trie.word_count(g), 2);
        assert_eq!(trie.child_count(g), 2);
        assert!(!trie.is_word(g));

        let get = trie.child(ROOT, "get").unwrap();
        assert!(trie.is_word(get));
        assert_eq!(trie.word_count(get), 1);
    }

    #[test]
    fn contains_and_missing_prefixes() {
        let trie = Trie::build(&["cat", "cats"], false);
        assert!(trie.contains("cat"));
        assert!(trie.contains("cats"));
        assert!(!trie.contains("ca"));
        assert!(trie.child(ROOT, "dog").is_none());
    }

    #[test]
    fn empty_word_marks_root() {
        let trie = Trie::build(&["", "a"], false);
        assert!(trie.is_word(ROOT));
        assert_eq!(trie.word_count(ROOT), 2);
    }

    #[test]
    fn words_under_includes_path() {
        let mut trie = Trie::build(&["get", "gets", "go", "set"], false);
        let ge = trie.child(ROOT, "ge").unwrap();
        assert_eq!(sorted(trie.words_under(ge)), vec!["get", "gets"]);
        assert_eq!(sorted(trie.suffixes(ge)), vec!["t", "ts"]);
        assert_eq!(
            sorted(trie.words_under(ROOT)),
            vec!["get", "gets", "go", "set"]
        );
    }

    #[test]
    fn frozen_enumeration_is_cached_and_consistent() {
        let mut trie = Trie::build(&["ab", "ac", "b"], false);
        trie.freeze();
        let first = trie.suffixes(ROOT);
        let second = trie.suffixes(ROOT);
        assert_eq!(first, second);
        assert_eq!(sorted(first), vec!["ab", "ac", "b"]);
    }

    #[test]
    fn words_without_prefix_splits_the_subtree() {
        let trie = Trie::build(&["pre_a", "pre_b", "other"], false);
        assert_eq!(
            sorted(trie.words_without_prefix(ROOT, "pre_")),
            vec!["other"]
        );
        // Non-matching prefix keeps everything.
        assert_eq!(
            sorted(trie.words_without_prefix(ROOT, "zzz")),
            vec!["other", "pre_a", "pre_b"]
        );
        // The empty prefix matches every word.
        assert!(trie.words_without_prefix(ROOT, "").is_empty());
    }

    #[test]
    fn reversed_trie_answers_suffix_queries() {
        let mut trie = Trie::build(&["get", "set", "go"], true);
        assert!(trie.is_reversed());
        // Stored orientation is reversed, so shared suffixes share prefixes.
        let t = trie.child(ROOT, "te").unwrap();
        assert_eq!(sorted(trie.words_under(t)), vec!["get", "set"]);
        assert!(trie.contains("go"));
        assert_eq!(sorted(trie.words_under(ROOT)), vec!["get", "go", "set"]);
    }

    #[test]
    fn reversed_words_without_prefix() {
        let trie = Trie::build(&["tearing", "wearing", "ring"], true);
        // Every word ends with "ring"; only "ring" itself lacks the longer
        // suffix "earing".
        assert!(trie.words_without_prefix(ROOT, "ring").is_empty());
        assert_eq!(
            sorted(trie.words_without_prefix(ROOT, "earing")),
            vec!["ring"]
        );
    }
}
