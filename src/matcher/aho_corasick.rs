// WHY: One linear pass over the text finds all occurrences of all patterns,
// including overlapping ones, at amortized O(1) state work per byte

use std::collections::VecDeque;

use tracing::{debug, info};

use super::Match;

const ALPHABET_SIZE: usize = 256;

/// Confidence reported for every automaton-sourced match. The automaton does
/// not carry per-pattern confidence.
const AUTOMATON_CONFIDENCE: f32 = 0.9;

/// A trie node in the arena. `children[b]` is the index of the child state
/// reached on byte `b`, or -1 when no edge exists. `outputs` holds every
/// `(pattern_id, pattern_len)` recognized at this state, including those
/// inherited through failure links once `build` has run.
struct Node {
    children: [i32; ALPHABET_SIZE],
    fail: u32,
    outputs: Vec<(usize, usize)>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: [-1; ALPHABET_SIZE],
            fail: 0,
            outputs: Vec::new(),
        }
    }
}

/// Multi-pattern matcher built from a trie of registered patterns plus
/// failure links computed breadth-first.
///
/// Nodes live in a single arena (`Vec<Node>`) and reference each other by
/// integer index, never by address, so the structure is relocatable. Node 0
/// is the root.
///
/// `search` before `build` returns an empty result rather than an error;
/// the built flag is not checked per byte so the hot loop stays free of
/// state checks. Use [`AhoCorasickAutomaton::is_built`] when the
/// precondition needs to be observable.
pub struct AhoCorasickAutomaton {
    nodes: Vec<Node>,
    built: bool,
}

impl AhoCorasickAutomaton {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            built: false,
        }
    }

    /// Insert a pattern into the trie. Empty patterns are ignored. Any
    /// insertion invalidates a previous `build`.
    pub fn add_pattern(&mut self, pattern: &str, id: usize) {
        if pattern.is_empty() {
            return;
        }

        let mut node = 0usize;
        for &b in pattern.as_bytes() {
            let c = b as usize;
            if self.nodes[node].children[c] == -1 {
                let next = self.nodes.len() as i32;
                self.nodes[node].children[c] = next;
                self.nodes.push(Node::new());
            }
            node = self.nodes[node].children[c] as usize;
        }

        self.nodes[node].outputs.push((id, pattern.len()));
        self.built = false;
    }

    /// Compute failure links and output closures breadth-first from the
    /// root. Idempotent until the next `add_pattern`.
    ///
    /// Invariant after build: every node's output set contains all outputs
    /// reachable by following its fail chain, so `search` never walks fail
    /// links to collect outputs.
    pub fn build(&mut self) {
        if self.built {
            return;
        }

        let mut queue = VecDeque::new();

        for c in 0..ALPHABET_SIZE {
            let child = self.nodes[0].children[c];
            if child != -1 {
                self.nodes[child as usize].fail = 0;
                queue.push_back(child as usize);
            }
        }

        while let Some(curr) = queue.pop_front() {
            for c in 0..ALPHABET_SIZE {
                let child = self.nodes[curr].children[c];
                if child == -1 {
                    continue;
                }
                let child = child as usize;

                // Parent's fail chain is final here: BFS order guarantees
                // shallower nodes are resolved before deeper ones.
                let mut fail = self.nodes[curr].fail as usize;
                while fail != 0 && self.nodes[fail].children[c] == -1 {
                    fail = self.nodes[fail].fail as usize;
                }

                let target = self.nodes[fail].children[c];
                let fail_state = if target != -1 && target as usize != child {
                    target as usize
                } else {
                    0
                };
                self.nodes[child].fail = fail_state as u32;

                let inherited = self.nodes[fail_state].outputs.clone();
                self.nodes[child].outputs.extend(inherited);

                queue.push_back(child);
            }
        }

        self.built = true;
        info!(nodes = self.nodes.len(), "automaton built");
    }

    /// Single linear pass over `text`, emitting a match for every output of
    /// every state visited. Returns an empty vec before `build`.
    pub fn search(&self, text: &str) -> Vec<Match> {
        let mut matches = Vec::new();

        if !self.built || text.is_empty() {
            return matches;
        }

        let mut state = 0usize;
        for (i, &b) in text.as_bytes().iter().enumerate() {
            let c = b as usize;

            while state != 0 && self.nodes[state].children[c] == -1 {
                state = self.nodes[state].fail as usize;
            }

            if self.nodes[state].children[c] != -1 {
                state = self.nodes[state].children[c] as usize;
            }

            for &(pattern_id, pattern_len) in &self.nodes[state].outputs {
                matches.push(Match {
                    start: i + 1 - pattern_len,
                    end: i + 1,
                    pattern_id,
                    confidence: AUTOMATON_CONFIDENCE,
                });
            }
        }

        debug!(
            text_len = text.len(),
            matches = matches.len(),
            "automaton search complete"
        );

        matches
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for AhoCorasickAutomaton {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(matches: &[Match]) -> Vec<(usize, usize, usize)> {
        matches.iter().map(|m| (m.start, m.end, m.pattern_id)).collect()
    }

    #[test]
    fn classic_overlap_example_finds_all_patterns() {
        let mut ac = AhoCorasickAutomaton::new();
        ac.add_pattern("he", 1);
        ac.add_pattern("she", 2);
        ac.add_pattern("hers", 3);
        ac.build();

        let matches = ac.search("ushers");
        let found = spans(&matches);
        assert!(found.contains(&(1, 3, 1)), "missing 'he' inside 'she': {found:?}");
        assert!(found.contains(&(0, 3, 2)), "missing 'she': {found:?}");
        assert!(found.contains(&(1, 5, 3)), "missing 'hers': {found:?}");
        for m in &matches {
            assert_eq!(m.confidence, 0.9);
        }
    }

    #[test]
    fn search_before_build_is_silently_empty() {
        let mut ac = AhoCorasickAutomaton::new();
        ac.add_pattern("needle", 1);
        assert!(!ac.is_built());
        assert!(ac.search("a needle in a haystack").is_empty());
    }

    #[test]
    fn build_is_idempotent() {
        let mut ac = AhoCorasickAutomaton::new();
        ac.add_pattern("abc", 1);
        ac.add_pattern("bc", 2);
        ac.build();
        let first = ac.search("xabcx");
        ac.build();
        let second = ac.search("xabcx");
        assert_eq!(spans(&first), spans(&second));
    }

    #[test]
    fn add_pattern_after_build_clears_built_flag() {
        let mut ac = AhoCorasickAutomaton::new();
        ac.add_pattern("one", 1);
        ac.build();
        assert!(ac.is_built());

        ac.add_pattern("two", 2);
        assert!(!ac.is_built());
        assert!(ac.search("one two").is_empty());

        ac.build();
        assert_eq!(ac.search("one two").len(), 2);
    }

    #[test]
    fn empty_pattern_is_ignored() {
        let mut ac = AhoCorasickAutomaton::new();
        ac.add_pattern("", 1);
        assert_eq!(ac.node_count(), 1);
        ac.build();
        assert!(ac.search("anything").is_empty());
    }

    #[test]
    fn shared_prefixes_share_trie_nodes() {
        let mut ac = AhoCorasickAutomaton::new();
        ac.add_pattern("abcd", 1);
        ac.add_pattern("abce", 2);
        // Root + a,b,c shared + d + e
        assert_eq!(ac.node_count(), 6);
    }

    #[test]
    fn repeated_occurrences_are_all_emitted() {
        let mut ac = AhoCorasickAutomaton::new();
        ac.add_pattern("ab", 1);
        ac.build();
        let matches = ac.search("ababab");
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 2, 4]);
    }

    #[test]
    fn duplicate_pattern_ids_emit_one_match_each() {
        let mut ac = AhoCorasickAutomaton::new();
        ac.add_pattern("aa", 5);
        ac.add_pattern("aa", 5);
        ac.build();
        // Both terminal markers live on the same node.
        let matches = ac.search("xaax");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].start, matches[1].start);
    }
}
