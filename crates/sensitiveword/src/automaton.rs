//! Multi-pattern matching automaton.
//!
//! The automaton is a trie over the characters of every pattern, with
//! breadth-first failure links in the style of Aho-Corasick. A single pass over
//! the input text decides whether any pattern occurs as a substring, no matter
//! how many patterns there are or how they overlap.
//!
//! Scanning takes a skip predicate. Characters it accepts are treated as if
//! they were deleted from the text: they neither advance nor reset the current
//! state. This is what lets `"b-a-d"` match `"bad"` when `-` is skipped.
//!
//! # Example
//!
//! ```
//! use sensitiveword::Automaton;
//!
//! let automaton = Automaton::new(["bad", "worse"]);
//!
//! assert!(automaton.is_match("this is bad", |_| false));
//! assert!(!automaton.is_match("b-a-d", |_| false));
//! assert!(automaton.is_match("b-a-d", |c| c == '-'));
//! ```

use std::collections::{HashMap, VecDeque};

/// Index of the root state.
const ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
struct State {
    /// Direct transitions on the next input character.
    next: HashMap<char, usize>,
    /// State for the longest proper suffix of this state's path.
    fail: usize,
    /// A pattern ends here, or at some state on this state's failure chain.
    terminal: bool,
}

/// Compiled set of patterns.
///
/// The automaton is immutable once built; a changed word set is handled by
/// building a new one and replacing the old value.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    patterns: usize,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::empty()
    }
}

impl Automaton {
    /// Build an automaton from a set of patterns.
    ///
    /// Empty patterns are ignored and duplicates count once. Construction is
    /// linear in the total number of pattern characters.
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut automaton = Self::empty();
        for pattern in patterns {
            automaton.insert(pattern.as_ref());
        }
        automaton.link_failures();
        automaton
    }

    /// An automaton with no patterns, which never matches.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            states: vec![State::default()],
            patterns: 0,
        }
    }

    /// Number of distinct patterns compiled in.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns
    }

    /// Number of states, including the root.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Whether the automaton holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns == 0
    }

    /// Report whether `text` contains any pattern.
    ///
    /// Characters for which `skip` returns `true` are passed over without
    /// touching the current state. Scanning stops at the first match.
    #[must_use]
    pub fn is_match(&self, text: &str, skip: impl Fn(char) -> bool) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut state = ROOT;
        for c in text.chars() {
            if skip(c) {
                continue;
            }
            state = self.step(state, c);
            if self.states[state].terminal {
                return true;
            }
        }
        false
    }

    fn insert(&mut self, pattern: &str) {
        if pattern.is_empty() {
            return;
        }

        let mut current = ROOT;
        for c in pattern.chars() {
            current = if let Some(&next) = self.states[current].next.get(&c) {
                next
            } else {
                let next = self.states.len();
                self.states.push(State::default());
                self.states[current].next.insert(c, next);
                next
            };
        }

        if !self.states[current].terminal {
            self.states[current].terminal = true;
            self.patterns += 1;
        }
    }

    /// Compute failure links breadth-first and fold suffix matches into
    /// `terminal`.
    ///
    /// A state's failure target is always shallower, so it is finished before
    /// any of the state's children are visited.
    fn link_failures(&mut self) {
        let mut queue: VecDeque<usize> = self.states[ROOT].next.values().copied().collect();

        while let Some(state) = queue.pop_front() {
            let edges: Vec<(char, usize)> = self.states[state]
                .next
                .iter()
                .map(|(&c, &child)| (c, child))
                .collect();

            for (c, child) in edges {
                let fail = self.step(self.states[state].fail, c);
                self.states[child].fail = fail;
                if self.states[fail].terminal {
                    self.states[child].terminal = true;
                }
                queue.push_back(child);
            }
        }
    }

    /// Advance from `state` on `c`, falling back along failure links.
    fn step(&self, mut state: usize, c: char) -> usize {
        loop {
            if let Some(&next) = self.states[state].next.get(&c) {
                return next;
            }
            if state == ROOT {
                return ROOT;
            }
            state = self.states[state].fail;
        }
    }
}
