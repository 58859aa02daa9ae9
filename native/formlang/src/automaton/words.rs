//! Enumeration of accepted words.

use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::SymbolId;
use std::collections::VecDeque;

impl FiniteAutomaton {
    /// Every accepted word of at most `max_length` symbols, each exactly
    /// once, shortest first and then in alphabet order.
    ///
    /// Works on the determinized automaton so that every word has a single
    /// path; branches that can no longer reach a final state are cut.
    pub fn accepted_words(&self, max_length: usize) -> Vec<Vec<String>> {
        let dfa = self.determinize();
        let live = dfa.coreachable_states();
        let mut words = Vec::new();

        let Some(start) = dfa.start_states.first() else {
            return words;
        };
        if !live.contains(start) {
            return words;
        }

        let mut queue: VecDeque<(StateId, Vec<SymbolId>)> = VecDeque::from([(start, Vec::new())]);
        while let Some((state, word)) = queue.pop_front() {
            if dfa.is_final_state(state) {
                words.push(
                    word.iter()
                        .filter_map(|&sym| dfa.alphabet.name(sym))
                        .map(str::to_string)
                        .collect(),
                );
            }
            if word.len() >= max_length {
                continue;
            }
            for symbol in dfa.alphabet.ids() {
                let Some(next) = dfa.transitions.get(state, symbol).and_then(StateSet::first) else {
                    continue;
                };
                if live.contains(next) {
                    let mut longer = word.clone();
                    longer.push(symbol);
                    queue.push_back((next, longer));
                }
            }
        }
        words
    }
}
