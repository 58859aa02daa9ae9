//! Subset construction algorithm for converting ε-NFA to DFA.

use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::{StateId, StateSet};
use indexmap::IndexMap;
use log::debug;
use std::collections::VecDeque;

/// Convert an automaton to a DFA using the powerset construction algorithm.
///
/// Each DFA state is the epsilon-closed set of NFA states it stands for. Sets
/// are keyed by their sorted member list, so equal sets always collapse to
/// one state whatever order they are discovered in. The result keeps the
/// input's alphabet (and symbol IDs). Unreachable subsets are never built,
/// but the worst case is still 2^n states.
pub fn subset_construction(nfa: &FiniteAutomaton) -> FiniteAutomaton {
    // We map sets of NFA states to DFA state IDs
    let mut state_mapping: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut dfa = FiniteAutomaton::with_alphabet(nfa.alphabet().clone());

    // Queue of DFA states to process (as NFA state sets)
    let mut worklist: VecDeque<(StateId, StateSet)> = VecDeque::new();

    // Initial DFA state is the epsilon closure of NFA start states. It exists
    // even when empty so the result always has exactly one start state.
    let initial_set = nfa.epsilon_closure(nfa.start_states());
    let initial_dfa_state = new_composite(&mut dfa, nfa, &initial_set);
    dfa.add_start_state(initial_dfa_state);
    state_mapping.insert(initial_set.to_vec(), initial_dfa_state);
    worklist.push_back((initial_dfa_state, initial_set));

    while let Some((current_dfa_state, current_nfa_set)) = worklist.pop_front() {
        for symbol in nfa.alphabet().ids() {
            let next_nfa_set = nfa.move_on_symbol(&current_nfa_set, symbol);

            if next_nfa_set.is_empty() {
                // No transition on this symbol - the DFA stays partial here
                continue;
            }

            let next_vec = next_nfa_set.to_vec();
            let next_dfa_state = match state_mapping.get(&next_vec) {
                Some(&existing) => existing,
                None => {
                    let new_state = new_composite(&mut dfa, nfa, &next_nfa_set);
                    state_mapping.insert(next_vec, new_state);
                    worklist.push_back((new_state, next_nfa_set));
                    new_state
                }
            };

            dfa.add_transition_id(current_dfa_state, symbol, next_dfa_state);
        }
    }

    debug!(
        "subset construction: {} states -> {} states",
        nfa.num_states(),
        dfa.num_states()
    );
    dfa
}

/// Allocate the DFA state standing for `members`, final iff it meets the
/// NFA's final states.
fn new_composite(dfa: &mut FiniteAutomaton, nfa: &FiniteAutomaton, members: &StateSet) -> StateId {
    let state = dfa.add_state();
    let names: Vec<String> = members.iter().map(|s| nfa.state_name(s)).collect();
    dfa.set_state_name(state, format!("{{{}}}", names.join(", ")));
    if members.intersects(nfa.final_states()) {
        dfa.add_final_state(state);
    }
    state
}

impl FiniteAutomaton {
    /// Equivalent deterministic automaton (subset construction).
    pub fn determinize(&self) -> FiniteAutomaton {
        subset_construction(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subset_construction_basic() {
        // NFA: 0 -a-> 1, 0 -a-> 2, 1 -b-> 3(final), 2 -b-> 3(final)
        let mut nfa = FiniteAutomaton::new();
        nfa.add_transition(0, "a", 1);
        nfa.add_transition(0, "a", 2);
        nfa.add_transition(1, "b", 3);
        nfa.add_transition(2, "b", 3);
        nfa.add_start_state(0);
        nfa.add_final_state(3);

        let dfa = subset_construction(&nfa);

        assert!(dfa.is_deterministic());
        assert_eq!(dfa.num_states(), 3);
        assert_eq!(dfa.final_states().len(), 1);
        assert!(dfa.accepts(["a", "b"]));
        assert!(!dfa.accepts(["a"]));
        assert_eq!(dfa.state_name(1), "{1, 2}");
    }

    #[test]
    fn test_subset_construction_with_epsilon() {
        // NFA: 0 -ε-> 1 -a-> 2(final)
        let mut nfa = FiniteAutomaton::new();
        nfa.add_epsilon_transition(0, 1);
        nfa.add_transition(1, "a", 2);
        nfa.add_start_state(0);
        nfa.add_final_state(2);

        let dfa = subset_construction(&nfa);

        // Initial DFA state is {0, 1}, the epsilon closure of {0}
        assert_eq!(dfa.state_name(0), "{0, 1}");
        assert!(dfa.is_deterministic());
        assert!(dfa.accepts(["a"]));
        assert!(!dfa.accepts([""; 0]));
    }

    #[test]
    fn test_empty_nfa() {
        let nfa = FiniteAutomaton::new();
        let dfa = subset_construction(&nfa);
        assert_eq!(dfa.num_states(), 1);
        assert_eq!(dfa.start_states().len(), 1);
        assert!(dfa.final_states().is_empty());
        assert!(dfa.is_deterministic());
    }

    #[test]
    fn test_scenario_language_preserved() {
        let mut nfa = FiniteAutomaton::new();
        nfa.add_transition(0, "a", 1);
        nfa.add_transition(1, "b", 1);
        nfa.add_transition(1, "c", 2);
        nfa.add_transition(1, "d", 3);
        nfa.add_start_state(0);
        nfa.add_final_state(2);
        nfa.add_final_state(3);

        let dfa = nfa.determinize();
        assert!(dfa.is_deterministic());
        assert!(dfa.accepts(["a", "b", "c"]));
        assert!(dfa.accepts(["a", "c"]));
        assert!(dfa.accepts(["a", "b", "b", "d"]));
        assert!(!dfa.accepts(["b"]));
        assert!(!dfa.accepts(["a", "b"]));
        assert!(!dfa.accepts(["a", "c", "c"]));
    }

    #[test]
    fn test_equal_subsets_collapse() {
        // Both branches reach {3, 4} on b; it must be a single DFA state.
        let mut nfa = FiniteAutomaton::new();
        nfa.add_transition(0, "a", 1);
        nfa.add_transition(0, "c", 2);
        nfa.add_transition(1, "b", 3);
        nfa.add_transition(1, "b", 4);
        nfa.add_transition(2, "b", 4);
        nfa.add_transition(2, "b", 3);
        nfa.add_start_state(0);
        nfa.add_final_state(4);

        let dfa = nfa.determinize();
        assert_eq!(dfa.num_states(), 4);
        let a = dfa.alphabet().id("a").unwrap();
        let b = dfa.alphabet().id("b").unwrap();
        let c = dfa.alphabet().id("c").unwrap();
        let via_a = dfa.relation().targets(0, a).first().unwrap();
        let via_c = dfa.relation().targets(0, c).first().unwrap();
        assert_eq!(
            dfa.relation().targets(via_a, b),
            dfa.relation().targets(via_c, b)
        );
    }
}
