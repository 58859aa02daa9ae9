//! The finite automaton aggregate and its acceptance engine.
//!
//! One automaton type covers epsilon-NFAs, NFAs and DFAs; being
//! deterministic or total is a checked property, not a separate type.

use crate::automaton::relation::TransitionRelation;
use crate::automaton::state::{StateId, StateNames, StateSet};
use crate::automaton::symbol::{Alphabet, EPSILON, Label, SymbolId, is_epsilon};
use std::ops::Range;

/// A finite automaton over named symbols, possibly with epsilon transitions.
///
/// States are integer handles `0..num_states()`. Referencing an unseen state
/// or symbol registers it; nothing here ever fails.
#[derive(Debug, Clone, Default)]
pub struct FiniteAutomaton {
    /// Number of states (states are numbered 0..num_states)
    pub(crate) num_states: StateId,
    pub(crate) start_states: StateSet,
    pub(crate) final_states: StateSet,
    pub(crate) transitions: TransitionRelation,
    /// All symbols used (excluding epsilon)
    pub(crate) alphabet: Alphabet,
    pub(crate) names: StateNames,
}

impl FiniteAutomaton {
    /// Create a new empty automaton.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty automaton that already knows the given symbols.
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            ..Self::default()
        }
    }

    /// Ensure a state exists, expanding num_states if needed.
    pub fn ensure_state(&mut self, state: StateId) {
        if state >= self.num_states {
            self.num_states = state + 1;
        }
    }

    /// Add a fresh state and return its ID.
    pub fn add_state(&mut self) -> StateId {
        let id = self.num_states;
        self.num_states += 1;
        id
    }

    /// Get the state registered under `name`, creating it if needed.
    pub fn state(&mut self, name: &str) -> StateId {
        if let Some(id) = self.names.lookup(name) {
            return id;
        }
        let id = self.add_state();
        self.names.set(id, name.to_string());
        id
    }

    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.names.lookup(name)
    }

    pub fn set_state_name(&mut self, state: StateId, name: impl Into<String>) {
        self.ensure_state(state);
        self.names.set(state, name.into());
    }

    /// The state's name, or its number when it has none.
    pub fn state_name(&self, state: StateId) -> String {
        self.names
            .name(state)
            .map_or_else(|| state.to_string(), str::to_string)
    }

    /// Register a symbol without adding a transition on it.
    pub fn add_symbol(&mut self, name: &str) -> SymbolId {
        self.alphabet.intern(name)
    }

    /// Resolve a label to its ID, registering the symbol if needed.
    fn intern_label(&mut self, label: &Label) -> SymbolId {
        match label {
            Label::Epsilon => EPSILON,
            Label::Symbol(name) => self.alphabet.intern(name),
        }
    }

    /// Resolve a label to its ID without registering anything.
    pub fn label_id(&self, label: &Label) -> Option<SymbolId> {
        match label {
            Label::Epsilon => Some(EPSILON),
            Label::Symbol(name) => self.alphabet.id(name),
        }
    }

    /// Label behind a symbol ID, or `None` for an ID this automaton never
    /// interned.
    pub fn label(&self, id: SymbolId) -> Option<Label> {
        if is_epsilon(id) {
            return Some(Label::Epsilon);
        }
        self.alphabet
            .name(id)
            .map(|name| Label::Symbol(name.to_string()))
    }

    /// Add a transition from source to destination on the given label.
    /// Returns false if the transition was already present.
    pub fn add_transition(
        &mut self,
        source: StateId,
        label: impl Into<Label>,
        destination: StateId,
    ) -> bool {
        let symbol = self.intern_label(&label.into());
        self.add_transition_id(source, symbol, destination)
    }

    /// Add an epsilon transition from source to destination.
    pub fn add_epsilon_transition(&mut self, source: StateId, destination: StateId) -> bool {
        self.add_transition_id(source, EPSILON, destination)
    }

    pub(crate) fn add_transition_id(
        &mut self,
        source: StateId,
        symbol: SymbolId,
        destination: StateId,
    ) -> bool {
        self.ensure_state(source);
        self.ensure_state(destination);
        self.transitions.add(source, symbol, destination)
    }

    /// Remove a transition. Returns true if it existed. The symbol stays
    /// in the alphabet.
    pub fn remove_transition(
        &mut self,
        source: StateId,
        label: impl Into<Label>,
        destination: StateId,
    ) -> bool {
        match self.label_id(&label.into()) {
            Some(symbol) => self.transitions.remove(source, symbol, destination),
            None => false,
        }
    }

    /// Add a start state.
    pub fn add_start_state(&mut self, state: StateId) {
        self.ensure_state(state);
        self.start_states.insert(state);
    }

    pub fn remove_start_state(&mut self, state: StateId) -> bool {
        self.start_states.remove(state)
    }

    /// Add a final (accepting) state.
    pub fn add_final_state(&mut self, state: StateId) {
        self.ensure_state(state);
        self.final_states.insert(state);
    }

    pub fn remove_final_state(&mut self, state: StateId) -> bool {
        self.final_states.remove(state)
    }

    pub fn is_start_state(&self, state: StateId) -> bool {
        self.start_states.contains(state)
    }

    pub fn is_final_state(&self, state: StateId) -> bool {
        self.final_states.contains(state)
    }

    /// Get the number of states.
    pub fn num_states(&self) -> StateId {
        self.num_states
    }

    pub fn states(&self) -> Range<StateId> {
        0..self.num_states
    }

    /// Get the start states.
    pub fn start_states(&self) -> &StateSet {
        &self.start_states
    }

    /// Get the final states.
    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    /// Get the alphabet (all symbols except epsilon).
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn relation(&self) -> &TransitionRelation {
        &self.transitions
    }

    /// Destinations of `state` on `label`. Unknown states or labels yield an
    /// empty set.
    pub fn targets(&self, state: StateId, label: impl Into<Label>) -> StateSet {
        match self.label_id(&label.into()) {
            Some(symbol) => self.transitions.targets(state, symbol),
            None => StateSet::default(),
        }
    }

    /// Get all transitions as an iterator.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.transitions.all()
    }

    /// All transitions with their labels resolved.
    pub fn labeled_transitions(&self) -> impl Iterator<Item = (StateId, Label, StateId)> + '_ {
        self.transitions
            .all()
            .filter_map(|(src, sym, dst)| Some((src, self.label(sym)?, dst)))
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Every state reachable from `state` in one step, epsilon included.
    pub(crate) fn successors(&self, state: StateId) -> StateSet {
        let mut next = self.transitions.targets(state, EPSILON);
        for symbol in self.alphabet.ids() {
            if let Some(dests) = self.transitions.get(state, symbol) {
                next.union_with(dests);
            }
        }
        next
    }

    /// Get the epsilon closure of a set of states.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.num_states as usize);
        let mut stack: Vec<StateId> = states.iter().collect();

        while let Some(s) = stack.pop() {
            if !closure.insert(s) {
                continue;
            }
            if let Some(destinations) = self.transitions.get(s, EPSILON) {
                for dest in destinations.iter() {
                    if !closure.contains(dest) {
                        stack.push(dest);
                    }
                }
            }
        }

        closure
    }

    /// Get the states reachable from a set of states on a given symbol.
    /// Returns the epsilon closure of the reached states.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        assert!(!is_epsilon(symbol), "Use epsilon_closure for epsilon moves");

        let mut reached = StateSet::with_capacity(self.num_states as usize);
        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(state, symbol) {
                reached.union_with(destinations);
            }
        }

        self.epsilon_closure(&reached)
    }

    /// Check whether the automaton accepts a word given as symbol names.
    ///
    /// A symbol outside the alphabet rejects the word.
    pub fn accepts<I>(&self, word: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut current = self.epsilon_closure(&self.start_states);
        for symbol in word {
            let Some(id) = self.alphabet.id(symbol.as_ref()) else {
                return false;
            };
            current = self.move_on_symbol(&current, id);
            if current.is_empty() {
                return false;
            }
        }
        current.intersects(&self.final_states)
    }

    /// No epsilon transitions, exactly one start state, and at most one
    /// destination per (state, symbol).
    pub fn is_deterministic(&self) -> bool {
        self.start_states.len() == 1 && self.transitions.is_deterministic()
    }

    /// Deterministic, with exactly one destination for every state and symbol.
    pub fn is_total(&self) -> bool {
        self.is_deterministic()
            && self.states().all(|state| {
                self.alphabet
                    .ids()
                    .all(|symbol| self.transitions.get(state, symbol).is_some())
            })
    }

    /// Equivalent automaton without epsilon transitions.
    ///
    /// `p -a-> q` holds in the result whenever some state in the epsilon
    /// closure of `p` has an `a` edge to `q`; `p` is final when its closure
    /// meets a final state.
    pub fn remove_epsilon_transitions(&self) -> FiniteAutomaton {
        let mut result = FiniteAutomaton::with_alphabet(self.alphabet.clone());
        result.names = self.names.clone();
        result.num_states = self.num_states;
        result.start_states = self.start_states.clone();

        for state in self.states() {
            let closure = self.epsilon_closure(&StateSet::singleton(state, 1));
            if closure.intersects(&self.final_states) {
                result.add_final_state(state);
            }
            for symbol in self.alphabet.ids() {
                for member in closure.iter() {
                    if let Some(dests) = self.transitions.get(member, symbol) {
                        for dest in dests.iter() {
                            result.add_transition_id(state, symbol, dest);
                        }
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a b* (c|d) over states 0..=3.
    fn abcd() -> FiniteAutomaton {
        let mut nfa = FiniteAutomaton::new();
        nfa.add_transition(0, "a", 1);
        nfa.add_transition(1, "b", 1);
        nfa.add_transition(1, "c", 2);
        nfa.add_transition(1, "d", 3);
        nfa.add_start_state(0);
        nfa.add_final_state(2);
        nfa.add_final_state(3);
        nfa
    }

    #[test]
    fn test_epsilon_nfa_basic() {
        let mut nfa = FiniteAutomaton::new();

        // Create a simple NFA: 0 -a-> 1 -ε-> 2 (final)
        nfa.add_transition(0, "a", 1);
        nfa.add_epsilon_transition(1, 2);
        nfa.add_start_state(0);
        nfa.add_final_state(2);

        assert_eq!(nfa.num_states(), 3);
        assert_eq!(nfa.alphabet().len(), 1);
        assert!(nfa.accepts(["a"]));
        assert!(!nfa.is_deterministic());
    }

    #[test]
    fn test_accepts_scenario() {
        let nfa = abcd();
        assert!(nfa.accepts(["a", "b", "c"]));
        assert!(nfa.accepts(["a", "c"]));
        assert!(nfa.accepts(["a", "b", "b", "d"]));
        assert!(!nfa.accepts(["b"]));
        assert!(!nfa.accepts([""; 0]));
        assert!(!nfa.accepts(["a", "c", "d"]));
    }

    #[test]
    fn test_unknown_symbol_rejects() {
        let nfa = abcd();
        assert!(!nfa.accepts(["a", "z", "c"]));
        assert!(nfa.targets(0, "z").is_empty());
        assert!(nfa.targets(42, "a").is_empty());
    }

    #[test]
    fn test_epsilon_closure() {
        let mut nfa = FiniteAutomaton::new();

        // 0 -ε-> 1 -ε-> 2
        nfa.add_epsilon_transition(0, 1);
        nfa.add_epsilon_transition(1, 2);
        nfa.add_start_state(0);

        let start = StateSet::singleton(0, 3);
        let closure = nfa.epsilon_closure(&start);

        assert!(closure.contains(0));
        assert!(closure.contains(1));
        assert!(closure.contains(2));
        assert_eq!(closure.len(), 3);
    }

    #[test]
    fn test_epsilon_closure_with_cycle() {
        let mut nfa = FiniteAutomaton::new();
        nfa.add_epsilon_transition(1, 2);
        nfa.add_epsilon_transition(1, 4);
        nfa.add_epsilon_transition(2, 3);
        nfa.add_epsilon_transition(3, 6);
        nfa.add_epsilon_transition(5, 7);
        nfa.add_epsilon_transition(6, 1);
        nfa.add_transition(4, "a", 5);
        nfa.add_transition(5, "b", 6);

        let closure = |s| nfa.epsilon_closure(&StateSet::singleton(s, 8)).len();
        assert_eq!(closure(1), 5);
        assert_eq!(closure(5), 2);
        assert_eq!(closure(7), 1);
    }

    #[test]
    fn test_move_on_symbol() {
        let mut nfa = FiniteAutomaton::new();

        // 0 -a-> 1, 0 -a-> 2, 1 -ε-> 3
        nfa.add_transition(0, "a", 1);
        nfa.add_transition(0, "a", 2);
        nfa.add_epsilon_transition(1, 3);

        let start = StateSet::singleton(0, 4);
        let a = nfa.alphabet().id("a").unwrap();
        let reached = nfa.move_on_symbol(&start, a);

        assert!(reached.contains(1));
        assert!(reached.contains(2));
        assert!(reached.contains(3)); // via epsilon from 1
        assert_eq!(reached.len(), 3);
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut nfa = FiniteAutomaton::new();
        let q0 = nfa.state("q0");
        assert_eq!(nfa.state("q0"), q0);
        nfa.add_start_state(q0);
        nfa.add_start_state(q0);
        assert_eq!(nfa.start_states().len(), 1);
        assert!(nfa.add_transition(q0, "a", q0));
        assert!(!nfa.add_transition(q0, "a", q0));
        assert_eq!(nfa.num_transitions(), 1);
        assert_eq!(nfa.num_states(), 1);
        assert_eq!(nfa.state_name(q0), "q0");
    }

    #[test]
    fn test_label_lookup() {
        let nfa = abcd();
        let b = nfa.alphabet().id("b").unwrap();
        assert_eq!(nfa.label(b), Some(Label::symbol("b")));
        assert_eq!(nfa.label(EPSILON), Some(Label::Epsilon));
        assert_eq!(nfa.label(40), None);
        assert_eq!(nfa.labeled_transitions().count(), nfa.num_transitions());
    }

    #[test]
    fn test_remove_transition_and_states() {
        let mut nfa = abcd();
        assert!(nfa.remove_transition(1, "d", 3));
        assert!(!nfa.remove_transition(1, "d", 3));
        assert!(!nfa.remove_transition(1, "zz", 3));
        assert!(!nfa.accepts(["a", "d"]));
        assert!(nfa.alphabet().contains("d"));

        assert!(nfa.remove_final_state(2));
        assert!(!nfa.remove_final_state(2));
        assert!(!nfa.accepts(["a", "c"]));
        assert!(nfa.remove_start_state(0));
        assert!(nfa.start_states().is_empty());
    }

    #[test]
    fn test_deterministic_and_total() {
        let nfa = abcd();
        assert!(nfa.is_deterministic());
        assert!(!nfa.is_total());

        let mut total = FiniteAutomaton::new();
        total.add_transition(0, "a", 1);
        total.add_transition(1, "a", 1);
        total.add_start_state(0);
        assert!(total.is_total());

        total.add_start_state(1);
        assert!(!total.is_deterministic());
    }

    #[test]
    fn test_remove_epsilon_transitions() {
        let mut nfa = FiniteAutomaton::new();
        nfa.add_epsilon_transition(0, 1);
        nfa.add_transition(1, "a", 2);
        nfa.add_epsilon_transition(2, 3);
        nfa.add_transition(3, "b", 3);
        nfa.add_start_state(0);
        nfa.add_final_state(3);

        let free = nfa.remove_epsilon_transitions();
        assert!(!free.relation().has_epsilon());
        for word in [vec![], vec!["a"], vec!["a", "b"], vec!["b"], vec!["a", "a"]] {
            assert_eq!(free.accepts(&word), nfa.accepts(&word), "{word:?}");
        }
    }
}
