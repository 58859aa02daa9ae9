//! The nondeterministic transition relation shared by every automaton.

use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::{SymbolId, is_epsilon};
use indexmap::IndexMap;

/// Multi-map from (source, label) to the set of destinations.
/// For epsilon transitions, label == EPSILON.
#[derive(Debug, Clone, Default)]
pub struct TransitionRelation {
    edges: IndexMap<(StateId, SymbolId), StateSet>,
}

impl TransitionRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transition. Returns true if it was not already present.
    pub fn add(&mut self, source: StateId, label: SymbolId, destination: StateId) -> bool {
        self.edges
            .entry((source, label))
            .or_default()
            .insert(destination)
    }

    /// Remove a transition. Returns true if it was present.
    pub fn remove(&mut self, source: StateId, label: SymbolId, destination: StateId) -> bool {
        let Some(destinations) = self.edges.get_mut(&(source, label)) else {
            return false;
        };
        let removed = destinations.remove(destination);
        if destinations.is_empty() {
            self.edges.shift_remove(&(source, label));
        }
        removed
    }

    /// Destinations of `source` on `label`; `None` when there are none.
    pub fn get(&self, source: StateId, label: SymbolId) -> Option<&StateSet> {
        self.edges.get(&(source, label))
    }

    /// Destinations of `source` on `label`, empty when unregistered.
    pub fn targets(&self, source: StateId, label: SymbolId) -> StateSet {
        self.get(source, label).cloned().unwrap_or_default()
    }

    pub fn contains(&self, source: StateId, label: SymbolId, destination: StateId) -> bool {
        self.get(source, label)
            .is_some_and(|destinations| destinations.contains(destination))
    }

    /// Get all transitions as an iterator, in insertion order of (source, label).
    pub fn all(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        self.edges
            .iter()
            .flat_map(|(&(src, sym), dests)| dests.iter().map(move |dst| (src, sym, dst)))
    }

    pub fn len(&self) -> usize {
        self.edges.values().map(StateSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// True when no state has an epsilon edge and no (state, symbol) pair has
    /// more than one destination.
    pub fn is_deterministic(&self) -> bool {
        self.edges
            .iter()
            .all(|(&(_, sym), dests)| !is_epsilon(sym) && dests.len() <= 1)
    }

    pub fn has_epsilon(&self) -> bool {
        self.edges.keys().any(|&(_, sym)| is_epsilon(sym))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::symbol::EPSILON;

    #[test]
    fn test_add_and_targets() {
        let mut rel = TransitionRelation::new();
        assert!(rel.add(0, 0, 1));
        assert!(rel.add(0, 0, 2));
        assert!(!rel.add(0, 0, 2));
        assert_eq!(rel.targets(0, 0).to_vec(), vec![1, 2]);
        assert!(rel.targets(5, 0).is_empty());
        assert!(rel.targets(0, 7).is_empty());
        assert_eq!(rel.len(), 2);
        assert!(!rel.is_deterministic());
    }

    #[test]
    fn test_remove() {
        let mut rel = TransitionRelation::new();
        rel.add(0, 0, 1);
        assert!(rel.remove(0, 0, 1));
        assert!(!rel.remove(0, 0, 1));
        assert!(rel.is_empty());
        assert!(rel.get(0, 0).is_none());
    }

    #[test]
    fn test_epsilon_makes_nondeterministic() {
        let mut rel = TransitionRelation::new();
        rel.add(0, 0, 1);
        assert!(rel.is_deterministic());
        rel.add(1, EPSILON, 0);
        assert!(!rel.is_deterministic());
        assert!(rel.has_epsilon());
    }

    #[test]
    fn test_all_lists_triples() {
        let mut rel = TransitionRelation::new();
        rel.add(0, 0, 1);
        rel.add(1, EPSILON, 2);
        rel.add(0, 0, 3);
        let triples: Vec<_> = rel.all().collect();
        assert_eq!(triples, vec![(0, 0, 1), (0, 0, 3), (1, EPSILON, 2)]);
        assert!(rel.contains(1, EPSILON, 2));
    }
}
