//! State handles, sets of states and state names.

use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Index of a state inside its automaton.
pub type StateId = u32;

/// Bit-set of states.
///
/// Only members matter for equality and hashing, so sets holding the same
/// states compare equal whatever their capacity. Iteration is ascending,
/// which makes the member list a canonical key for composite states.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut members = Self::with_capacity(capacity);
        members.insert(state);
        members
    }

    /// Add `state`, growing as needed. False if it was already a member.
    pub fn insert(&mut self, state: StateId) -> bool {
        let bit = state as usize;
        if bit >= self.bits.len() {
            self.bits.grow(bit + 1);
        }
        !self.bits.put(bit)
    }

    /// Drop `state`. False if it was not a member.
    pub fn remove(&mut self, state: StateId) -> bool {
        let present = self.contains(state);
        if present {
            self.bits.set(state as usize, false);
        }
        present
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.bits.contains(state as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|bit| bit as StateId)
    }

    /// Lowest member. For the targets of a deterministic transition this is
    /// the one destination.
    pub fn first(&self) -> Option<StateId> {
        self.bits.minimum().map(|bit| bit as StateId)
    }

    pub fn union_with(&mut self, other: &StateSet) {
        self.bits.union_with(&other.bits);
    }

    pub fn intersects(&self, other: &StateSet) -> bool {
        !self.bits.is_disjoint(&other.bits)
    }

    pub fn intersection(&self, other: &StateSet) -> StateSet {
        let mut common = self.clone();
        common.bits.intersect_with(&other.bits);
        common
    }

    pub fn difference(&self, other: &StateSet) -> StateSet {
        let mut rest = self.clone();
        rest.bits.difference_with(&other.bits);
        rest
    }

    /// Members in ascending order.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        for member in self.iter() {
            member.hash(hasher);
        }
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut members = StateSet::default();
        members.extend(iter);
        members
    }
}

impl Extend<StateId> for StateSet {
    fn extend<I: IntoIterator<Item = StateId>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

/// Optional user-visible names for states.
///
/// Names are only used for display and for get-or-create registration by
/// label; the state's identity is always its `StateId`.
#[derive(Debug, Clone, Default)]
pub struct StateNames {
    by_name: IndexMap<String, StateId>,
    names: Vec<Option<String>>,
}

impl StateNames {
    pub fn lookup(&self, name: &str) -> Option<StateId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, state: StateId) -> Option<&str> {
        self.names.get(state as usize).and_then(|n| n.as_deref())
    }

    /// Attach a name to a state. A name already owned by another state is
    /// kept on the first owner for lookups, but still shown for display.
    pub fn set(&mut self, state: StateId, name: String) {
        let idx = state as usize;
        if idx >= self.names.len() {
            self.names.resize(idx + 1, None);
        }
        self.by_name.entry(name.clone()).or_insert(state);
        self.names[idx] = Some(name);
    }
}
