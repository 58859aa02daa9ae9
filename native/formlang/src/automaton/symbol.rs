//! Symbol types for automata transitions.

use indexmap::IndexSet;
use std::fmt;

/// A symbol identifier represented as a u32.
/// The special value `EPSILON` represents an epsilon (empty) transition.
pub type SymbolId = u32;

/// Special symbol ID representing epsilon (empty) transitions.
/// We use u32::MAX as the epsilon marker.
pub const EPSILON: SymbolId = u32::MAX;

/// Check if a symbol is an epsilon transition.
#[inline]
pub fn is_epsilon(symbol: SymbolId) -> bool {
    symbol == EPSILON
}

/// A transition label as seen by callers: either a named symbol or epsilon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Epsilon,
    Symbol(String),
}

impl Label {
    pub fn symbol(name: impl Into<String>) -> Self {
        Label::Symbol(name.into())
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::Symbol(name.to_string())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label::Symbol(name)
    }
}

impl From<char> for Label {
    fn from(c: char) -> Self {
        Label::Symbol(c.to_string())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => f.write_str("ε"),
            Label::Symbol(name) => f.write_str(name),
        }
    }
}

/// Interns symbol names. A symbol's ID is its registration index, so
/// iterating the alphabet always follows registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    names: IndexSet<String>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol, returning its ID. Registering a name twice is a no-op.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(id) = self.id(name) {
            return id;
        }
        let (index, _) = self.names.insert_full(name.to_string());
        // Reserve EPSILON (u32::MAX) for epsilon transitions
        assert!(
            (index as u64) < EPSILON as u64,
            "alphabet exhausted the symbol ID space"
        );
        index as SymbolId
    }

    pub fn id(&self, name: &str) -> Option<SymbolId> {
        self.names.get_index_of(name).map(|i| i as SymbolId)
    }

    pub fn name(&self, id: SymbolId) -> Option<&str> {
        if is_epsilon(id) {
            None
        } else {
            self.names.get_index(id as usize).map(String::as_str)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All symbol IDs, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.names.len()).map(|i| i as SymbolId)
    }

    /// All symbol names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Render a label ID for display, epsilon included.
    pub fn display(&self, id: SymbolId) -> String {
        match self.name(id) {
            Some(name) => name.to_string(),
            None if is_epsilon(id) => "ε".to_string(),
            None => format!("#{id}"),
        }
    }
}
