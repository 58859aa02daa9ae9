//! Finite automata over named symbols.
//!
//! One [`FiniteAutomaton`] type covers epsilon-NFAs, NFAs and DFAs:
//! - Epsilon closure and word acceptance
//! - Subset construction (NFA to DFA conversion)
//! - Hopcroft's DFA minimization algorithm
//! - Union, concatenation, star, product intersection and complement
//! - Emptiness, finiteness, acyclicity and equivalence checks
//! - Graph export, and PyO3 bindings behind the `python` feature

mod algebra;
mod analysis;
mod dfa;
mod finite_automaton;
mod graph;
#[cfg(feature = "python")]
mod python_bindings;
mod relation;
mod state;
mod subset_construction;
mod symbol;
mod words;

pub use finite_automaton::FiniteAutomaton;
pub use graph::{Graph, GraphEdge, GraphNode};
#[cfg(feature = "python")]
pub use python_bindings::automaton;
pub use relation::TransitionRelation;
pub use state::{StateId, StateNames, StateSet};
pub use subset_construction::subset_construction;
pub use symbol::{Alphabet, EPSILON, Label, SymbolId, is_epsilon};
