//! Error codes.
//!
//! Only precondition violations are errors. Registering states and symbols,
//! acceptance, determinization, conversions and the analyzers never fail.

use crate::automaton::StateId;
use thiserror::Error;

/// Errors produced by operations that need a deterministic or total automaton
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The operation needs a deterministic automaton: no epsilon transitions,
    /// exactly one start state and at most one destination per symbol.
    #[error("automaton is not deterministic; determinize it first")]
    NotDeterministic,

    /// The operation needs a total automaton: one destination for every
    /// state and every symbol of the alphabet.
    #[error("automaton is not total; complete it first")]
    NotTotal,

    /// A product construction would need more states than a `StateId` can
    /// number.
    #[error("product automaton needs more than {} states", StateId::MAX)]
    TooManyStates,
}

/// Result type for automaton operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(Error::NotDeterministic.to_string().contains("determinize"));
        assert!(Error::NotTotal.to_string().contains("complete"));
        assert!(Error::TooManyStates.to_string().contains("4294967295"));
    }
}
