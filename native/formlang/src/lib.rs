//! Finite automata, regular expressions and the classical conversions
//! between them.
//!
//! ```
//! use formlang::{FiniteAutomaton, Regex};
//!
//! let mut nfa = FiniteAutomaton::new();
//! nfa.add_transition(0, "a", 1);
//! nfa.add_transition(1, "b", 1);
//! nfa.add_start_state(0);
//! nfa.add_final_state(1);
//!
//! let dfa = nfa.determinize().minimize().unwrap();
//! assert!(dfa.accepts(["a", "b", "b"]));
//!
//! let regex = Regex::concat(Regex::symbol("a"), Regex::star(Regex::symbol("b")));
//! assert!(regex.to_automaton().is_equivalent(&dfa));
//! ```

pub mod automaton;
pub mod error;
pub mod regex;

pub use automaton::{FiniteAutomaton, Label, StateId, StateSet, SymbolId};
pub use error::{Error, Result};
pub use regex::{EliminationOrder, Regex};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
fn import_submodule<'py>(
    py: Python<'py>,
    m: &Bound<'py, PyModule>,
    package: &str,
    name: &str,
    import_func: impl FnOnce(&Bound<'py, PyModule>) -> PyResult<()>,
) -> PyResult<()> {
    let submodule = PyModule::new(py, name)?;
    import_func(&submodule)?;

    // Add the submodule to sys.modules
    let sys_modules = PyModule::import(py, "sys")?.getattr("modules")?;
    sys_modules.set_item(format!("{package}.{name}"), submodule.clone())?;

    m.add_submodule(&submodule)?;
    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
fn formlang(m: &Bound<'_, PyModule>) -> PyResult<()> {
    import_submodule(m.py(), m, "formlang", "automaton", automaton::automaton)
}
