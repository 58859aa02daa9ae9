//! PyO3 bindings for the automaton module.
//!
//! States and symbols are arbitrary Python values; they are identified by
//! their `repr`, which also becomes the state or symbol name on the Rust side.
//! Word acceptance, determinization and minimization run entirely in Rust.

use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::StateId;
use crate::error::Error;
use indexmap::IndexMap;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PySet};

/// Python-facing wrapper around an arbitrary Python value. Equality and
/// hashing defer to the wrapped value.
macro_rules! value_wrapper {
    ($rust:ident, $python:tt) => {
        #[doc = concat!("A ", $python, " wrapper that holds any Python object.")]
        #[pyclass(name = $python, module = "formlang.automaton", frozen, from_py_object)]
        #[derive(Clone)]
        pub struct $rust {
            value: Py<PyAny>,
        }

        #[pymethods]
        impl $rust {
            #[new]
            fn new(value: Py<PyAny>) -> Self {
                Self { value }
            }

            fn __repr__(&self, py: Python<'_>) -> PyResult<String> {
                Ok(format!("{}({})", $python, self.value.bind(py).repr()?))
            }

            fn __eq__(&self, other: &Bound<'_, PyAny>, py: Python<'_>) -> PyResult<bool> {
                match other.extract::<PyRef<$rust>>() {
                    Ok(other) => self.value.bind(py).eq(other.value.bind(py)),
                    Err(_) => Ok(false),
                }
            }

            fn __hash__(&self, py: Python<'_>) -> PyResult<isize> {
                self.value.bind(py).hash()
            }

            #[getter]
            fn value(&self, py: Python<'_>) -> Py<PyAny> {
                self.value.clone_ref(py)
            }
        }

        impl $rust {
            /// Name used for the value on the Rust side.
            fn key(&self, py: Python<'_>) -> PyResult<String> {
                Ok(self.value.bind(py).repr()?.to_string())
            }
        }
    };
}

value_wrapper!(PyState, "State");
value_wrapper!(PySymbol, "Symbol");

/// Marker for epsilon transitions.
#[pyclass(
    name = "Epsilon",
    module = "formlang.automaton",
    frozen,
    from_py_object
)]
#[derive(Clone)]
pub struct PyEpsilon;

#[pymethods]
impl PyEpsilon {
    #[new]
    fn new() -> Self {
        Self
    }

    fn __repr__(&self) -> &'static str {
        "Epsilon()"
    }

    fn __eq__(&self, other: &Bound<'_, PyAny>) -> bool {
        other.is_instance_of::<PyEpsilon>()
    }

    fn __hash__(&self) -> isize {
        // Consistent hash for all Epsilon instances
        EPSILON_HASH as isize
    }
}

const EPSILON_HASH: u64 = 0xDEAD_BEEF_CAFE_BABE;

fn to_py_err(err: Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Remembers the Python value behind every symbol name.
#[derive(Clone, Default)]
struct SymbolValues {
    by_name: IndexMap<String, Py<PyAny>>,
}

impl SymbolValues {
    fn register(&mut self, py: Python<'_>, symbol: &PySymbol) -> PyResult<String> {
        let name = symbol.key(py)?;
        self.by_name
            .entry(name.clone())
            .or_insert_with(|| symbol.value.clone_ref(py));
        Ok(name)
    }

    fn value<'py>(&self, py: Python<'py>, name: &str) -> Option<Bound<'py, PyAny>> {
        self.by_name.get(name).map(|value| value.bind(py).clone())
    }
}

fn state_id(py: Python<'_>, fa: &mut FiniteAutomaton, state: &PyState) -> PyResult<StateId> {
    Ok(fa.state(&state.key(py)?))
}

fn accepts_word(py: Python<'_>, fa: &FiniteAutomaton, word: &[PySymbol]) -> PyResult<bool> {
    let names = word
        .iter()
        .map(|symbol| symbol.key(py))
        .collect::<PyResult<Vec<_>>>()?;
    Ok(fa.accepts(&names))
}

/// Build a `networkx.MultiDiGraph` from the exported graph.
fn to_networkx<'py>(
    py: Python<'py>,
    fa: &FiniteAutomaton,
    symbols: &SymbolValues,
) -> PyResult<Bound<'py, PyAny>> {
    let nx = py.import("networkx")?;
    let graph = nx.call_method0("MultiDiGraph")?;
    let export = fa.to_graph();

    for node in &export.nodes {
        let kwargs = PyDict::new(py);
        kwargs.set_item("is_start", node.is_start)?;
        kwargs.set_item("is_final", node.is_final)?;
        kwargs.set_item("peripheries", if node.is_final { 2 } else { 1 })?;
        kwargs.set_item("label", node.label.as_str())?;
        graph.call_method("add_node", (node.id,), Some(&kwargs))?;

        if node.is_start {
            let starting = format!("starting_{}", node.id);
            let kwargs = PyDict::new(py);
            kwargs.set_item("label", "")?;
            kwargs.set_item("shape", py.None())?;
            kwargs.set_item("height", 0.0)?;
            kwargs.set_item("width", 0.0)?;
            graph.call_method("add_node", (starting.as_str(),), Some(&kwargs))?;
            graph.call_method1("add_edge", (starting.as_str(), node.id))?;
        }
    }

    for edge in &export.edges {
        let label: Bound<'py, PyAny> = match edge.label.as_deref() {
            Some(name) => match symbols.value(py, name) {
                Some(value) => value,
                None => name.into_pyobject(py)?.into_any(),
            },
            None => "ε".into_pyobject(py)?.into_any(),
        };
        let kwargs = PyDict::new(py);
        kwargs.set_item("label", label)?;
        graph.call_method("add_edge", (edge.source, edge.target), Some(&kwargs))?;
    }

    Ok(graph)
}

/// An Epsilon Non-deterministic Finite Automaton.
#[pyclass(name = "EpsilonNFA", module = "formlang.automaton")]
pub struct PyEpsilonNFA {
    fa: FiniteAutomaton,
    symbols: SymbolValues,
}

#[pymethods]
impl PyEpsilonNFA {
    #[new]
    fn new() -> Self {
        Self {
            fa: FiniteAutomaton::new(),
            symbols: SymbolValues::default(),
        }
    }

    /// Add a transition. The symbol can be a Symbol or Epsilon.
    /// Returns False if the transition was already present.
    #[pyo3(signature = (source, symbol, destination))]
    fn add_transition(
        &mut self,
        py: Python<'_>,
        source: &PyState,
        symbol: &Bound<'_, PyAny>,
        destination: &PyState,
    ) -> PyResult<bool> {
        let src_id = state_id(py, &mut self.fa, source)?;
        let dst_id = state_id(py, &mut self.fa, destination)?;

        if symbol.is_instance_of::<PyEpsilon>() {
            Ok(self.fa.add_epsilon_transition(src_id, dst_id))
        } else if let Ok(sym) = symbol.extract::<PySymbol>() {
            let name = self.symbols.register(py, &sym)?;
            Ok(self.fa.add_transition(src_id, name, dst_id))
        } else {
            Err(PyValueError::new_err(
                "symbol must be a Symbol or Epsilon instance",
            ))
        }
    }

    fn add_start_state(&mut self, py: Python<'_>, state: &PyState) -> PyResult<()> {
        let state_id = state_id(py, &mut self.fa, state)?;
        self.fa.add_start_state(state_id);
        Ok(())
    }

    fn add_final_state(&mut self, py: Python<'_>, state: &PyState) -> PyResult<()> {
        let state_id = state_id(py, &mut self.fa, state)?;
        self.fa.add_final_state(state_id);
        Ok(())
    }

    fn accepts(&self, py: Python<'_>, word: Vec<PySymbol>) -> PyResult<bool> {
        accepts_word(py, &self.fa, &word)
    }

    fn is_empty(&self) -> bool {
        self.fa.is_empty()
    }

    fn is_deterministic(&self) -> bool {
        self.fa.is_deterministic()
    }

    /// Textual regular expression for the accepted language.
    fn to_regex(&self) -> String {
        self.fa.to_regex().to_string()
    }

    /// Subset construction. Returns a DeterministicFiniteAutomaton.
    fn determinize(&self) -> PyDFA {
        PyDFA {
            fa: self.fa.determinize(),
            symbols: self.symbols.clone(),
        }
    }

    /// Determinize then minimize. Returns a DeterministicFiniteAutomaton.
    fn minimize(&self) -> PyResult<PyDFA> {
        let minimized = self.fa.determinize().minimize().map_err(to_py_err)?;
        Ok(PyDFA {
            fa: minimized,
            symbols: self.symbols.clone(),
        })
    }

    fn to_networkx<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        to_networkx(py, &self.fa, &self.symbols)
    }
}

/// A Deterministic Finite Automaton.
#[pyclass(
    name = "DeterministicFiniteAutomaton",
    module = "formlang.automaton"
)]
pub struct PyDFA {
    fa: FiniteAutomaton,
    symbols: SymbolValues,
}

#[pymethods]
impl PyDFA {
    /// Get the start state as an integer index.
    #[getter]
    fn start_state(&self) -> Option<u32> {
        self.fa.start_states().first()
    }

    /// Get the final states as a set of integer indices.
    #[getter]
    fn final_states(&self, py: Python<'_>) -> PyResult<Py<PySet>> {
        let set = PySet::empty(py)?;
        for state in self.fa.final_states().iter() {
            set.add(state)?;
        }
        Ok(set.unbind())
    }

    fn accepts(&self, py: Python<'_>, word: Vec<PySymbol>) -> PyResult<bool> {
        accepts_word(py, &self.fa, &word)
    }

    fn is_empty(&self) -> bool {
        self.fa.is_empty()
    }

    fn to_regex(&self) -> String {
        self.fa.to_regex().to_string()
    }

    fn to_networkx<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        to_networkx(py, &self.fa, &self.symbols)
    }

    /// Minimize the DFA (returns a new minimized DFA).
    fn minimize(&self) -> PyResult<PyDFA> {
        Ok(PyDFA {
            fa: self.fa.minimize().map_err(to_py_err)?,
            symbols: self.symbols.clone(),
        })
    }
}

/// Register the automaton submodule.
pub fn automaton(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyState>()?;
    m.add_class::<PySymbol>()?;
    m.add_class::<PyEpsilon>()?;
    m.add_class::<PyEpsilonNFA>()?;
    m.add_class::<PyDFA>()?;
    Ok(())
}
