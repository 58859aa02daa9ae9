//! Closure operations on automata. Every operation builds a fresh automaton
//! from disjoint copies of its operands; operands are never touched.

use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::StateId;
use crate::automaton::symbol::{EPSILON, SymbolId, is_epsilon};
use crate::error::{Error, Result};
use log::debug;

impl FiniteAutomaton {
    /// Copy `other`'s states and transitions into `self` under fresh IDs,
    /// matching symbols by name. Returns the offset added to `other`'s IDs.
    /// Start and final states are left to the caller.
    fn embed(&mut self, other: &FiniteAutomaton) -> StateId {
        let offset = self.num_states;
        self.num_states += other.num_states;
        for state in other.states() {
            if let Some(name) = other.names.name(state) {
                self.names.set(offset + state, name.to_string());
            }
        }

        let symbols: Vec<SymbolId> = other
            .alphabet
            .names()
            .map(|name| self.alphabet.intern(name))
            .collect();
        for (src, sym, dst) in other.transitions.all() {
            let mapped = if is_epsilon(sym) {
                EPSILON
            } else {
                symbols[sym as usize]
            };
            self.transitions.add(offset + src, mapped, offset + dst);
        }
        offset
    }

    /// Automaton accepting the words accepted by `self` or by `other`.
    ///
    /// A fresh start state is epsilon-linked to both operands' start states;
    /// both operands' final states stay final.
    pub fn union(&self, other: &FiniteAutomaton) -> FiniteAutomaton {
        let mut result = FiniteAutomaton::new();
        let left = result.embed(self);
        let right = result.embed(other);

        let start = result.add_state();
        result.add_start_state(start);
        for s in self.start_states.iter() {
            result.add_epsilon_transition(start, left + s);
        }
        for s in other.start_states.iter() {
            result.add_epsilon_transition(start, right + s);
        }
        for f in self.final_states.iter() {
            result.add_final_state(left + f);
        }
        for f in other.final_states.iter() {
            result.add_final_state(right + f);
        }
        result
    }

    /// Automaton accepting `uv` for every `u` accepted by `self` and `v`
    /// accepted by `other`.
    pub fn concatenate(&self, other: &FiniteAutomaton) -> FiniteAutomaton {
        let mut result = FiniteAutomaton::new();
        let left = result.embed(self);
        let right = result.embed(other);

        for s in self.start_states.iter() {
            result.add_start_state(left + s);
        }
        for f in self.final_states.iter() {
            for s in other.start_states.iter() {
                result.add_epsilon_transition(left + f, right + s);
            }
        }
        for f in other.final_states.iter() {
            result.add_final_state(right + f);
        }
        if other.accepts([""; 0]) {
            for f in self.final_states.iter() {
                result.add_final_state(left + f);
            }
        }
        result
    }

    /// Kleene closure: zero or more repetitions of words of `self`.
    pub fn kleene_star(&self) -> FiniteAutomaton {
        let mut result = FiniteAutomaton::new();
        let inner = result.embed(self);

        let start = result.add_state();
        let end = result.add_state();
        result.add_start_state(start);
        result.add_final_state(end);
        result.add_epsilon_transition(start, end);
        for s in self.start_states.iter() {
            result.add_epsilon_transition(start, inner + s);
        }
        for f in self.final_states.iter() {
            for s in self.start_states.iter() {
                result.add_epsilon_transition(inner + f, inner + s);
            }
            result.add_epsilon_transition(inner + f, end);
        }
        result
    }

    /// Product automaton accepting the words accepted by both operands.
    ///
    /// Both operands must be deterministic and total. The result's alphabet
    /// is the set of symbols the operands have in common, and it fails with
    /// [`Error::TooManyStates`] when the pairs cannot be numbered.
    pub fn intersect(&self, other: &FiniteAutomaton) -> Result<FiniteAutomaton> {
        for operand in [self, other] {
            if !operand.is_deterministic() {
                return Err(Error::NotDeterministic);
            }
            if !operand.is_total() {
                return Err(Error::NotTotal);
            }
        }
        self.product(other)
    }

    /// Full product `self.states × other.states` of two total DFAs.
    ///
    /// Fails with [`Error::TooManyStates`] when the pair count does not fit
    /// in a `StateId`; every pair index is below that count.
    fn product(&self, other: &FiniteAutomaton) -> Result<FiniteAutomaton> {
        let width = other.num_states;
        let num_pairs = self
            .num_states
            .checked_mul(width)
            .ok_or(Error::TooManyStates)?;

        let mut result = FiniteAutomaton::new();
        let common: Vec<(SymbolId, SymbolId, SymbolId)> = self
            .alphabet
            .names()
            .filter_map(|name| {
                let mine = self.alphabet.id(name)?;
                let theirs = other.alphabet.id(name)?;
                Some((result.alphabet.intern(name), mine, theirs))
            })
            .collect();

        let pair = |a: StateId, b: StateId| a * width + b;
        result.num_states = num_pairs;

        for a in self.states() {
            for b in other.states() {
                let state = pair(a, b);
                result
                    .names
                    .set(state, format!("({}; {})", self.state_name(a), other.state_name(b)));
                if self.is_final_state(a) && other.is_final_state(b) {
                    result.add_final_state(state);
                }
                for &(symbol, mine, theirs) in &common {
                    let next_a = self.transitions.get(a, mine).and_then(|d| d.first());
                    let next_b = other.transitions.get(b, theirs).and_then(|d| d.first());
                    if let (Some(next_a), Some(next_b)) = (next_a, next_b) {
                        result.add_transition_id(state, symbol, pair(next_a, next_b));
                    }
                }
            }
        }
        for a in self.start_states.iter() {
            for b in other.start_states.iter() {
                result.add_start_state(pair(a, b));
            }
        }

        debug!(
            "product: {} x {} states -> {} states",
            self.num_states,
            other.num_states,
            result.num_states
        );
        Ok(result)
    }

    /// Automaton accepting exactly the words over the alphabet that `self`
    /// rejects. `self` must be deterministic and total; the universe is
    /// `self`'s alphabet, so register extra symbols before completing.
    pub fn complement(&self) -> Result<FiniteAutomaton> {
        if !self.is_deterministic() {
            return Err(Error::NotDeterministic);
        }
        if !self.is_total() {
            return Err(Error::NotTotal);
        }
        Ok(self.flip_finals())
    }

    fn flip_finals(&self) -> FiniteAutomaton {
        let mut result = self.clone();
        result.final_states = self
            .states()
            .filter(|&s| !self.is_final_state(s))
            .collect();
        result
    }

    /// Automaton accepting the words of `self` that `other` rejects, over the
    /// union of both alphabets. Works on any pair of automata whose
    /// determinized product fits in a `StateId`.
    pub fn difference(&self, other: &FiniteAutomaton) -> Result<FiniteAutomaton> {
        let left = self.widened(other).determinize().complete();
        let right = other.widened(self).determinize().complete().flip_finals();
        left.product(&right)
    }

    /// Copy of `self` whose alphabet also holds every symbol of `other`.
    pub(crate) fn widened(&self, other: &FiniteAutomaton) -> FiniteAutomaton {
        let mut result = self.clone();
        for name in other.alphabet.names() {
            result.alphabet.intern(name);
        }
        result
    }

    /// Automaton accepting the mirror image of every word of `self`.
    pub fn reverse(&self) -> FiniteAutomaton {
        let mut result = FiniteAutomaton::with_alphabet(self.alphabet.clone());
        result.num_states = self.num_states;
        result.names = self.names.clone();
        for (src, sym, dst) in self.transitions.all() {
            result.transitions.add(dst, sym, src);
        }
        result.start_states = self.final_states.clone();
        result.final_states = self.start_states.clone();
        result
    }
}
