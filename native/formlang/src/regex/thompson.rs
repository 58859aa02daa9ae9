//! Thompson construction: operator tree to epsilon-NFA.

use crate::automaton::{FiniteAutomaton, StateId};
use crate::regex::tree::Regex;
use log::debug;

/// One sub-automaton under construction: a single entry and a single exit.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    end: StateId,
}

impl Regex {
    /// Epsilon-NFA accepting the language of the expression.
    ///
    /// Every node adds at most two states and four edges, so the result is
    /// linear in the size of the tree.
    pub fn to_automaton(&self) -> FiniteAutomaton {
        let mut enfa = FiniteAutomaton::new();
        let fragment = build(&mut enfa, self);
        enfa.add_start_state(fragment.start);
        enfa.add_final_state(fragment.end);
        debug!(
            "thompson construction: {} operators -> {} states",
            self.num_operators(),
            enfa.num_states()
        );
        enfa
    }
}

fn build(enfa: &mut FiniteAutomaton, regex: &Regex) -> Fragment {
    match regex {
        Regex::Empty => Fragment {
            start: enfa.add_state(),
            end: enfa.add_state(),
        },
        Regex::Epsilon => {
            let (start, end) = (enfa.add_state(), enfa.add_state());
            enfa.add_epsilon_transition(start, end);
            Fragment { start, end }
        }
        Regex::Symbol(name) => {
            let (start, end) = (enfa.add_state(), enfa.add_state());
            enfa.add_transition(start, name.as_str(), end);
            Fragment { start, end }
        }
        Regex::Concatenation(left, right) => {
            let left = build(enfa, left);
            let right = build(enfa, right);
            enfa.add_epsilon_transition(left.end, right.start);
            Fragment {
                start: left.start,
                end: right.end,
            }
        }
        Regex::Union(left, right) => {
            let left = build(enfa, left);
            let right = build(enfa, right);
            let (start, end) = (enfa.add_state(), enfa.add_state());
            for branch in [left, right] {
                enfa.add_epsilon_transition(start, branch.start);
                enfa.add_epsilon_transition(branch.end, end);
            }
            Fragment { start, end }
        }
        Regex::KleeneStar(inner) => {
            let inner = build(enfa, inner);
            let (start, end) = (enfa.add_state(), enfa.add_state());
            enfa.add_epsilon_transition(start, inner.start);
            enfa.add_epsilon_transition(start, end);
            enfa.add_epsilon_transition(inner.end, inner.start);
            enfa.add_epsilon_transition(inner.end, end);
            Fragment { start, end }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab_star_or_c() -> Regex {
        Regex::union(
            Regex::concat(Regex::symbol("a"), Regex::star(Regex::symbol("b"))),
            Regex::symbol("c"),
        )
    }

    #[test]
    fn test_symbol() {
        let enfa = Regex::symbol("a").to_automaton();
        assert_eq!(enfa.num_states(), 2);
        assert_eq!(enfa.num_transitions(), 1);
        assert!(enfa.accepts(["a"]));
        assert!(!enfa.accepts([""; 0]));
    }

    #[test]
    fn test_empty_and_epsilon() {
        let empty = Regex::Empty.to_automaton();
        assert!(empty.is_empty());

        let epsilon = Regex::Epsilon.to_automaton();
        assert!(epsilon.accepts([""; 0]));
        assert!(epsilon.alphabet().is_empty());
    }

    #[test]
    fn test_composite() {
        let enfa = ab_star_or_c().to_automaton();
        assert!(enfa.accepts(["a"]));
        assert!(enfa.accepts(["a", "b", "b"]));
        assert!(enfa.accepts(["c"]));
        assert!(!enfa.accepts(["b"]));
        assert!(!enfa.accepts(["a", "c"]));
        assert!(!enfa.accepts([""; 0]));
    }

    #[test]
    fn test_star_accepts_repetitions() {
        let regex = Regex::star(ab_star_or_c());
        assert!(regex.accepts([""; 0]));
        assert!(regex.accepts(["c", "a", "b", "c", "c"]));
        assert!(!regex.accepts(["b", "a"]));
    }

    #[test]
    fn test_size_is_linear() {
        let regex = ab_star_or_c();
        let enfa = regex.to_automaton();
        let nodes = regex.num_symbols() + regex.num_operators();
        assert!(enfa.num_states() as usize <= 2 * nodes);
    }
}
