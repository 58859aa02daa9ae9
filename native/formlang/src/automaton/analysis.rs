//! Decision procedures: emptiness, finiteness, acyclicity and equivalence.

use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::{StateId, StateSet};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl FiniteAutomaton {
    /// States reachable from a start state, epsilon edges included.
    pub fn reachable_states(&self) -> StateSet {
        let mut reachable = StateSet::with_capacity(self.num_states as usize);
        let mut queue: VecDeque<StateId> = self.start_states.iter().collect();

        while let Some(state) = queue.pop_front() {
            if !reachable.insert(state) {
                continue;
            }
            for next in self.successors(state).iter() {
                if !reachable.contains(next) {
                    queue.push_back(next);
                }
            }
        }
        reachable
    }

    /// States from which some final state can be reached.
    pub fn coreachable_states(&self) -> StateSet {
        let mut predecessors: Vec<Vec<StateId>> = vec![Vec::new(); self.num_states as usize];
        for (src, _, dst) in self.transitions.all() {
            predecessors[dst as usize].push(src);
        }

        let mut coreachable = StateSet::with_capacity(self.num_states as usize);
        let mut queue: VecDeque<StateId> = self.final_states.iter().collect();
        while let Some(state) = queue.pop_front() {
            if !coreachable.insert(state) {
                continue;
            }
            for &prev in &predecessors[state as usize] {
                if !coreachable.contains(prev) {
                    queue.push_back(prev);
                }
            }
        }
        coreachable
    }

    /// States that are both reachable and co-reachable.
    pub fn useful_states(&self) -> StateSet {
        self.reachable_states()
            .intersection(&self.coreachable_states())
    }

    /// Check if the automaton accepts no word at all.
    pub fn is_empty(&self) -> bool {
        !self.reachable_states().intersects(&self.final_states)
    }

    /// Check that the useful part of the graph has no cycle.
    ///
    /// This is a structural check in which epsilon edges count as edges, so
    /// an epsilon cycle reports infinite even when it adds no word (the
    /// Thompson automaton of `(ε)*` accepts only the empty word). Call
    /// [`FiniteAutomaton::remove_epsilon_transitions`] first to decide
    /// whether the language itself is finite.
    pub fn is_finite(&self) -> bool {
        !self.has_cycle(&self.useful_states())
    }

    /// Check if no cycle can be reached from a start state.
    pub fn is_acyclic(&self) -> bool {
        !self.has_cycle(&self.reachable_states())
    }

    /// Iterative DFS over the subgraph induced by `allowed`.
    fn has_cycle(&self, allowed: &StateSet) -> bool {
        let mut marks = vec![Mark::Unvisited; self.num_states as usize];
        let successors = |state: StateId| -> Vec<StateId> {
            self.successors(state)
                .iter()
                .filter(|&next| allowed.contains(next))
                .collect()
        };

        for root in allowed.iter() {
            if marks[root as usize] != Mark::Unvisited {
                continue;
            }
            marks[root as usize] = Mark::OnStack;
            let mut stack = vec![(root, successors(root), 0usize)];

            while let Some(frame) = stack.last_mut() {
                if frame.2 < frame.1.len() {
                    let next = frame.1[frame.2];
                    frame.2 += 1;
                    match marks[next as usize] {
                        Mark::OnStack => return true,
                        Mark::Unvisited => {
                            marks[next as usize] = Mark::OnStack;
                            stack.push((next, successors(next), 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    let state = frame.0;
                    stack.pop();
                    marks[state as usize] = Mark::Done;
                }
            }
        }
        false
    }

    /// Check if both automata accept the same language.
    ///
    /// Both sides are determinized and minimized over the union of their
    /// alphabets, then walked in lockstep from the start states; the walk
    /// must never pair a state with two different partners.
    pub fn is_equivalent(&self, other: &FiniteAutomaton) -> bool {
        let (Ok(left), Ok(right)) = (
            self.widened(other).determinize().minimize(),
            other.widened(self).determinize().minimize(),
        ) else {
            return false;
        };
        if left.num_states != right.num_states {
            return false;
        }
        let (Some(left_start), Some(right_start)) =
            (left.start_states.first(), right.start_states.first())
        else {
            return false;
        };

        let n = left.num_states as usize;
        let mut forward: Vec<Option<StateId>> = vec![None; n];
        let mut backward: Vec<Option<StateId>> = vec![None; n];
        forward[left_start as usize] = Some(right_start);
        backward[right_start as usize] = Some(left_start);
        let mut queue = VecDeque::from([(left_start, right_start)]);
        let mut visited = 1;

        while let Some((l, r)) = queue.pop_front() {
            if left.is_final_state(l) != right.is_final_state(r) {
                return false;
            }
            for name in left.alphabet.names() {
                let next_l = left
                    .alphabet
                    .id(name)
                    .and_then(|sym| left.transitions.get(l, sym))
                    .and_then(StateSet::first);
                let next_r = right
                    .alphabet
                    .id(name)
                    .and_then(|sym| right.transitions.get(r, sym))
                    .and_then(StateSet::first);
                match (next_l, next_r) {
                    (None, None) => {}
                    (Some(a), Some(b)) => match (forward[a as usize], backward[b as usize]) {
                        (None, None) => {
                            forward[a as usize] = Some(b);
                            backward[b as usize] = Some(a);
                            visited += 1;
                            queue.push_back((a, b));
                        }
                        (Some(x), Some(y)) if x == b && y == a => {}
                        _ => return false,
                    },
                    _ => return false,
                }
            }
        }
        visited == n
    }
}
