//! Total deterministic transition tables and Hopcroft minimization.

use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::SymbolId;
use crate::error::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use std::collections::VecDeque;

/// The reachable part of a deterministic automaton, made total.
///
/// Rows are indexed by dense table states, columns by symbol ID. A missing
/// transition in the source automaton points at an extra absorbing,
/// non-final `sink` row, which only exists when something was missing.
#[derive(Debug, Clone)]
struct DfaTable {
    num_symbols: usize,
    start: usize,
    /// Original state of each table row; `None` for the sink
    origin: Vec<Option<StateId>>,
    final_states: StateSet,
    /// Row-major: `transitions[state * num_symbols + symbol]`
    transitions: Vec<usize>,
    /// Reverse transitions: `(destination, symbol) -> sources`
    reverse_transitions: Vec<Vec<usize>>,
}

impl DfaTable {
    fn from_automaton(dfa: &FiniteAutomaton) -> Result<Self> {
        if !dfa.is_deterministic() {
            return Err(Error::NotDeterministic);
        }
        let Some(start) = dfa.start_states().first() else {
            return Err(Error::NotDeterministic);
        };
        let num_symbols = dfa.alphabet().len();

        // Dense numbering of reachable states, in BFS order
        let mut index: IndexMap<StateId, usize> = IndexMap::new();
        index.insert(start, 0);
        let mut rows: Vec<Vec<Option<StateId>>> = Vec::new();
        let mut cursor = 0;
        while let Some((&state, _)) = index.get_index(cursor) {
            let row: Vec<Option<StateId>> = dfa
                .alphabet()
                .ids()
                .map(|symbol| {
                    dfa.relation()
                        .get(state, symbol)
                        .and_then(StateSet::first)
                })
                .collect();
            for next in row.iter().flatten() {
                let len = index.len();
                index.entry(*next).or_insert(len);
            }
            rows.push(row);
            cursor += 1;
        }

        let reachable = index.len();
        let needs_sink = rows.iter().flatten().any(Option::is_none);
        let num_states = reachable + usize::from(needs_sink);
        let sink = reachable;

        let mut transitions = Vec::with_capacity(num_states * num_symbols);
        for row in &rows {
            transitions.extend(row.iter().map(|next| match next {
                Some(next) => index[next],
                None => sink,
            }));
        }
        if needs_sink {
            transitions.extend(std::iter::repeat_n(sink, num_symbols));
        }

        let mut origin: Vec<Option<StateId>> = index.keys().copied().map(Some).collect();
        if needs_sink {
            origin.push(None);
        }

        let final_states = origin
            .iter()
            .enumerate()
            .filter(|(_, orig)| orig.is_some_and(|s| dfa.is_final_state(s)))
            .map(|(row, _)| row as StateId)
            .collect();

        let mut reverse_transitions = vec![Vec::new(); num_states * num_symbols];
        for state in 0..num_states {
            for symbol in 0..num_symbols {
                let dest = transitions[state * num_symbols + symbol];
                reverse_transitions[dest * num_symbols + symbol].push(state);
            }
        }

        Ok(Self {
            num_symbols,
            start: 0,
            origin,
            final_states,
            transitions,
            reverse_transitions,
        })
    }

    fn num_states(&self) -> usize {
        self.origin.len()
    }

    fn transition(&self, state: usize, symbol: usize) -> usize {
        self.transitions[state * self.num_symbols + symbol]
    }

    /// Find all states that can reach the target set on a given symbol.
    fn find_predecessors(&self, targets: &StateSet, symbol: usize) -> StateSet {
        let mut predecessors = StateSet::with_capacity(self.num_states());
        for target in targets.iter() {
            let sources = &self.reverse_transitions[target as usize * self.num_symbols + symbol];
            predecessors.extend(sources.iter().map(|&s| s as StateId));
        }
        predecessors
    }

    /// Hopcroft's partition refinement. Returns the coarsest partition of
    /// the table's states into language-equivalence classes.
    fn refine(&self) -> Vec<StateSet> {
        let all: StateSet = (0..self.num_states() as StateId).collect();
        let final_states = self.final_states.clone();
        let non_final = all.difference(&final_states);

        let mut partitions: Vec<StateSet> = Vec::new();
        if !final_states.is_empty() {
            partitions.push(final_states);
        }
        if !non_final.is_empty() {
            partitions.push(non_final);
        }

        let mut part_of = vec![0usize; self.num_states()];
        for (idx, partition) in partitions.iter().enumerate() {
            for state in partition.iter() {
                part_of[state as usize] = idx;
            }
        }

        // Worklist of (partition_index, symbol) pairs to process
        let mut worklist: VecDeque<(usize, usize)> = VecDeque::new();
        for idx in 0..partitions.len() {
            for symbol in 0..self.num_symbols {
                worklist.push_back((idx, symbol));
            }
        }

        while let Some((splitter_idx, symbol)) = worklist.pop_front() {
            let predecessors = self.find_predecessors(&partitions[splitter_idx], symbol);
            if predecessors.is_empty() {
                continue;
            }

            let touched: IndexSet<usize> =
                predecessors.iter().map(|s| part_of[s as usize]).collect();

            for part_idx in touched {
                let partition = &partitions[part_idx];
                let intersection = partition.intersection(&predecessors);
                if intersection.len() == partition.len() {
                    continue;
                }
                let difference = partition.difference(&predecessors);

                // Keep the larger part in place; the smaller one becomes new
                let (keep, add) = if intersection.len() <= difference.len() {
                    (difference, intersection)
                } else {
                    (intersection, difference)
                };

                let new_idx = partitions.len();
                for state in add.iter() {
                    part_of[state as usize] = new_idx;
                }
                trace!(
                    "split partition {part_idx} into {} + {} states",
                    keep.len(),
                    add.len()
                );
                partitions[part_idx] = keep;
                partitions.push(add);

                // Whether or not the old part was pending, re-examining the
                // smaller half for every symbol is enough.
                for sym in 0..self.num_symbols {
                    worklist.push_back((new_idx, sym));
                }
            }
        }

        partitions
    }
}

/// Build a minimized automaton from the refined partitions of `table`.
fn build_minimized_dfa(
    source: &FiniteAutomaton,
    table: &DfaTable,
    partitions: &[StateSet],
) -> FiniteAutomaton {
    let mut part_of = vec![0usize; table.num_states()];
    for (idx, partition) in partitions.iter().enumerate() {
        for state in partition.iter() {
            part_of[state as usize] = idx;
        }
    }
    let representative = |part: usize| partitions[part].first().map_or(0, |s| s as usize);
    let is_final_part = |part: usize| table.final_states.contains(representative(part) as StateId);
    let successor = |part: usize, symbol: usize| part_of[table.transition(representative(part), symbol)];

    // Parts that can reach a final part
    let mut live = vec![false; partitions.len()];
    let mut changed = true;
    for (part, flag) in live.iter_mut().enumerate() {
        *flag = is_final_part(part);
    }
    while changed {
        changed = false;
        for part in 0..partitions.len() {
            if !live[part] && (0..table.num_symbols).any(|sym| live[successor(part, sym)]) {
                live[part] = true;
                changed = true;
            }
        }
    }

    // Number kept parts in BFS order from the start part so the result is
    // canonical up to the alphabet order.
    let start_part = part_of[table.start];
    let mut numbering: IndexMap<usize, StateId> = IndexMap::new();
    numbering.insert(start_part, 0);
    let mut cursor = 0;
    while let Some((&part, _)) = numbering.get_index(cursor) {
        for symbol in 0..table.num_symbols {
            let next = successor(part, symbol);
            if live[next] {
                let len = numbering.len() as StateId;
                numbering.entry(next).or_insert(len);
            }
        }
        cursor += 1;
    }

    let mut minimized = FiniteAutomaton::with_alphabet(source.alphabet().clone());
    for (&part, &state) in &numbering {
        minimized.ensure_state(state);
        let names: Vec<String> = partitions[part]
            .iter()
            .filter_map(|row| table.origin[row as usize])
            .map(|orig| source.state_name(orig))
            .collect();
        minimized.set_state_name(state, format!("{{{}}}", names.join(", ")));
        if is_final_part(part) {
            minimized.add_final_state(state);
        }
        for symbol in 0..table.num_symbols {
            let next = successor(part, symbol);
            if !live[next] {
                continue;
            }
            if let Some(&dest) = numbering.get(&next) {
                minimized.add_transition_id(state, symbol as SymbolId, dest);
            }
        }
    }
    minimized.add_start_state(0);
    minimized
}

impl FiniteAutomaton {
    /// Add a single non-final absorbing state and route every missing
    /// (state, symbol) transition to it. Returns an unchanged copy when
    /// nothing is missing. The language never changes.
    pub fn complete(&self) -> FiniteAutomaton {
        let mut result = self.clone();
        let missing: Vec<(StateId, SymbolId)> = self
            .states()
            .flat_map(|state| self.alphabet.ids().map(move |symbol| (state, symbol)))
            .filter(|&(state, symbol)| self.transitions.get(state, symbol).is_none())
            .collect();
        if missing.is_empty() {
            return result;
        }

        let sink = result.add_state();
        for (state, symbol) in missing {
            result.add_transition_id(state, symbol, sink);
        }
        for symbol in self.alphabet.ids() {
            result.add_transition_id(sink, symbol, sink);
        }
        result
    }

    /// Minimize a deterministic automaton.
    ///
    /// Unreachable states are dropped and missing transitions are treated as
    /// going to an absorbing rejecting state. Parts that cannot reach a final
    /// part are trimmed again from the result, edges into them included.
    /// When the language is empty only a bare non-final start is left. The
    /// result has the fewest states of any trimmed DFA for the language.
    ///
    /// Fails with [`Error::NotDeterministic`] on anything that is not
    /// deterministic; call [`FiniteAutomaton::determinize`] first.
    pub fn minimize(&self) -> Result<FiniteAutomaton> {
        let table = DfaTable::from_automaton(self)?;
        let partitions = table.refine();
        let minimized = build_minimized_dfa(self, &table, &partitions);
        debug!(
            "minimization: {} states -> {} states",
            self.num_states(),
            minimized.num_states()
        );
        Ok(minimized)
    }
}
