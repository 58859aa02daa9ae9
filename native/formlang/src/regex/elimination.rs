//! State elimination: automaton to operator tree.

use crate::automaton::{FiniteAutomaton, Label, StateId};
use crate::regex::tree::Regex;
use indexmap::IndexMap;
use log::{debug, trace};

/// Order in which inner states are eliminated. Both orders are fixed, so
/// the same automaton always yields the same expression; they differ only in
/// how large that expression gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EliminationOrder {
    /// Fewest outgoing edges first (self-loops not counted), lowest state
    /// number on ties.
    #[default]
    FewestEdges,
    /// Lowest state number first.
    Insertion,
}

/// Generalized automaton whose edges carry expressions. At most one edge
/// per ordered pair of nodes; parallel edges are merged with a union.
struct Generalized {
    edges: IndexMap<(usize, usize), Regex>,
}

impl Generalized {
    fn add(&mut self, from: usize, to: usize, label: Regex) {
        match self.edges.shift_remove(&(from, to)) {
            Some(existing) => {
                self.edges
                    .insert((from, to), Regex::union_simplified(existing, label));
            }
            None => {
                self.edges.insert((from, to), label);
            }
        }
    }

    fn out_degree(&self, node: usize) -> usize {
        self.edges
            .keys()
            .filter(|&&(from, to)| from == node && to != node)
            .count()
    }

    /// Remove `node`, rerouting every path through it.
    fn eliminate(&mut self, node: usize) {
        let self_loop = self.edges.shift_remove(&(node, node));
        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        self.edges.retain(|&(from, to), label| {
            if to == node {
                incoming.push((from, label.clone()));
                false
            } else if from == node {
                outgoing.push((to, label.clone()));
                false
            } else {
                true
            }
        });

        let repeat = self_loop.map_or(Regex::Epsilon, Regex::star_simplified);
        for (from, into) in &incoming {
            for (to, out) in &outgoing {
                let through = Regex::concat_simplified(
                    into.clone(),
                    Regex::concat_simplified(repeat.clone(), out.clone()),
                );
                self.add(*from, *to, through);
            }
        }
    }
}

impl FiniteAutomaton {
    /// Regular expression for the accepted language, eliminating states
    /// fewest-edges first.
    pub fn to_regex(&self) -> Regex {
        self.to_regex_with(EliminationOrder::default())
    }

    /// Regular expression for the accepted language.
    ///
    /// A fresh entry node is linked to every start state and every final
    /// state to a fresh exit node; inner states are then removed one by one
    /// until only the entry and exit remain. States that are unreachable or
    /// cannot reach a final state are dropped first. Returns
    /// [`Regex::Empty`] when the language is empty.
    pub fn to_regex_with(&self, order: EliminationOrder) -> Regex {
        let useful = self.useful_states();
        let entry = self.num_states() as usize;
        let exit = entry + 1;

        let mut graph = Generalized {
            edges: IndexMap::new(),
        };
        for (src, label, dst) in self.labeled_transitions() {
            if !useful.contains(src) || !useful.contains(dst) {
                continue;
            }
            let label = match label {
                Label::Epsilon => Regex::Epsilon,
                Label::Symbol(name) => Regex::Symbol(name),
            };
            graph.add(src as usize, dst as usize, label);
        }
        for start in self.start_states().iter().filter(|&s| useful.contains(s)) {
            graph.add(entry, start as usize, Regex::Epsilon);
        }
        for end in self.final_states().iter().filter(|&s| useful.contains(s)) {
            graph.add(end as usize, exit, Regex::Epsilon);
        }

        let mut remaining: Vec<usize> = useful.iter().map(|s| s as usize).collect();
        while !remaining.is_empty() {
            let pick = match order {
                EliminationOrder::Insertion => 0,
                EliminationOrder::FewestEdges => remaining
                    .iter()
                    .enumerate()
                    .min_by_key(|&(index, &node)| (graph.out_degree(node), index))
                    .map_or(0, |(index, _)| index),
            };
            let node = remaining.remove(pick);
            trace!("eliminating state {}", self.state_name(node as StateId));
            graph.eliminate(node);
        }

        let regex = graph
            .edges
            .shift_remove(&(entry, exit))
            .unwrap_or(Regex::Empty);
        debug!(
            "state elimination: {} states -> {} operators",
            self.num_states(),
            regex.num_operators()
        );
        regex
    }
}
