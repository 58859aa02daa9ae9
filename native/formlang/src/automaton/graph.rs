//! Export of an automaton as a labeled multigraph, for visualization.
//!
//! This is a textual description only; nothing here reads a graph back.

use crate::automaton::finite_automaton::FiniteAutomaton;
use crate::automaton::state::StateId;
use crate::automaton::symbol::Label;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: StateId,
    pub label: String,
    pub is_start: bool,
    pub is_final: bool,
}

/// A transition; `label` is `None` for epsilon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: StateId,
    pub target: StateId,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

impl FiniteAutomaton {
    /// Nodes in state order, edges in insertion order of their
    /// (source, label) pair.
    pub fn to_graph(&self) -> Graph {
        let nodes = self
            .states()
            .map(|state| GraphNode {
                id: state,
                label: self.state_name(state),
                is_start: self.is_start_state(state),
                is_final: self.is_final_state(state),
            })
            .collect();
        let edges = self
            .labeled_transitions()
            .map(|(source, label, target)| GraphEdge {
                source,
                target,
                label: match label {
                    Label::Epsilon => None,
                    Label::Symbol(name) => Some(name),
                },
            })
            .collect();
        Graph { nodes, edges }
    }

    /// Graphviz rendering. Final states get a double border and each start
    /// state an arrow from an invisible `starting_<id>` node.
    pub fn to_dot(&self) -> String {
        let graph = self.to_graph();
        let mut dot = String::from("digraph {\n");
        for node in &graph.nodes {
            let peripheries = if node.is_final { 2 } else { 1 };
            let _ = writeln!(
                dot,
                "    {} [label={}, peripheries={}];",
                node.id,
                quoted(&node.label),
                peripheries
            );
            if node.is_start {
                let _ = writeln!(
                    dot,
                    "    starting_{0} [label=\"\", shape=none, height=0, width=0];\n    starting_{0} -> {0};",
                    node.id
                );
            }
        }
        for edge in &graph.edges {
            let label = edge.label.as_deref().unwrap_or("ε");
            let _ = writeln!(
                dot,
                "    {} -> {} [label={}];",
                edge.source,
                edge.target,
                quoted(label)
            );
        }
        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FiniteAutomaton {
        let mut enfa = FiniteAutomaton::new();
        let q0 = enfa.state("q0");
        let q1 = enfa.state("q1");
        enfa.add_transition(q0, "abc", q1);
        enfa.add_transition(q0, "d", q1);
        enfa.add_epsilon_transition(q0, 2);
        enfa.add_start_state(q0);
        enfa.add_final_state(q1);
        enfa
    }

    #[test]
    fn test_to_graph() {
        let graph = sample().to_graph();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 3);
        assert!(graph.nodes[0].is_start);
        assert!(graph.nodes[1].is_final);
        assert_eq!(graph.nodes[1].label, "q1");
        assert_eq!(graph.nodes[2].label, "2");
        assert!(graph.edges.iter().any(|e| e.label.is_none() && e.target == 2));
        assert!(
            graph
                .edges
                .iter()
                .any(|e| e.label.as_deref() == Some("abc"))
        );
    }

    #[test]
    fn test_to_dot() {
        let dot = sample().to_dot();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("1 [label=\"q1\", peripheries=2];"));
        assert!(dot.contains("0 [label=\"q0\", peripheries=1];"));
        assert!(dot.contains("starting_0 -> 0;"));
        assert!(dot.contains("0 -> 2 [label=\"ε\"];"));
        assert!(dot.contains("0 -> 1 [label=\"d\"];"));
    }

    #[test]
    fn test_dot_escapes_quotes() {
        let mut fa = FiniteAutomaton::new();
        fa.add_transition(0, "\"", 0);
        assert!(fa.to_dot().contains("0 -> 0 [label=\"\\\"\"];"));
    }
}
