//! DOT rendering of machines.
//!
//! Rendering is purely presentational: one node per state, and one edge per
//! distinct (source, destination) pair whose label joins every symbol that
//! causes the edge, in declared symbol order.

use hashbrown::HashMap;
use itertools::Itertools;

use crate::machine::{
    ACCEPTING_OUTPUT, EPSILON_SYMBOL,
    mealy::MealyMachine,
    moore::MooreMachine,
    nfa::{Nfa, NfaEdge},
};

/// Accumulates labels per (source, destination) pair, keeping the pairs in
/// first-encounter order so the rendered text is stable.
struct EdgeMerger {
    order: Vec<(usize, usize)>,
    labels: HashMap<(usize, usize), Vec<String>>,
}

impl EdgeMerger {
    fn new() -> Self {
        EdgeMerger {
            order: vec![],
            labels: HashMap::new(),
        }
    }

    fn add(&mut self, from: usize, to: usize, label: String) {
        let key = (from, to);
        if !self.labels.contains_key(&key) {
            self.order.push(key);
        }
        self.labels.entry(key).or_default().push(label);
    }
}

fn render(node_labels: &[String], accepting: &[usize], initial: usize, edges: &EdgeMerger) -> String {
    let mut dot = String::new();
    dot.push_str("digraph finite_state_machine {\n");
    dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
    dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
    dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
    dot.push_str("rankdir=LR;\n");
    dot.push_str("node [shape=point,label=\"\"]START\n");

    if !accepting.is_empty() {
        dot.push_str(&format!(
            "node [shape = doublecircle]; {};\n",
            accepting.iter().map(|i| i.to_string()).join(" ")
        ));
    }
    dot.push_str("node [shape = circle];\n");

    for (i, label) in node_labels.iter().enumerate() {
        dot.push_str(&format!("{} [ label=\"{}\" ];\n", i, label));
    }

    dot.push_str(&format!("START -> {};\n", initial));

    for key in &edges.order {
        dot.push_str(&format!(
            "{} -> {} [ label=\"{}\" ];\n",
            key.0,
            key.1,
            edges.labels[key].join(", ")
        ));
    }

    dot.push_str("}\n");

    dot
}

fn moore_label(name: &str, output: &str) -> String {
    if output.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", name, output)
    }
}

impl MooreMachine {
    pub fn to_graphviz(&self) -> String {
        let labels: Vec<String> = self
            .states()
            .map(|s| moore_label(&self.state(s).name, &self.state(s).output))
            .collect();
        let accepting: Vec<usize> = self
            .states()
            .filter(|&s| self.state(s).output == ACCEPTING_OUTPUT)
            .map(|s| s.index())
            .collect();

        let mut edges = EdgeMerger::new();
        for state in self.states() {
            for symbol in self.input_alphabet() {
                if let Some(target) = self.successor(state, symbol) {
                    edges.add(state.index(), target.index(), symbol.clone());
                }
            }
        }

        render(&labels, &accepting, self.initial().index(), &edges)
    }
}

impl MealyMachine {
    pub fn to_graphviz(&self) -> String {
        let labels: Vec<String> = self.states().map(|s| self.state(s).name.clone()).collect();

        let mut edges = EdgeMerger::new();
        for state in self.states() {
            for symbol in self.input_alphabet() {
                if let Some((target, output)) = self.transition(state, symbol) {
                    edges.add(
                        state.index(),
                        target.index(),
                        format!("{}/{}", symbol, output),
                    );
                }
            }
        }

        render(&labels, &[], self.initial().index(), &edges)
    }
}

impl Nfa {
    pub fn to_graphviz(&self) -> String {
        use petgraph::{Direction, visit::EdgeRef};

        let labels: Vec<String> = self
            .graph
            .node_indices()
            .map(|s| moore_label(&self.graph[s].name, &self.graph[s].output))
            .collect();
        let accepting: Vec<usize> = self
            .graph
            .node_indices()
            .filter(|&s| self.is_accepting(s))
            .map(|s| s.index())
            .collect();

        let mut edges = EdgeMerger::new();
        for state in self.graph.node_indices() {
            for symbol in self.input_alphabet() {
                for edge in self.graph.edges_directed(state, Direction::Outgoing) {
                    if edge.weight().matches(symbol) {
                        edges.add(state.index(), edge.target().index(), symbol.clone());
                    }
                }
            }
            for edge in self.graph.edges_directed(state, Direction::Outgoing) {
                if matches!(edge.weight(), NfaEdge::Epsilon) {
                    edges.add(
                        state.index(),
                        edge.target().index(),
                        EPSILON_SYMBOL.to_string(),
                    );
                }
            }
        }

        render(&labels, &accepting, self.initial().index(), &edges)
    }
}
