use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::machine::{ACCEPTING_OUTPUT, Symbol, push_unique};

/// A state of a Moore machine. The output is an immutable attribute of the
/// state itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MooreNode {
    pub name: String,
    pub output: Symbol,
}

impl MooreNode {
    pub fn new(name: impl Into<String>, output: impl Into<Symbol>) -> Self {
        MooreNode {
            name: name.into(),
            output: output.into(),
        }
    }
}

/// A deterministic Moore machine.
///
/// States and input symbols keep their declared order: states are identified
/// by their node index, assigned in insertion order, and the input alphabet
/// is an ordered list. Every algorithm iterates both in that order, so
/// synthesized names and serialized tables are reproducible.
#[derive(Debug, Clone)]
pub struct MooreMachine {
    pub graph: DiGraph<MooreNode, Symbol>,
    input_alphabet: Vec<Symbol>,
    output_alphabet: Vec<Symbol>,
    initial: Option<NodeIndex>,
}

impl MooreMachine {
    pub fn new(input_alphabet: Vec<Symbol>) -> Self {
        MooreMachine {
            graph: DiGraph::new(),
            input_alphabet,
            output_alphabet: vec![],
            initial: None,
        }
    }

    /// Adds a state. Its output symbol is recorded in the output alphabet in
    /// first-encounter order.
    pub fn add_state(&mut self, name: impl Into<String>, output: impl Into<Symbol>) -> NodeIndex {
        let node = MooreNode::new(name, output);
        push_unique(&mut self.output_alphabet, &node.output);
        self.graph.add_node(node)
    }

    /// Adds the transition `from --symbol--> to`.
    ///
    /// Panics if the symbol is not declared or `from` already has a
    /// transition for it. Machines built in code are expected to be
    /// deterministic by construction; raw tables are validated by the loader
    /// instead.
    pub fn add_transition(&mut self, from: NodeIndex, to: NodeIndex, symbol: &str) {
        assert!(
            self.input_alphabet.iter().any(|s| s == symbol),
            "symbol {:?} is not part of the input alphabet",
            symbol
        );
        assert!(
            self.successor(from, symbol).is_none(),
            "state {:?} already has a transition for {:?}",
            self.graph[from].name,
            symbol
        );

        self.graph.add_edge(from, to, symbol.to_string());
    }

    pub fn set_initial(&mut self, state: NodeIndex) {
        self.initial = Some(state);
    }

    /// Panics if no initial state has been set.
    pub fn initial(&self) -> NodeIndex {
        self.initial.expect("machine must have an initial state")
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn input_alphabet(&self) -> &[Symbol] {
        &self.input_alphabet
    }

    pub fn output_alphabet(&self) -> &[Symbol] {
        &self.output_alphabet
    }

    pub fn state(&self, index: NodeIndex) -> &MooreNode {
        &self.graph[index]
    }

    /// State indices in declared order.
    pub fn states(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn find_state(&self, name: &str) -> Option<NodeIndex> {
        self.states().find(|&s| self.graph[s].name == name)
    }

    pub fn successor(&self, state: NodeIndex, symbol: &str) -> Option<NodeIndex> {
        self.graph
            .edges_directed(state, Direction::Outgoing)
            .find(|edge| edge.weight().as_str() == symbol)
            .map(|edge| edge.target())
    }

    /// Runs the machine on `word` from the initial state, emitting the output
    /// of every state entered. Stops early when a transition is missing.
    pub fn run(&self, word: &[Symbol]) -> Vec<Symbol> {
        let mut outputs = Vec::with_capacity(word.len());
        let mut current = self.initial();

        for symbol in word {
            match self.successor(current, symbol) {
                Some(next) => {
                    outputs.push(self.graph[next].output.clone());
                    current = next;
                }
                None => break,
            }
        }

        outputs
    }

    /// Whether the machine accepts `word` under the sentinel-output
    /// convention used by determinized tables.
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut current = self.initial();

        for symbol in word {
            match self.successor(current, symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }

        self.graph[current].output == ACCEPTING_OUTPUT
    }
}
