use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::machine::{Symbol, push_unique};

/// A state of a Mealy machine. Outputs live on the transitions, so the state
/// carries nothing but its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MealyNode {
    pub name: String,
}

impl MealyNode {
    pub fn new(name: impl Into<String>) -> Self {
        MealyNode { name: name.into() }
    }
}

/// A transition payload of a Mealy machine: the consumed input symbol and the
/// output emitted while taking the transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MealyEdge {
    pub input: Symbol,
    pub output: Symbol,
}

/// A deterministic Mealy machine over the same ordered substrate as
/// [MooreMachine](crate::machine::moore::MooreMachine): node indices follow
/// insertion order and the input alphabet is an ordered list.
#[derive(Debug, Clone)]
pub struct MealyMachine {
    pub graph: DiGraph<MealyNode, MealyEdge>,
    input_alphabet: Vec<Symbol>,
    output_alphabet: Vec<Symbol>,
    initial: Option<NodeIndex>,
}

impl MealyMachine {
    pub fn new(input_alphabet: Vec<Symbol>) -> Self {
        MealyMachine {
            graph: DiGraph::new(),
            input_alphabet,
            output_alphabet: vec![],
            initial: None,
        }
    }

    pub fn add_state(&mut self, name: impl Into<String>) -> NodeIndex {
        self.graph.add_node(MealyNode::new(name))
    }

    /// Adds the transition `from --input/output--> to`. The output symbol is
    /// recorded in the output alphabet in first-encounter order.
    ///
    /// Panics if the input symbol is not declared or `from` already has a
    /// transition for it; raw tables are validated by the loader instead.
    pub fn add_transition(&mut self, from: NodeIndex, to: NodeIndex, input: &str, output: &str) {
        assert!(
            self.input_alphabet.iter().any(|s| s == input),
            "symbol {:?} is not part of the input alphabet",
            input
        );
        assert!(
            self.transition(from, input).is_none(),
            "state {:?} already has a transition for {:?}",
            self.graph[from].name,
            input
        );

        push_unique(&mut self.output_alphabet, output);
        self.graph.add_edge(
            from,
            to,
            MealyEdge {
                input: input.to_string(),
                output: output.to_string(),
            },
        );
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

    pub fn state(&self, index: NodeIndex) -> &MealyNode {
        &self.graph[index]
    }

    /// State indices in declared order.
    pub fn states(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn find_state(&self, name: &str) -> Option<NodeIndex> {
        self.states().find(|&s| self.graph[s].name == name)
    }

    /// The destination and emitted output for consuming `symbol` in `state`.
    pub fn transition(&self, state: NodeIndex, symbol: &str) -> Option<(NodeIndex, &Symbol)> {
        self.graph
            .edges_directed(state, Direction::Outgoing)
            .find(|edge| edge.weight().input == symbol)
            .map(|edge| (edge.target(), &edge.weight().output))
    }

    /// Runs the machine on `word` from the initial state, emitting one output
    /// per consumed symbol. Stops early when a transition is missing.
    pub fn run(&self, word: &[Symbol]) -> Vec<Symbol> {
        let mut outputs = Vec::with_capacity(word.len());
        let mut current = self.initial();

        for symbol in word {
            match self.transition(current, symbol) {
                Some((next, output)) => {
                    outputs.push(output.clone());
                    current = next;
                }
                None => break,
            }
        }

        outputs
    }
}
