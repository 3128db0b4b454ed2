use hashbrown::{HashMap, HashSet};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    error::FsmError,
    machine::{mealy::MealyMachine, moore::MooreMachine},
};

/// All nodes reachable from `start` by following outgoing edges, including
/// `start` itself.
fn reachable_from<N, E>(graph: &DiGraph<N, E>, start: NodeIndex) -> HashSet<NodeIndex> {
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        for edge in graph.edges_directed(node, Direction::Outgoing) {
            if visited.insert(edge.target()) {
                stack.push(edge.target());
            }
        }
    }

    visited
}

impl MooreMachine {
    /// Returns a copy of the machine without the states that cannot be
    /// reached from the initial state. The initial state is always retained
    /// and the declared state order is preserved.
    ///
    /// Unreachable states must never influence minimization, so this runs
    /// before any partition is built.
    pub fn prune_unreachable(&self) -> Result<MooreMachine, FsmError> {
        let reachable = reachable_from(&self.graph, self.initial());
        if reachable.len() < 2 {
            return Err(FsmError::DegenerateAutomaton {
                states: reachable.len(),
            });
        }

        let mut pruned = MooreMachine::new(self.input_alphabet().to_vec());
        let mut index_map: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        for state in self.states() {
            if reachable.contains(&state) {
                let node = self.state(state);
                index_map.insert(state, pruned.add_state(node.name.clone(), node.output.clone()));
            }
        }

        for state in self.states() {
            if !reachable.contains(&state) {
                continue;
            }
            for symbol in self.input_alphabet() {
                if let Some(target) = self.successor(state, symbol) {
                    pruned.add_transition(index_map[&state], index_map[&target], symbol);
                }
            }
        }

        pruned.set_initial(index_map[&self.initial()]);

        Ok(pruned)
    }
}

impl MealyMachine {
    /// See [MooreMachine::prune_unreachable].
    pub fn prune_unreachable(&self) -> Result<MealyMachine, FsmError> {
        let reachable = reachable_from(&self.graph, self.initial());
        if reachable.len() < 2 {
            return Err(FsmError::DegenerateAutomaton {
                states: reachable.len(),
            });
        }

        let mut pruned = MealyMachine::new(self.input_alphabet().to_vec());
        let mut index_map: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        for state in self.states() {
            if reachable.contains(&state) {
                index_map.insert(state, pruned.add_state(self.state(state).name.clone()));
            }
        }

        for state in self.states() {
            if !reachable.contains(&state) {
                continue;
            }
            for symbol in self.input_alphabet() {
                if let Some((target, output)) = self.transition(state, symbol) {
                    let output = output.clone();
                    pruned.add_transition(index_map[&state], index_map[&target], symbol, &output);
                }
            }
        }

        pruned.set_initial(index_map[&self.initial()]);

        Ok(pruned)
    }
}
