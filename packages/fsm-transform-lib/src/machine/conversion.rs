//! Lossless translation between the Mealy and Moore labeling conventions.

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use crate::machine::{Symbol, mealy::MealyMachine, moore::MooreMachine};

/// Converts a Mealy machine into a Moore machine.
///
/// Every (destination, output) pair observed on a transition becomes one
/// Moore state: a destination reached with two different outputs splits in
/// two. If nothing reaches the initial state it still gets a Moore
/// counterpart, with an empty output. New states are named `q0, q1, …` after
/// a stable sort on (destination index, output index), and the counterpart
/// of the Mealy initial state with the smallest name becomes initial.
pub fn mealy_to_moore(mealy: &MealyMachine) -> MooreMachine {
    let alphabet = mealy.input_alphabet().to_vec();

    let mut pairs: Vec<(NodeIndex, Symbol)> = vec![];
    for state in mealy.states() {
        for symbol in &alphabet {
            if let Some((target, output)) = mealy.transition(state, symbol) {
                let pair = (target, output.clone());
                if !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
        }
    }

    let initial = mealy.initial();
    if !pairs.iter().any(|(target, _)| *target == initial) {
        pairs.push((initial, Symbol::new()));
    }

    let output_index = |output: &Symbol| {
        mealy
            .output_alphabet()
            .iter()
            .position(|o| o == output)
            .unwrap_or(usize::MAX)
    };
    pairs.sort_by_key(|(target, output)| (target.index(), output_index(output)));

    let mut moore = MooreMachine::new(alphabet.clone());
    let mut pair_state: HashMap<(NodeIndex, Symbol), NodeIndex> = HashMap::new();
    let mut nodes = Vec::with_capacity(pairs.len());

    for (i, (target, output)) in pairs.iter().enumerate() {
        let node = moore.add_state(format!("q{}", i), output.clone());
        pair_state.insert((*target, output.clone()), node);
        nodes.push(node);
    }

    for (i, (target, _)) in pairs.iter().enumerate() {
        for symbol in &alphabet {
            if let Some((next, next_output)) = mealy.transition(*target, symbol) {
                let to = pair_state[&(next, next_output.clone())];
                moore.add_transition(nodes[i], to, symbol);
            }
        }
    }

    let start = pairs
        .iter()
        .position(|(target, _)| *target == initial)
        .expect("the initial state always has a Moore counterpart");
    moore.set_initial(nodes[start]);

    moore
}

/// Converts a Moore machine into a Mealy machine.
///
/// Each transition adopts the output of its destination state: the output a
/// Moore machine shows on arrival is exactly what the Mealy transition must
/// emit. State names, order and the initial state carry over unchanged.
pub fn moore_to_mealy(moore: &MooreMachine) -> MealyMachine {
    let mut mealy = MealyMachine::new(moore.input_alphabet().to_vec());

    for state in moore.states() {
        mealy.add_state(moore.state(state).name.clone());
    }

    // node indices carry over, both graphs number insertions from zero
    for state in moore.states() {
        for symbol in moore.input_alphabet() {
            if let Some(target) = moore.successor(state, symbol) {
                mealy.add_transition(state, target, symbol, &moore.state(target).output);
            }
        }
    }

    mealy.set_initial(moore.initial());

    mealy
}
