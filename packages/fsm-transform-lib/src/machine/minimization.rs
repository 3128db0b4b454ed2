//! Minimization of Mealy and Moore machines by partition refinement.
//!
//! Both kinds share the same skeleton: start from an output-based partition,
//! repeatedly split blocks by transition signatures until the partition is
//! stable, then rebuild the machine with one state per block. Splitting keys
//! always include the current block of the state itself, so refinement can
//! only ever split, never merge. Block identifiers are assigned in order of
//! first encounter over the declared state order, which makes the synthesized
//! `q0, q1, …` names reproducible.

use std::hash::Hash;

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use crate::{
    error::FsmError,
    machine::{Symbol, mealy::MealyMachine, moore::MooreMachine},
};

pub trait Minimizable: Sized {
    /// Prunes unreachable states, then collapses behaviorally equivalent
    /// ones into a quotient machine.
    fn minimize(&self) -> Result<Self, FsmError>;
}

/// Groups states by key, assigning block ids in order of first encounter.
fn partition_by_key<K: Hash + Eq>(keys: Vec<K>) -> (Vec<usize>, usize) {
    let mut ids: HashMap<K, usize> = HashMap::new();
    let mut blocks = Vec::with_capacity(keys.len());

    for key in keys {
        let next = ids.len();
        let id = *ids.entry(key).or_insert(next);
        blocks.push(id);
    }

    let count = ids.len();
    (blocks, count)
}

/// Refines `blocks` until signature-based splitting reaches a fixed point.
///
/// `signature` receives a state position and the current assignment. The
/// loop terminates because the block count grows strictly until it stops
/// changing, and it can never exceed the state count.
fn refine_to_fixed_point<S: Hash + Eq>(
    state_count: usize,
    mut blocks: Vec<usize>,
    mut block_count: usize,
    signature: impl Fn(usize, &[usize]) -> S,
) -> (Vec<usize>, usize) {
    loop {
        if block_count == state_count {
            return (blocks, block_count);
        }

        let keys: Vec<(usize, S)> = (0..state_count)
            .map(|state| (blocks[state], signature(state, &blocks)))
            .collect();
        let (next, next_count) = partition_by_key(keys);

        // splitting never merges, so an unchanged count means an unchanged
        // partition
        if next_count == block_count {
            return (next, next_count);
        }

        blocks = next;
        block_count = next_count;
    }
}

/// First state of every block, in block order. Block ids are handed out in
/// first-encounter order, so these are ascending as well.
fn representatives(blocks: &[usize], block_count: usize) -> Vec<usize> {
    let mut reps = vec![usize::MAX; block_count];
    for (state, &block) in blocks.iter().enumerate() {
        if reps[block] == usize::MAX {
            reps[block] = state;
        }
    }
    assert!(
        reps.iter().all(|&r| r != usize::MAX),
        "every block must contain at least one state"
    );
    reps
}

impl Minimizable for MooreMachine {
    fn minimize(&self) -> Result<Self, FsmError> {
        let pruned = self.prune_unreachable()?;
        let states: Vec<NodeIndex> = pruned.states().collect();
        let alphabet = pruned.input_alphabet().to_vec();

        // initial partition: states with the same output start out together
        let outputs: Vec<Symbol> = states
            .iter()
            .map(|&s| pruned.state(s).output.clone())
            .collect();
        let (blocks, count) = partition_by_key(outputs);

        let (blocks, count) = refine_to_fixed_point(states.len(), blocks, count, |state, blocks| {
            alphabet
                .iter()
                .map(|symbol| {
                    pruned
                        .successor(states[state], symbol)
                        .map(|target| blocks[target.index()])
                })
                .collect::<Vec<_>>()
        });

        if count < 2 {
            return Err(FsmError::DegenerateAutomaton { states: count });
        }

        let reps = representatives(&blocks, count);
        let mut quotient = MooreMachine::new(alphabet.clone());
        let new_states: Vec<NodeIndex> = reps
            .iter()
            .enumerate()
            .map(|(block, &rep)| {
                quotient.add_state(format!("q{}", block), pruned.state(states[rep]).output.clone())
            })
            .collect();

        for (block, &rep) in reps.iter().enumerate() {
            for symbol in &alphabet {
                if let Some(target) = pruned.successor(states[rep], symbol) {
                    quotient.add_transition(
                        new_states[block],
                        new_states[blocks[target.index()]],
                        symbol,
                    );
                }
            }
        }

        quotient.set_initial(new_states[blocks[pruned.initial().index()]]);

        Ok(quotient)
    }
}

impl Minimizable for MealyMachine {
    fn minimize(&self) -> Result<Self, FsmError> {
        let pruned = self.prune_unreachable()?;
        let states: Vec<NodeIndex> = pruned.states().collect();
        let alphabet = pruned.input_alphabet().to_vec();

        // initial partition: group by the row of outputs emitted per input
        // symbol, since Mealy outputs live on the transitions
        let output_rows: Vec<Vec<Option<Symbol>>> = states
            .iter()
            .map(|&s| {
                alphabet
                    .iter()
                    .map(|symbol| pruned.transition(s, symbol).map(|(_, output)| output.clone()))
                    .collect()
            })
            .collect();
        let (blocks, count) = partition_by_key(output_rows);

        let (blocks, count) = refine_to_fixed_point(states.len(), blocks, count, |state, blocks| {
            alphabet
                .iter()
                .map(|symbol| {
                    pruned
                        .transition(states[state], symbol)
                        .map(|(target, output)| (blocks[target.index()], output.clone()))
                })
                .collect::<Vec<_>>()
        });

        if count < 2 {
            return Err(FsmError::DegenerateAutomaton { states: count });
        }

        let reps = representatives(&blocks, count);
        let mut quotient = MealyMachine::new(alphabet.clone());
        let new_states: Vec<NodeIndex> = reps
            .iter()
            .enumerate()
            .map(|(block, _)| quotient.add_state(format!("q{}", block)))
            .collect();

        for (block, &rep) in reps.iter().enumerate() {
            for symbol in &alphabet {
                if let Some((target, output)) = pruned.transition(states[rep], symbol) {
                    let output = output.clone();
                    quotient.add_transition(
                        new_states[block],
                        new_states[blocks[target.index()]],
                        symbol,
                        &output,
                    );
                }
            }
        }

        quotient.set_initial(new_states[blocks[pruned.initial().index()]]);

        Ok(quotient)
    }
}
