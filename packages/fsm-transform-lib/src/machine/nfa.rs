use hashbrown::HashMap;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::machine::{Symbol, moore::{MooreMachine, MooreNode}};

/// An edge of a nondeterministic automaton: either an ordinary input symbol
/// or an epsilon transition that consumes no input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NfaEdge {
    Symbol(Symbol),
    Epsilon,
}

impl NfaEdge {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, NfaEdge::Epsilon)
    }

    pub fn matches(&self, symbol: &str) -> bool {
        match self {
            NfaEdge::Symbol(s) => s == symbol,
            NfaEdge::Epsilon => false,
        }
    }
}

/// A nondeterministic automaton with optional epsilon transitions.
///
/// States follow the Moore convention: accepting states carry the sentinel
/// output, everything else is carried through untouched. A (state, symbol)
/// pair may have any number of destinations.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub graph: DiGraph<MooreNode, NfaEdge>,
    input_alphabet: Vec<Symbol>,
    epsilon_declared: bool,
    initial: Option<NodeIndex>,
}

impl Nfa {
    /// Creates an empty automaton. The alphabet must not contain the epsilon
    /// symbol; epsilon transitions are added as [NfaEdge::Epsilon] edges.
    pub fn new(input_alphabet: Vec<Symbol>) -> Self {
        Nfa {
            graph: DiGraph::new(),
            input_alphabet,
            epsilon_declared: false,
            initial: None,
        }
    }

    pub fn add_state(&mut self, name: impl Into<String>, output: impl Into<Symbol>) -> NodeIndex {
        self.graph.add_node(MooreNode::new(name, output))
    }

    pub fn add_transition(&mut self, from: NodeIndex, to: NodeIndex, edge: NfaEdge) {
        if edge.is_epsilon() {
            self.epsilon_declared = true;
        }
        self.graph.add_edge(from, to, edge);
    }

    /// Marks the automaton as having a declared epsilon row, even if that row
    /// carried no transitions.
    pub fn declare_epsilon(&mut self) {
        self.epsilon_declared = true;
    }

    pub fn set_initial(&mut self, state: NodeIndex) {
        self.initial = Some(state);
    }

    /// Panics if no initial state has been set.
    pub fn initial(&self) -> NodeIndex {
        self.initial.expect("automaton must have an initial state")
    }

    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn input_alphabet(&self) -> &[Symbol] {
        &self.input_alphabet
    }

    pub fn is_accepting(&self, state: NodeIndex) -> bool {
        self.graph[state].output == crate::machine::ACCEPTING_OUTPUT
    }

    fn is_accepting_set(&self, states: &[NodeIndex]) -> bool {
        states.iter().any(|&s| self.is_accepting(s))
    }

    /// Extends `states` to its epsilon closure in place. The vector doubles
    /// as the seen-set, so cyclic epsilon chains terminate.
    pub fn extend_to_epsilon_closure(&self, states: &mut Vec<NodeIndex>) {
        let mut stack = states.clone();

        while let Some(state) = stack.pop() {
            for edge in self.graph.edges_directed(state, Direction::Outgoing) {
                if edge.weight().is_epsilon() {
                    let target = edge.target();

                    if !states.contains(&target) {
                        states.push(target);
                        stack.push(target);
                    }
                }
            }
        }
    }

    /// The set of states reachable from `state` using only epsilon
    /// transitions, including `state` itself.
    pub fn epsilon_closure(&self, state: NodeIndex) -> Vec<NodeIndex> {
        let mut closure = vec![state];
        self.extend_to_epsilon_closure(&mut closure);
        closure
    }

    /// Whether every (state, symbol) pair has at most one destination.
    /// Epsilon edges do not count as deterministic.
    pub fn is_deterministic(&self) -> bool {
        self.graph.node_indices().all(|state| {
            self.input_alphabet.iter().all(|symbol| {
                self.graph
                    .edges_directed(state, Direction::Outgoing)
                    .filter(|edge| edge.weight().matches(symbol))
                    .count()
                    <= 1
            })
        }) && self
            .graph
            .edge_references()
            .all(|edge| !edge.weight().is_epsilon())
    }

    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut current_states = vec![self.initial()];
        self.extend_to_epsilon_closure(&mut current_states);

        for symbol in word {
            let mut next_states = vec![];

            for &state in &current_states {
                for edge in self.graph.edges_directed(state, Direction::Outgoing) {
                    if edge.weight().matches(symbol) && !next_states.contains(&edge.target()) {
                        next_states.push(edge.target());
                    }
                }
            }

            if next_states.is_empty() {
                return false;
            }

            self.extend_to_epsilon_closure(&mut next_states);

            current_states = next_states;
        }

        self.is_accepting_set(&current_states)
    }

    /// Determinizes the automaton by subset construction.
    ///
    /// Each result state stands for a set of original states, deduplicated by
    /// the sorted set itself and finally renamed `S0, S1, …` in discovery
    /// order. A result state is accepting iff it contains an accepting
    /// original state. Without a declared epsilon row an already
    /// deterministic automaton is returned unchanged.
    pub fn determinize(&self) -> MooreMachine {
        if !self.epsilon_declared && self.is_deterministic() {
            return self.to_moore();
        }

        let mut state_map: HashMap<Vec<NodeIndex>, NodeIndex> = HashMap::new();
        let mut moore = MooreMachine::new(self.input_alphabet.clone());

        let mut start_set = vec![self.initial()];
        self.extend_to_epsilon_closure(&mut start_set);
        start_set.sort();

        let start = moore.add_state(self.set_name(&start_set), self.set_output(&start_set));
        moore.set_initial(start);
        state_map.insert(start_set.clone(), start);

        let mut stack = vec![start_set];

        while let Some(set) = stack.pop() {
            for symbol in &self.input_alphabet {
                let mut target_set = vec![];

                for &state in &set {
                    for edge in self.graph.edges_directed(state, Direction::Outgoing) {
                        if edge.weight().matches(symbol) && !target_set.contains(&edge.target()) {
                            target_set.push(edge.target());
                        }
                    }
                }

                if target_set.is_empty() {
                    continue;
                }

                self.extend_to_epsilon_closure(&mut target_set);
                target_set.sort();

                let target = if let Some(&existing) = state_map.get(&target_set) {
                    existing
                } else {
                    let new_state =
                        moore.add_state(self.set_name(&target_set), self.set_output(&target_set));
                    state_map.insert(target_set.clone(), new_state);
                    stack.push(target_set);
                    new_state
                };

                moore.add_transition(state_map[&set], target, symbol);
            }
        }

        // The comma-joined set names were only needed as dedup keys; the
        // serialized table must not contain the set delimiter.
        for (i, state) in moore.graph.node_indices().enumerate() {
            moore.graph[state].name = format!("S{}", i);
        }

        moore
    }

    /// One-to-one translation of an already deterministic automaton. Node
    /// indices carry over because both graphs number insertions from zero.
    fn to_moore(&self) -> MooreMachine {
        let mut moore = MooreMachine::new(self.input_alphabet.clone());

        for state in self.graph.node_indices() {
            let node = &self.graph[state];
            moore.add_state(node.name.clone(), node.output.clone());
        }

        for state in self.graph.node_indices() {
            for symbol in &self.input_alphabet {
                let target = self
                    .graph
                    .edges_directed(state, Direction::Outgoing)
                    .find(|edge| edge.weight().matches(symbol))
                    .map(|edge| edge.target());

                if let Some(target) = target {
                    moore.add_transition(state, target, symbol);
                }
            }
        }

        if let Some(initial) = self.initial {
            moore.set_initial(initial);
        }

        moore
    }

    /// Canonical name of a state set: the member names, sorted and
    /// comma-joined. Two constructions of the same subset agree on it.
    fn set_name(&self, set: &[NodeIndex]) -> String {
        let mut names = set
            .iter()
            .map(|&s| self.graph[s].name.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();
        names.join(",")
    }

    fn set_output(&self, set: &[NodeIndex]) -> Symbol {
        if self.is_accepting_set(set) {
            crate::machine::ACCEPTING_OUTPUT.to_string()
        } else {
            Symbol::new()
        }
    }
}

impl From<&MooreMachine> for Nfa {
    /// Views a deterministic machine as a nondeterministic one, e.g. to feed
    /// a determinization result back into [Nfa::determinize].
    fn from(moore: &MooreMachine) -> Self {
        let mut nfa = Nfa::new(moore.input_alphabet().to_vec());

        for state in moore.states() {
            let node = moore.state(state);
            nfa.add_state(node.name.clone(), node.output.clone());
        }

        for state in moore.states() {
            for symbol in moore.input_alphabet() {
                if let Some(target) = moore.successor(state, symbol) {
                    nfa.add_transition(state, target, NfaEdge::Symbol(symbol.clone()));
                }
            }
        }

        nfa.set_initial(moore.initial());
        nfa
    }
}
