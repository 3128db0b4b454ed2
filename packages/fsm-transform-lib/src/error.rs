use thiserror::Error;

/// Errors produced while building machines from raw tables or transforming
/// them.
///
/// All kinds are detected eagerly, either when a machine is constructed or at
/// the start of an algorithm. A machine value is only ever handed back whole;
/// there is no partially constructed result alongside an error.
#[derive(Debug, Error)]
pub enum FsmError {
    /// The raw table cannot describe a machine: mismatched row widths, fewer
    /// than two states, or a cell that does not parse.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A transition references a state or symbol that was never declared.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Pruning or refinement would leave fewer states than a well-formed
    /// machine requires.
    #[error("degenerate automaton: {states} state(s) remain, at least 2 are required")]
    DegenerateAutomaton { states: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
