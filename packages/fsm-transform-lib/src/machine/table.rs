//! Reading and writing machines in the delimited table convention.
//!
//! A Moore table starts with the output row, then the state row, then one
//! row per input symbol:
//!
//! ```text
//! ;F;;
//! ;s0;s1;s2
//! x0;s1;s2;s0
//! x1;s2;s0;s1
//! ```
//!
//! A Mealy table has no output row and its cells read `dest/output`:
//!
//! ```text
//! ;s0;s1
//! x0;s1/1;s0/2
//! ```
//!
//! A nondeterministic table follows the Moore convention, where `e` labels
//! the epsilon row and a cell may hold a comma-joined destination set:
//! `x0;s0,s1;-;s2`. The sentinel `-` (or an empty cell) means "no
//! transition". The first declared state is the initial state.

use hashbrown::HashMap;
use itertools::Itertools;
use nom::{Parser, bytes::complete::tag, combinator::all_consuming, error::ParseError};
use petgraph::graph::NodeIndex;

use crate::{
    error::FsmError,
    machine::{
        EPSILON_SYMBOL, NO_TRANSITION, Symbol,
        mealy::MealyMachine,
        moore::MooreMachine,
        nfa::{Nfa, NfaEdge},
    },
};

fn token<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, &'a str, E> {
    nom::bytes::complete::take_while1(|c: char| {
        c != ';' && c != '/' && c != ',' && !c.is_whitespace()
    })
    .parse(input)
}

/// `dest/output` cell of a Mealy table.
fn mealy_cell<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, (&'a str, &'a str), E> {
    let (input, dest) = token(input)?;
    let (input, _) = tag("/")(input)?;
    let (input, output) = token(input)?;

    Ok((input, (dest, output)))
}

/// Comma-joined destination set of a nondeterministic table.
fn state_set<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, Vec<&'a str>, E> {
    nom::multi::separated_list1(tag(","), token).parse(input)
}

#[test]
fn test_token() {
    let (rest, name) = token::<nom::error::Error<&str>>("s12;").unwrap();
    assert_eq!(name, "s12");
    assert_eq!(rest, ";");
}

#[test]
fn test_mealy_cell() {
    let (_, (dest, output)) = mealy_cell::<nom::error::Error<&str>>("s1/2").unwrap();
    assert_eq!(dest, "s1");
    assert_eq!(output, "2");

    assert!(all_consuming(mealy_cell::<nom::error::Error<&str>>)
        .parse("s1")
        .is_err());
}

#[test]
fn test_state_set() {
    let (_, set) = state_set::<nom::error::Error<&str>>("s1,s2,s3").unwrap();
    assert_eq!(set, vec!["s1", "s2", "s3"]);
}

fn split_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(';').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

fn is_empty_cell(cell: &str) -> bool {
    cell.is_empty() || cell == NO_TRANSITION
}

/// Checks that every row has one label cell plus exactly `state_count`
/// cells.
fn check_widths(rows: &[Vec<String>], state_count: usize) -> Result<(), FsmError> {
    for row in rows {
        if row.len() != state_count + 1 {
            return Err(FsmError::MalformedInput(format!(
                "row {:?} has {} cells, expected {}",
                row.first().map(String::as_str).unwrap_or(""),
                row.len() - 1,
                state_count
            )));
        }
    }
    Ok(())
}

fn check_distinct(kind: &str, items: &[String]) -> Result<(), FsmError> {
    for (i, item) in items.iter().enumerate() {
        if items[..i].contains(item) {
            return Err(FsmError::MalformedInput(format!(
                "duplicate {}: {:?}",
                kind, item
            )));
        }
    }
    Ok(())
}

fn parse_state_header(row: &[String]) -> Result<Vec<String>, FsmError> {
    let names = row[1..].to_vec();
    if names.len() < 2 {
        return Err(FsmError::MalformedInput(format!(
            "a machine needs at least 2 states, found {}",
            names.len()
        )));
    }
    check_distinct("state name", &names)?;

    for name in &names {
        if all_consuming(token::<nom::error::Error<&str>>)
            .parse(name.as_str())
            .is_err()
        {
            return Err(FsmError::MalformedInput(format!(
                "invalid state name {:?}",
                name
            )));
        }
    }

    Ok(names)
}

fn input_symbols(rows: &[Vec<String>]) -> Result<Vec<Symbol>, FsmError> {
    let symbols: Vec<Symbol> = rows.iter().map(|row| row[0].clone()).collect();
    for symbol in &symbols {
        if symbol.is_empty() {
            return Err(FsmError::MalformedInput(
                "transition row without an input symbol".into(),
            ));
        }
    }
    check_distinct("input symbol", &symbols)?;
    Ok(symbols)
}

impl MooreMachine {
    /// Builds a deterministic Moore machine from its table text. The first
    /// declared state becomes the initial state.
    pub fn from_table(text: &str) -> Result<Self, FsmError> {
        let rows = split_rows(text);
        if rows.len() < 2 {
            return Err(FsmError::MalformedInput(
                "a Moore table needs an output row and a state row".into(),
            ));
        }

        let names = parse_state_header(&rows[1])?;
        check_widths(&rows, names.len())?;
        let outputs = &rows[0][1..];

        let symbols = input_symbols(&rows[2..])?;
        let mut machine = MooreMachine::new(symbols);

        let mut index: HashMap<&str, NodeIndex> = HashMap::new();
        for (name, output) in names.iter().zip(outputs) {
            index.insert(name, machine.add_state(name.clone(), output.clone()));
        }

        for row in &rows[2..] {
            let symbol = row[0].clone();
            for (state, cell) in names.iter().zip(&row[1..]) {
                if is_empty_cell(cell) {
                    continue;
                }
                if all_consuming(token::<nom::error::Error<&str>>)
                    .parse(cell.as_str())
                    .is_err()
                {
                    return Err(FsmError::MalformedInput(format!(
                        "invalid destination cell {:?}",
                        cell
                    )));
                }
                let Some(&target) = index.get(cell.as_str()) else {
                    return Err(FsmError::UnknownSymbol(cell.clone()));
                };
                machine.add_transition(index[state.as_str()], target, &symbol);
            }
        }

        let initial = index[names[0].as_str()];
        machine.set_initial(initial);

        Ok(machine)
    }

    pub fn from_file(path: &str) -> Result<Self, FsmError> {
        Self::from_table(&std::fs::read_to_string(path)?)
    }

    /// Renders the machine back into table text, states in declared order.
    pub fn to_table(&self) -> String {
        let states: Vec<NodeIndex> = self.states().collect();
        let mut lines = vec![
            format!(
                ";{}",
                states.iter().map(|&s| self.state(s).output.as_str()).join(";")
            ),
            format!(
                ";{}",
                states.iter().map(|&s| self.state(s).name.as_str()).join(";")
            ),
        ];

        for symbol in self.input_alphabet() {
            let cells = states
                .iter()
                .map(|&s| match self.successor(s, symbol) {
                    Some(target) => self.state(target).name.clone(),
                    None => NO_TRANSITION.to_string(),
                })
                .join(";");
            lines.push(format!("{};{}", symbol, cells));
        }

        lines.join("\n") + "\n"
    }

    pub fn to_file(&self, path: &str) -> Result<(), FsmError> {
        std::fs::write(path, self.to_table())?;
        Ok(())
    }
}

impl MealyMachine {
    /// Builds a deterministic Mealy machine from its table text. The first
    /// declared state becomes the initial state.
    pub fn from_table(text: &str) -> Result<Self, FsmError> {
        let rows = split_rows(text);
        if rows.is_empty() {
            return Err(FsmError::MalformedInput(
                "a Mealy table needs a state row".into(),
            ));
        }

        let names = parse_state_header(&rows[0])?;
        check_widths(&rows, names.len())?;

        let symbols = input_symbols(&rows[1..])?;
        let mut machine = MealyMachine::new(symbols);

        let mut index: HashMap<&str, NodeIndex> = HashMap::new();
        for name in &names {
            index.insert(name, machine.add_state(name.clone()));
        }

        for row in &rows[1..] {
            let symbol = row[0].clone();
            for (state, cell) in names.iter().zip(&row[1..]) {
                if is_empty_cell(cell) {
                    continue;
                }
                let (_, (dest, output)) = all_consuming(mealy_cell::<nom::error::Error<&str>>)
                    .parse(cell.as_str())
                    .map_err(|_| {
                        FsmError::MalformedInput(format!(
                            "invalid cell {:?}, expected dest/output",
                            cell
                        ))
                    })?;
                let Some(&target) = index.get(dest) else {
                    return Err(FsmError::UnknownSymbol(dest.to_string()));
                };
                machine.add_transition(index[state.as_str()], target, &symbol, output);
            }
        }

        let initial = index[names[0].as_str()];
        machine.set_initial(initial);

        Ok(machine)
    }

    pub fn from_file(path: &str) -> Result<Self, FsmError> {
        Self::from_table(&std::fs::read_to_string(path)?)
    }

    /// Renders the machine back into table text, states in declared order.
    pub fn to_table(&self) -> String {
        let states: Vec<NodeIndex> = self.states().collect();
        let mut lines = vec![format!(
            ";{}",
            states.iter().map(|&s| self.state(s).name.as_str()).join(";")
        )];

        for symbol in self.input_alphabet() {
            let cells = states
                .iter()
                .map(|&s| match self.transition(s, symbol) {
                    Some((target, output)) => {
                        format!("{}/{}", self.state(target).name, output)
                    }
                    None => NO_TRANSITION.to_string(),
                })
                .join(";");
            lines.push(format!("{};{}", symbol, cells));
        }

        lines.join("\n") + "\n"
    }

    pub fn to_file(&self, path: &str) -> Result<(), FsmError> {
        std::fs::write(path, self.to_table())?;
        Ok(())
    }
}

impl Nfa {
    /// Builds a nondeterministic automaton from a Moore-convention table.
    /// The `e` row declares epsilon transitions and cells may hold
    /// comma-joined destination sets. The first declared state becomes the
    /// initial state.
    pub fn from_table(text: &str) -> Result<Self, FsmError> {
        let rows = split_rows(text);
        if rows.len() < 2 {
            return Err(FsmError::MalformedInput(
                "a nondeterministic table needs an output row and a state row".into(),
            ));
        }

        let names = parse_state_header(&rows[1])?;
        check_widths(&rows, names.len())?;
        let outputs = &rows[0][1..];

        let symbols = input_symbols(&rows[2..])?;
        let alphabet: Vec<Symbol> = symbols
            .iter()
            .filter(|s| s.as_str() != EPSILON_SYMBOL)
            .cloned()
            .collect();

        let mut nfa = Nfa::new(alphabet);
        if symbols.iter().any(|s| s == EPSILON_SYMBOL) {
            nfa.declare_epsilon();
        }

        let mut index: HashMap<&str, NodeIndex> = HashMap::new();
        for (name, output) in names.iter().zip(outputs) {
            index.insert(name, nfa.add_state(name.clone(), output.clone()));
        }

        for row in &rows[2..] {
            let symbol = row[0].as_str();
            for (state, cell) in names.iter().zip(&row[1..]) {
                if is_empty_cell(cell) {
                    continue;
                }
                let (_, targets) = all_consuming(state_set::<nom::error::Error<&str>>)
                    .parse(cell.as_str())
                    .map_err(|_| {
                        FsmError::MalformedInput(format!("invalid destination set {:?}", cell))
                    })?;
                for target in targets {
                    let Some(&to) = index.get(target) else {
                        return Err(FsmError::UnknownSymbol(target.to_string()));
                    };
                    let edge = if symbol == EPSILON_SYMBOL {
                        NfaEdge::Epsilon
                    } else {
                        NfaEdge::Symbol(symbol.to_string())
                    };
                    nfa.add_transition(index[state.as_str()], to, edge);
                }
            }
        }

        let initial = index[names[0].as_str()];
        nfa.set_initial(initial);

        Ok(nfa)
    }

    pub fn from_file(path: &str) -> Result<Self, FsmError> {
        Self::from_table(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moore_round_trip() {
        let table = ";F;;-\n;s0;s1;s2\na;s1;s2;s0\nb;s2;-;s1\n";
        let machine = MooreMachine::from_table(table).unwrap();

        assert_eq!(machine.state_count(), 3);
        assert_eq!(machine.to_table(), table);
    }

    #[test]
    fn test_mealy_round_trip() {
        let table = ";s0;s1\na;s1/1;s0/2\nb;s0/1;-\n";
        let machine = MealyMachine::from_table(table).unwrap();

        assert_eq!(machine.state_count(), 2);
        assert_eq!(machine.to_table(), table);
    }

    #[test]
    fn test_rejects_width_mismatch() {
        let table = ";F;-\n;s0;s1\na;s1\n";
        assert!(matches!(
            MooreMachine::from_table(table),
            Err(FsmError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_rejects_single_state() {
        let table = ";F\n;s0\na;s0\n";
        assert!(matches!(
            MooreMachine::from_table(table),
            Err(FsmError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_destination() {
        let table = ";F;-\n;s0;s1\na;s1;s7\n";
        assert!(matches!(
            MooreMachine::from_table(table),
            Err(FsmError::UnknownSymbol(_))
        ));
    }

    #[test]
    fn test_rejects_bad_mealy_cell() {
        let table = ";s0;s1\na;s1;s0/2\n";
        assert!(matches!(
            MealyMachine::from_table(table),
            Err(FsmError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_nfa_table_with_sets_and_epsilon() {
        let table = ";;;F\n;s0;s1;s2\ne;s1;-;-\na;s0,s2;s2;-\n";
        let nfa = Nfa::from_table(table).unwrap();

        assert_eq!(nfa.state_count(), 3);
        assert_eq!(nfa.input_alphabet().to_vec(), vec!["a".to_string()]);

        let s0 = NodeIndex::new(0);
        assert_eq!(nfa.epsilon_closure(s0).len(), 2);
    }
}
