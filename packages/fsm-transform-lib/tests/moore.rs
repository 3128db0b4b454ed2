use fsm_transform_lib::machine::moore::MooreMachine;

fn symbols(letters: &[&str]) -> Vec<String> {
    letters.iter().map(|s| s.to_string()).collect()
}

fn word(letters: &str) -> Vec<String> {
    letters.chars().map(|c| c.to_string()).collect()
}

#[test]
fn test_run_emits_the_output_of_every_entered_state() {
    let mut machine = MooreMachine::new(symbols(&["a", "b"]));
    let s0 = machine.add_state("s0", "0");
    let s1 = machine.add_state("s1", "1");
    let s2 = machine.add_state("s2", "2");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a");
    machine.add_transition(s1, s2, "a");
    machine.add_transition(s2, s0, "b");

    assert_eq!(machine.run(&word("aab")), vec!["1", "2", "0"]);
}

#[test]
fn test_run_stops_at_a_missing_transition() {
    let mut machine = MooreMachine::new(symbols(&["a", "b"]));
    let s0 = machine.add_state("s0", "0");
    let s1 = machine.add_state("s1", "1");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a");

    assert_eq!(machine.run(&word("ab")), vec!["1"]);
    assert_eq!(machine.run(&word("b")), Vec::<String>::new());
}

#[test]
fn test_successor_respects_the_symbol() {
    let mut machine = MooreMachine::new(symbols(&["a", "b"]));
    let s0 = machine.add_state("s0", "0");
    let s1 = machine.add_state("s1", "1");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a");
    machine.add_transition(s0, s0, "b");

    assert_eq!(machine.successor(s0, "a"), Some(s1));
    assert_eq!(machine.successor(s0, "b"), Some(s0));
    assert_eq!(machine.successor(s1, "a"), None);
}

#[test]
fn test_output_alphabet_in_first_encounter_order() {
    let mut machine = MooreMachine::new(symbols(&["a"]));
    machine.add_state("s0", "x");
    machine.add_state("s1", "y");
    machine.add_state("s2", "x");

    assert_eq!(
        machine.output_alphabet().to_vec(),
        vec!["x".to_string(), "y".to_string()]
    );
}

#[test]
fn test_graphviz_merges_parallel_edges() {
    let mut machine = MooreMachine::new(symbols(&["a", "b"]));
    let s0 = machine.add_state("s0", "0");
    let s1 = machine.add_state("s1", "1");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a");
    machine.add_transition(s0, s1, "b");
    machine.add_transition(s1, s0, "a");

    let dot = machine.to_graphviz();

    assert!(dot.contains("label=\"a, b\""));
    assert!(dot.contains("START -> 0;"));
    assert!(dot.contains("s1/1"));
}
