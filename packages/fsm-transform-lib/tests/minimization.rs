use fsm_transform_lib::{
    error::FsmError,
    machine::{mealy::MealyMachine, minimization::Minimizable, moore::MooreMachine},
    validation::same_behavior::{
        assert_same_behavior_mealy, assert_same_behavior_moore, random_words,
    },
};

fn symbols(letters: &[&str]) -> Vec<String> {
    letters.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_moore_minimize_merges_equivalent_states() {
    // s1 and s2 share their output and their transition signatures
    let mut machine = MooreMachine::new(symbols(&["a", "b"]));
    let s0 = machine.add_state("s0", "F");
    let s1 = machine.add_state("s1", "-");
    let s2 = machine.add_state("s2", "-");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a");
    machine.add_transition(s0, s2, "b");
    machine.add_transition(s1, s0, "a");
    machine.add_transition(s1, s1, "b");
    machine.add_transition(s2, s0, "a");
    machine.add_transition(s2, s2, "b");

    let minimized = machine.minimize().unwrap();

    assert_eq!(minimized.state_count(), 2);
    assert!(minimized.state_count() < machine.state_count());
    assert_same_behavior_moore(&machine, &minimized, 6);
}

#[test]
fn test_moore_minimize_is_idempotent() {
    let mut machine = MooreMachine::new(symbols(&["a", "b"]));
    let s0 = machine.add_state("s0", "F");
    let s1 = machine.add_state("s1", "-");
    let s2 = machine.add_state("s2", "-");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a");
    machine.add_transition(s0, s2, "b");
    machine.add_transition(s1, s0, "a");
    machine.add_transition(s1, s1, "b");
    machine.add_transition(s2, s0, "a");
    machine.add_transition(s2, s2, "b");

    let minimized = machine.minimize().unwrap();
    let again = minimized.minimize().unwrap();

    assert_eq!(minimized.state_count(), again.state_count());
    assert_same_behavior_moore(&minimized, &again, 6);
}

#[test]
fn test_moore_minimize_keeps_distinct_outputs_apart() {
    let mut machine = MooreMachine::new(symbols(&["a"]));
    let s0 = machine.add_state("s0", "0");
    let s1 = machine.add_state("s1", "1");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a");
    machine.add_transition(s1, s0, "a");

    let minimized = machine.minimize().unwrap();

    assert_eq!(minimized.state_count(), 2);
}

#[test]
fn test_unreachable_state_is_pruned() {
    let table = ";F;-;-;-\n;s0;s1;s2;s3\na;s1;s2;s0;s0\nb;s2;s0;s1;s1\n";
    let machine = MooreMachine::from_table(table).unwrap();

    let pruned = machine.prune_unreachable().unwrap();

    assert_eq!(pruned.state_count(), 3);
    assert!(pruned.find_state("s3").is_none());
    assert!(!pruned.to_table().contains("s3"));
}

#[test]
fn test_minimize_ignores_unreachable_states() {
    // s3 is unreachable and must not influence the result
    let table = ";F;-;-;F\n;s0;s1;s2;s3\na;s1;s2;s0;s1\nb;s2;s0;s1;s2\n";
    let machine = MooreMachine::from_table(table).unwrap();

    let minimized = machine.minimize().unwrap();

    assert!(minimized.state_count() <= 3);
    assert!(minimized.to_table().chars().filter(|&c| c == 'F').count() <= 1);
    assert_same_behavior_moore(&machine, &minimized, 6);
}

#[test]
fn test_degenerate_after_pruning() {
    let mut machine = MooreMachine::new(symbols(&["a"]));
    let s0 = machine.add_state("s0", "0");
    let s1 = machine.add_state("s1", "1");
    machine.set_initial(s0);

    // nothing leaves s0, so only the initial state survives pruning
    machine.add_transition(s1, s0, "a");

    assert!(matches!(
        machine.prune_unreachable(),
        Err(FsmError::DegenerateAutomaton { states: 1 })
    ));
    assert!(matches!(
        machine.minimize(),
        Err(FsmError::DegenerateAutomaton { states: 1 })
    ));
}

#[test]
fn test_mealy_minimize_merges_equivalent_states() {
    let mut machine = MealyMachine::new(symbols(&["a"]));
    let s0 = machine.add_state("s0");
    let s1 = machine.add_state("s1");
    let s2 = machine.add_state("s2");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a", "x");
    machine.add_transition(s1, s2, "a", "y");
    machine.add_transition(s2, s1, "a", "y");

    let minimized = machine.minimize().unwrap();

    assert_eq!(minimized.state_count(), 2);
    assert_same_behavior_mealy(&machine, &minimized, 6);
}

#[test]
fn test_mealy_minimize_respects_transition_outputs() {
    // same destinations everywhere, but s1 and s2 emit different outputs
    let mut machine = MealyMachine::new(symbols(&["a"]));
    let s0 = machine.add_state("s0");
    let s1 = machine.add_state("s1");
    let s2 = machine.add_state("s2");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a", "x");
    machine.add_transition(s1, s2, "a", "y");
    machine.add_transition(s2, s1, "a", "z");

    let minimized = machine.minimize().unwrap();

    assert_eq!(minimized.state_count(), 3);
    assert_same_behavior_mealy(&machine, &minimized, 6);
}

#[test]
fn test_mealy_unreachable_state_is_pruned() {
    let table = ";s0;s1;s2\na;s1/0;s0/1;s0/0\n";
    let machine = MealyMachine::from_table(table).unwrap();

    let pruned = machine.prune_unreachable().unwrap();

    assert_eq!(pruned.state_count(), 2);
    assert!(pruned.find_state("s2").is_none());
    assert!(!pruned.to_table().contains("s2"));
}

#[test]
fn test_moore_minimize_preserves_behavior_on_random_words() {
    let table = ";0;1;0;1;0\n;s0;s1;s2;s3;s4\na;s1;s2;s3;s4;s1\nb;s2;s3;s4;s1;s2\n";
    let machine = MooreMachine::from_table(table).unwrap();

    let minimized = machine.minimize().unwrap();

    assert_eq!(minimized.state_count(), 2);
    assert_same_behavior_moore(&machine, &minimized, 6);

    for word in random_words(machine.input_alphabet(), 10, 50, 42) {
        assert_eq!(machine.run(&word), minimized.run(&word));
    }
}

#[test]
fn test_mealy_minimize_preserves_behavior_on_random_words() {
    let table = ";s0;s1;s2;s3\na;s1/0;s2/1;s3/0;s2/1\nb;s2/1;s3/0;s0/1;s1/0\n";
    let machine = MealyMachine::from_table(table).unwrap();

    let minimized = machine.minimize().unwrap();

    assert!(minimized.state_count() <= machine.state_count());
    assert_same_behavior_mealy(&machine, &minimized, 6);

    for word in random_words(machine.input_alphabet(), 10, 50, 7) {
        assert_eq!(machine.run(&word), minimized.run(&word));
    }
}

#[test]
fn test_minimized_states_are_named_in_first_encounter_order() {
    let mut machine = MooreMachine::new(symbols(&["a", "b"]));
    let s0 = machine.add_state("s0", "F");
    let s1 = machine.add_state("s1", "-");
    let s2 = machine.add_state("s2", "-");
    machine.set_initial(s0);

    machine.add_transition(s0, s1, "a");
    machine.add_transition(s0, s2, "b");
    machine.add_transition(s1, s0, "a");
    machine.add_transition(s1, s1, "b");
    machine.add_transition(s2, s0, "a");
    machine.add_transition(s2, s2, "b");

    let minimized = machine.minimize().unwrap();

    let names: Vec<String> = minimized
        .states()
        .map(|s| minimized.state(s).name.clone())
        .collect();
    assert_eq!(names, vec!["q0".to_string(), "q1".to_string()]);
    assert_eq!(minimized.state(minimized.initial()).name, "q0");
    assert_eq!(minimized.state(minimized.initial()).output, "F");
}
