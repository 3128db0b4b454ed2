use fsm_transform_lib::{
    machine::{
        conversion::{mealy_to_moore, moore_to_mealy},
        mealy::MealyMachine,
        moore::MooreMachine,
    },
    validation::same_behavior::{
        assert_equivalent_mealy_moore, assert_same_behavior_mealy, assert_same_behavior_moore,
    },
};

fn symbols(letters: &[&str]) -> Vec<String> {
    letters.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_moore_to_mealy_takes_the_destination_output() {
    let table = ";0;1\n;s0;s1\na;s1;s0\nb;s0;s1\n";
    let moore = MooreMachine::from_table(table).unwrap();

    let mealy = moore_to_mealy(&moore);

    // the output observed on arrival moves onto the incoming transition
    assert_eq!(mealy.to_table(), ";s0;s1\na;s1/1;s0/0\nb;s0/0;s1/1\n");
    assert_equivalent_mealy_moore(&mealy, &moore, 6);
}

#[test]
fn test_mealy_to_moore_pairs_destination_with_output() {
    // s0 --a/1--> s1 and s1 --a/1--> s1 agree on (destination, output),
    // so they share one Moore state; s0 keeps its own counterpart
    let mut mealy = MealyMachine::new(symbols(&["a"]));
    let s0 = mealy.add_state("s0");
    let s1 = mealy.add_state("s1");
    mealy.set_initial(s0);

    mealy.add_transition(s0, s1, "a", "1");
    mealy.add_transition(s1, s1, "a", "1");

    let moore = mealy_to_moore(&mealy);

    assert_eq!(moore.state_count(), 2);

    let outputs: Vec<String> = moore
        .states()
        .map(|s| moore.state(s).output.clone())
        .collect();
    assert_eq!(outputs, vec![String::new(), "1".to_string()]);
    assert_eq!(moore.state(moore.initial()).name, "q0");
    assert_equivalent_mealy_moore(&mealy, &moore, 6);
}

#[test]
fn test_mealy_to_moore_splits_on_distinct_outputs() {
    // s1 is reached with outputs 0 and 1, so it splits into two Moore states
    let mut mealy = MealyMachine::new(symbols(&["a", "b"]));
    let s0 = mealy.add_state("s0");
    let s1 = mealy.add_state("s1");
    mealy.set_initial(s0);

    mealy.add_transition(s0, s1, "a", "0");
    mealy.add_transition(s0, s1, "b", "1");
    mealy.add_transition(s1, s0, "a", "0");
    mealy.add_transition(s1, s1, "b", "1");

    let moore = mealy_to_moore(&mealy);

    assert_eq!(moore.state_count(), 3);

    let split: Vec<String> = moore
        .states()
        .filter(|&s| moore.state(s).output == "0" || moore.state(s).output == "1")
        .map(|s| moore.state(s).output.clone())
        .collect();
    assert_eq!(split.len(), 3);
    assert_equivalent_mealy_moore(&mealy, &moore, 6);
}

#[test]
fn test_mealy_round_trip_preserves_behavior() {
    let table = ";s0;s1;s2\na;s1/0;s2/1;s0/0\nb;s2/1;s0/0;s1/1\n";
    let mealy = MealyMachine::from_table(table).unwrap();

    let round_tripped = moore_to_mealy(&mealy_to_moore(&mealy));

    assert_same_behavior_mealy(&mealy, &round_tripped, 6);
}

#[test]
fn test_moore_round_trip_preserves_behavior() {
    let table = ";0;1;2\n;s0;s1;s2\na;s1;s2;s0\nb;s2;s0;s1\n";
    let moore = MooreMachine::from_table(table).unwrap();

    let round_tripped = mealy_to_moore(&moore_to_mealy(&moore));

    assert_same_behavior_moore(&moore, &round_tripped, 6);
}

#[test]
fn test_conversion_keeps_the_input_alphabet() {
    let table = ";0;1\n;s0;s1\na;s1;s0\nb;s0;s1\n";
    let moore = MooreMachine::from_table(table).unwrap();

    let mealy = moore_to_mealy(&moore);
    assert_eq!(mealy.input_alphabet(), moore.input_alphabet());

    let back = mealy_to_moore(&mealy);
    assert_eq!(back.input_alphabet(), moore.input_alphabet());
}
