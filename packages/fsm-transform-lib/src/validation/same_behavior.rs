use itertools::{Itertools, repeat_n};
use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::machine::{Symbol, mealy::MealyMachine, moore::MooreMachine, nfa::Nfa};

/// All words over `alphabet` of length 0 to `max_word_length` inclusive, in
/// a stable order.
pub fn words_up_to(
    alphabet: &[Symbol],
    max_word_length: usize,
) -> impl Iterator<Item = Vec<Symbol>> + '_ {
    std::iter::once(vec![]).chain((1..=max_word_length).flat_map(move |len| {
        repeat_n(alphabet, len)
            .multi_cartesian_product()
            .map(|word| word.into_iter().cloned().collect())
    }))
}

/// `count` random words of exactly `length` symbols. The generator is
/// seeded so failures reproduce.
pub fn random_words(
    alphabet: &[Symbol],
    length: usize,
    count: usize,
    seed: u64,
) -> Vec<Vec<Symbol>> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            (0..length)
                .map(|_| alphabet[rng.random_range(0..alphabet.len())].clone())
                .collect()
        })
        .collect()
}

/// Checks that two runners produce the same output sequence for every word
/// up to `max_word_length`.
pub fn same_outputs(
    alphabet: &[Symbol],
    max_word_length: usize,
    run_a: impl Fn(&[Symbol]) -> Vec<Symbol>,
    run_b: impl Fn(&[Symbol]) -> Vec<Symbol>,
) -> bool {
    words_up_to(alphabet, max_word_length).all(|word| run_a(&word) == run_b(&word))
}

pub fn same_behavior_moore(a: &MooreMachine, b: &MooreMachine, max_word_length: usize) -> bool {
    a.input_alphabet() == b.input_alphabet()
        && same_outputs(
            a.input_alphabet(),
            max_word_length,
            |word| a.run(word),
            |word| b.run(word),
        )
}

pub fn same_behavior_mealy(a: &MealyMachine, b: &MealyMachine, max_word_length: usize) -> bool {
    a.input_alphabet() == b.input_alphabet()
        && same_outputs(
            a.input_alphabet(),
            max_word_length,
            |word| a.run(word),
            |word| b.run(word),
        )
}

/// Checks that a Mealy machine and a Moore machine emit the same output
/// sequence for every word, as a converted pair must.
pub fn equivalent_mealy_moore(
    mealy: &MealyMachine,
    moore: &MooreMachine,
    max_word_length: usize,
) -> bool {
    mealy.input_alphabet() == moore.input_alphabet()
        && same_outputs(
            mealy.input_alphabet(),
            max_word_length,
            |word| mealy.run(word),
            |word| moore.run(word),
        )
}

pub fn assert_same_behavior_moore(a: &MooreMachine, b: &MooreMachine, max_word_length: usize) {
    assert_eq!(a.input_alphabet(), b.input_alphabet(), "alphabets differ");

    for word in words_up_to(a.input_alphabet(), max_word_length) {
        assert_eq!(
            a.run(&word),
            b.run(&word),
            "output sequences diverge on {:?}",
            word
        );
    }
}

pub fn assert_same_behavior_mealy(a: &MealyMachine, b: &MealyMachine, max_word_length: usize) {
    assert_eq!(a.input_alphabet(), b.input_alphabet(), "alphabets differ");

    for word in words_up_to(a.input_alphabet(), max_word_length) {
        assert_eq!(
            a.run(&word),
            b.run(&word),
            "output sequences diverge on {:?}",
            word
        );
    }
}

pub fn assert_equivalent_mealy_moore(
    mealy: &MealyMachine,
    moore: &MooreMachine,
    max_word_length: usize,
) {
    assert_eq!(
        mealy.input_alphabet(),
        moore.input_alphabet(),
        "alphabets differ"
    );

    for word in words_up_to(mealy.input_alphabet(), max_word_length) {
        assert_eq!(
            mealy.run(&word),
            moore.run(&word),
            "output sequences diverge on {:?}",
            word
        );
    }
}

/// Checks that a nondeterministic automaton and its determinization accept
/// exactly the same words up to `max_word_length`.
pub fn same_language(nfa: &Nfa, dfa: &MooreMachine, max_word_length: usize) -> bool {
    nfa.input_alphabet() == dfa.input_alphabet()
        && words_up_to(nfa.input_alphabet(), max_word_length)
            .all(|word| nfa.accepts(&word) == dfa.accepts(&word))
}

pub fn assert_same_language(nfa: &Nfa, dfa: &MooreMachine, max_word_length: usize) {
    assert_eq!(nfa.input_alphabet(), dfa.input_alphabet(), "alphabets differ");

    for word in words_up_to(nfa.input_alphabet(), max_word_length) {
        match (nfa.accepts(&word), dfa.accepts(&word)) {
            (true, false) => panic!(
                "{:?} is accepted by the automaton but not by its determinization",
                word
            ),
            (false, true) => panic!(
                "{:?} is accepted by the determinization but not by the automaton",
                word
            ),
            _ => {}
        }
    }
}
