//! Word acceptance across the conversions: the source automaton, its
//! determinization, its minimization and its regular expression must agree.

use formlang::{EliminationOrder, Error, FiniteAutomaton, Regex};
use rstest::rstest;

/// a b* (c|d)
fn abcd() -> FiniteAutomaton {
    let mut nfa = FiniteAutomaton::new();
    nfa.add_transition(0, "a", 1);
    nfa.add_transition(1, "b", 1);
    nfa.add_transition(1, "c", 2);
    nfa.add_transition(1, "d", 3);
    nfa.add_start_state(0);
    nfa.add_final_state(2);
    nfa.add_final_state(3);
    nfa
}

/// q0 -0-> q0, q0 -1-> q1, q1 -1-> q0; q1 final. Language 0*1(10*1)*.
fn zero_one() -> FiniteAutomaton {
    let mut fa = FiniteAutomaton::new();
    let q0 = fa.state("q0");
    let q1 = fa.state("q1");
    fa.add_transition(q0, "0", q0);
    fa.add_transition(q0, "1", q1);
    fa.add_transition(q1, "1", q0);
    fa.add_start_state(q0);
    fa.add_final_state(q1);
    fa
}

fn split(word: &str) -> Vec<String> {
    word.split_whitespace().map(str::to_string).collect()
}

#[rstest]
#[case("a b c", true)]
#[case("a c", true)]
#[case("a b b d", true)]
#[case("b", false)]
#[case("", false)]
#[case("a", false)]
#[case("a b", false)]
#[case("a c d", false)]
#[case("a b e", false)]
fn test_abcd(#[case] word: &str, #[case] expected: bool) {
    let nfa = abcd();
    let dfa = nfa.determinize();
    let minimal = dfa.minimize().unwrap();
    let regex = nfa.to_regex();
    let word = split(word);

    assert_eq!(nfa.accepts(&word), expected);
    assert_eq!(dfa.accepts(&word), expected);
    assert_eq!(minimal.accepts(&word), expected);
    assert_eq!(regex.accepts(&word), expected);
}

#[rstest]
#[case("1", true)]
#[case("0 1", true)]
#[case("1 1 1", true)]
#[case("0 1 1 0 1", true)]
#[case("0", false)]
#[case("0 0", false)]
#[case("1 0", false)]
#[case("0 1 1", false)]
#[case("0 0 1 1", false)]
fn test_zero_one_round_trip(#[case] word: &str, #[case] expected: bool) {
    let fa = zero_one();
    assert!(!fa.is_empty());
    let word = split(word);
    for order in [EliminationOrder::FewestEdges, EliminationOrder::Insertion] {
        let back = fa.to_regex_with(order).to_automaton();
        assert_eq!(back.accepts(&word), expected, "{order:?}");
    }
}

#[rstest]
#[case(Regex::star(Regex::symbol("a")), "a a a", true)]
#[case(Regex::star(Regex::symbol("a")), "", true)]
#[case(Regex::union(Regex::symbol("a"), Regex::Epsilon), "", true)]
#[case(Regex::concat(Regex::symbol("a"), Regex::Empty), "a", false)]
#[case(Regex::sequence(["x", "y", "z"].map(Regex::symbol)), "x y z", true)]
#[case(Regex::sequence(["x", "y", "z"].map(Regex::symbol)), "x z y", false)]
fn test_regex_accepts(#[case] regex: Regex, #[case] word: &str, #[case] expected: bool) {
    let word = split(word);
    assert_eq!(regex.accepts(&word), expected);
    let minimal = regex.to_automaton().determinize().minimize().unwrap();
    assert_eq!(minimal.accepts(&word), expected);
}

#[test]
fn test_redundant_final_pair_merges() {
    let mut dfa = FiniteAutomaton::new();
    dfa.add_start_state(0);
    dfa.add_transition(0, "x", 1);
    dfa.add_transition(0, "y", 2);
    dfa.add_final_state(1);
    dfa.add_final_state(2);

    let minimal = dfa.minimize().unwrap();
    assert_eq!(minimal.num_states(), 2);
    assert!(minimal.is_equivalent(&dfa));
}

#[test]
fn test_preconditions() {
    let nfa = abcd().union(&zero_one());
    assert_eq!(nfa.minimize().unwrap_err(), Error::NotDeterministic);
    assert_eq!(nfa.complement().unwrap_err(), Error::NotDeterministic);

    let partial = abcd().determinize();
    assert_eq!(partial.complement().unwrap_err(), Error::NotTotal);
    let total = partial.complete();
    assert_eq!(total.intersect(&partial).unwrap_err(), Error::NotTotal);
    assert!(total.intersect(&total).is_ok());
}

#[test]
fn test_operands_are_untouched() {
    let a = abcd();
    let b = zero_one();
    let before = (a.num_states(), a.num_transitions(), b.num_states());

    let _ = a.union(&b);
    let _ = a.concatenate(&b);
    let _ = a.kleene_star();
    let _ = a.difference(&b);
    let _ = a.determinize().minimize();

    assert_eq!(before, (a.num_states(), a.num_transitions(), b.num_states()));
}
