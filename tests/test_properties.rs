//! Structural properties every sequence form must satisfy, checked on the
//! bundled games.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use seqform::game::Behavior;
use seqform::games::{Goofspiel, KuhnPoker, LeducHoldem, LiarsDice};
use seqform::{build, expected_value, BehaviorProfile, GameState, SequenceForm, SequenceTree};

type Form = SequenceForm<String, String>;

fn all_forms() -> Vec<(&'static str, Form)> {
    vec![
        ("kuhn", build(&KuhnPoker::new()).unwrap()),
        ("leduc", build(&LeducHoldem::new()).unwrap()),
        ("goofspiel", build(&Goofspiel::with_cards("123").unwrap()).unwrap()),
        ("liars-dice", build(&LiarsDice::new(1).unwrap()).unwrap()),
    ]
}

// ---------------------------------------------------------------------------
// Tree layout
// ---------------------------------------------------------------------------

fn check_tree(name: &str, tree: &SequenceTree<String, String>) {
    assert_eq!(tree.idx[0], 1, "{}", name);
    assert_eq!(tree.idx.len(), tree.par.len() + 1, "{}", name);
    assert_eq!(tree.obs.len(), tree.par.len(), "{}", name);
    for i in 0..tree.par.len() {
        assert!(tree.idx[i] < tree.idx[i + 1], "{}: idx not increasing at {}", name, i);
        assert_eq!(
            tree.action[i].len(),
            tree.idx[i + 1] - tree.idx[i],
            "{}: action count at {}",
            name,
            i
        );
        assert!(tree.par[i] < tree.idx[i], "{}: parent after child at {}", name, i);
    }
}

#[test]
fn offsets_and_parents_are_canonical() {
    for (name, form) in all_forms() {
        check_tree(name, &form.x);
        check_tree(name, &form.y);
        form.validate().unwrap();
    }
}

#[test]
fn every_infoset_label_is_unique_per_seat() {
    for (name, form) in all_forms() {
        for tree in [&form.x, &form.y] {
            let mut labels = tree.obs.clone();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), tree.obs.len(), "{}", name);
        }
    }
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

#[test]
fn matrix_is_sorted_and_zero_free() {
    for (name, form) in all_forms() {
        let a = &form.a;
        assert_eq!(a.row.len(), a.data.len(), "{}", name);
        assert_eq!(a.col.len(), a.data.len(), "{}", name);
        assert!(a.data.iter().all(|&v| v != 0.0), "{}: zero entry", name);
        for k in 1..a.data.len() {
            assert!(
                (a.row[k - 1], a.col[k - 1]) < (a.row[k], a.col[k]),
                "{}: entry {} out of order",
                name,
                k
            );
        }
        assert!(a.row.iter().all(|&r| r < form.x.num_sequences()), "{}", name);
        assert!(a.col.iter().all(|&c| c < form.y.num_sequences()), "{}", name);
    }
}

#[test]
fn kuhn_sizes() {
    let form = build(&KuhnPoker::new()).unwrap();
    assert_eq!(form.x.num_sequences(), 13);
    assert_eq!(form.y.num_sequences(), 13);
    // Opening decisions hang off the empty sequence, one per card.
    assert_eq!(form.x.par.iter().filter(|&&p| p == 0).count(), 3);
    // The second seat acts at most once per hand.
    assert!(form.y.par.iter().all(|&p| p == 0));
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn rebuilding_gives_identical_json() {
    for (name, form) in all_forms() {
        let again = match name {
            "kuhn" => build(&KuhnPoker::new()).unwrap(),
            "leduc" => build(&LeducHoldem::new()).unwrap(),
            "goofspiel" => build(&Goofspiel::with_cards("123").unwrap()).unwrap(),
            _ => build(&LiarsDice::new(1).unwrap()).unwrap(),
        };
        assert_eq!(form.to_json().unwrap(), again.to_json().unwrap(), "{}", name);
    }
}

// ---------------------------------------------------------------------------
// Payoff semantics
// ---------------------------------------------------------------------------

fn check_bilinear_matches_tree_walk<S>(initial: &S, seed: u64)
where
    S: GameState<Action = String, Obs = String>,
{
    let form = build(initial).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..3 {
        let first = form.x.random_behavior(&mut rng);
        let second = form.y.random_behavior(&mut rng);
        let x = form.x.realization(&first).unwrap();
        let y = form.y.realization(&second).unwrap();

        let bilinear = form.value(&x, &y).unwrap();
        let walked = expected_value(initial, &BehaviorProfile::new(first, second)).unwrap();
        assert_abs_diff_eq!(bilinear, walked, epsilon = 1e-9);

        // A best response never does worse than the profile itself.
        assert!(form.gap(&x, &y).unwrap() >= -1e-9);
    }
}

#[test]
fn kuhn_bilinear_value_matches_tree_walk() {
    check_bilinear_matches_tree_walk(&KuhnPoker::new(), 1);
}

#[test]
fn leduc_bilinear_value_matches_tree_walk() {
    check_bilinear_matches_tree_walk(&LeducHoldem::new(), 2);
}

#[test]
fn goofspiel_bilinear_value_matches_tree_walk() {
    check_bilinear_matches_tree_walk(&Goofspiel::with_cards("123").unwrap(), 3);
}

#[test]
fn liars_dice_bilinear_value_matches_tree_walk() {
    check_bilinear_matches_tree_walk(&LiarsDice::new(1).unwrap(), 4);
}

#[test]
fn symmetric_goofspiel_is_fair_under_uniform_play() {
    let game = Goofspiel::with_cards("123").unwrap();
    let form = build(&game).unwrap();
    let x = form.x.realization(&form.x.uniform_behavior()).unwrap();
    let y = form.y.realization(&form.y.uniform_behavior()).unwrap();
    assert_abs_diff_eq!(form.value(&x, &y).unwrap(), 0.0, epsilon = 1e-9);
}

#[test]
fn kuhn_always_bet_against_always_fold_wins_ante() {
    let form = build(&KuhnPoker::new()).unwrap();
    // Opening labels are just the card; bet there, fold everywhere else.
    let first: Behavior<String> = form
        .x
        .obs
        .iter()
        .map(|obs| {
            let opening = !obs.contains(',');
            (obs.clone(), if opening { vec![0.0, 1.0] } else { vec![1.0, 0.0] })
        })
        .collect();
    let second: Behavior<String> = form
        .y
        .obs
        .iter()
        .map(|obs| (obs.clone(), vec![1.0, 0.0]))
        .collect();
    let x = form.x.realization(&first).unwrap();
    let y = form.y.realization(&second).unwrap();
    assert_abs_diff_eq!(form.value(&x, &y).unwrap(), 1.0, epsilon = 1e-12);

    let profile = BehaviorProfile::new(first, second);
    let walked = expected_value(&KuhnPoker::new(), &profile).unwrap();
    assert_abs_diff_eq!(walked, 1.0, epsilon = 1e-12);
}
