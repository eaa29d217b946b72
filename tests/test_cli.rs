//! End-to-end runs of the command-line entry point.

use seqform::cli::run_with_args;
use seqform::SequenceForm;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn build_writes_loadable_json() {
    let path = std::env::temp_dir().join(format!("seqform-kuhn-{}.json", std::process::id()));
    let path_str = path.to_string_lossy().to_string();

    run_with_args(args(&["seqform", "build", "kuhn", "--output", &path_str]));

    let json = std::fs::read_to_string(&path).unwrap();
    let form: SequenceForm<String, String> = SequenceForm::from_json(&json).unwrap();
    form.validate().unwrap();
    assert_eq!(form.x.num_sequences(), 13);

    run_with_args(args(&["seqform", "check", &path_str]));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn custom_leduc_deck_builds() {
    let path = std::env::temp_dir().join(format!("seqform-leduc-{}.json", std::process::id()));
    let path_str = path.to_string_lossy().to_string();

    run_with_args(args(&[
        "seqform", "build", "leduc", "--cards", "JQ", "--pretty", "-o", &path_str,
    ]));

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains('\n'));
    let form: SequenceForm<String, String> = SequenceForm::from_json(&json).unwrap();
    form.validate().unwrap();
    // Two ranks: one private card each, so two opening sets for the first seat.
    assert_eq!(form.x.par.iter().filter(|&&p| p == 0).count(), 2);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn stats_runs_for_every_game() {
    run_with_args(args(&["seqform", "stats", "kuhn"]));
    run_with_args(args(&["seqform", "stats", "goofspiel", "--cards", "123"]));
    run_with_args(args(&["seqform", "-v", "stats", "liars-dice", "--dice", "1"]));
}
