mod common;

use std::io::Cursor;
use steerstat::data::load_trials_from_reader;
use steerstat::permutation::{NoProgress, PermutationEngine, PermutationOptions};
use steerstat::schemes::KnownScheme;

fn nulls_as_bits(seed: Option<u64>, threads: usize) -> Vec<Vec<u64>> {
    let csv = common::to_csv(&common::sample_rows());
    let (ds, _) = load_trials_from_reader(Cursor::new(csv), "plan_seq").unwrap();
    let phase = ds.phase(2);
    let scheme = KnownScheme::CarSedan.build();
    let options = PermutationOptions {
        iterations: 300,
        seed,
        threads: Some(threads),
        max_time: None,
        track_danger: true,
    };
    let outcome = PermutationEngine::new(&phase.trials, &scheme, options)
        .run(NoProgress)
        .unwrap();
    outcome
        .nulls
        .statistics()
        .into_iter()
        .map(|s| outcome.nulls.get(s).unwrap().iter().map(|v| v.to_bits()).collect())
        .collect()
}

#[test]
fn fixed_seed_gives_identical_nulls() {
    assert_eq!(nulls_as_bits(Some(42), 2), nulls_as_bits(Some(42), 2));
}

#[test]
fn thread_count_does_not_change_nulls() {
    assert_eq!(nulls_as_bits(Some(7), 1), nulls_as_bits(Some(7), 3));
}

#[test]
fn different_seeds_differ() {
    assert_ne!(nulls_as_bits(Some(1), 1), nulls_as_bits(Some(2), 1));
}
