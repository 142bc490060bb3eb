use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use steerstat::aggregate::ParticipantGroups;
use steerstat::data::{GeneralizationOrder, Trial};
use steerstat::permutation::{NoProgress, PermutationEngine, PermutationOptions};
use steerstat::schemes::{Direction, KnownScheme};

const VEHICLES: [&str; 6] = [
    "small_car",
    "big_car",
    "medium_car",
    "small_sedan",
    "big_sedan",
    "medium_sedan",
];

/// 40 participants with 24 trials each, keys drawn from both categories.
fn synthetic_trials() -> Vec<Trial> {
    let mut rng = fastrand::Rng::with_seed(2024);
    let alphabet: Vec<char> = "wxadecsfynghumjk".chars().collect();
    let dirs = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    (0..40)
        .flat_map(|p| (0..24).map(move |t| (p, t)))
        .map(|(p, t)| {
            let len = rng.usize(0..8);
            Trial {
                session_id: format!("p{}", p),
                vehicle_type: VEHICLES[t % VEHICLES.len()].to_string(),
                dangerous_vehicle: VEHICLES[p % VEHICLES.len()].to_string(),
                keys: (0..len).map(|_| alphabet[rng.usize(..alphabet.len())]).collect(),
                optimal_route: (0..4).map(|_| Some(dirs[rng.usize(..4)])).collect(),
                order: Some(if t % 3 == 0 {
                    GeneralizationOrder::Second
                } else {
                    GeneralizationOrder::First
                }),
                phase: Some(2.0),
                ..Default::default()
            }
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let trials = synthetic_trials();
    let scheme = KnownScheme::CarSedan.build();

    let single = PermutationEngine::new(
        &trials,
        &scheme,
        PermutationOptions {
            track_danger: true,
            ..Default::default()
        },
    );
    c.bench_function("single_iteration", |b| {
        b.iter(|| single.iteration(black_box(7)))
    });

    let groups = ParticipantGroups::new(&trials);
    c.bench_function("shuffle_only", |b| {
        let mut rng = fastrand::Rng::with_seed(1);
        b.iter(|| steerstat::permutation::shuffle_within_participants(&trials, &groups, &mut rng))
    });

    let run = PermutationEngine::new(
        &trials,
        &scheme,
        PermutationOptions {
            iterations: 200,
            seed: Some(42),
            ..Default::default()
        },
    );
    c.bench_function("run_200_permutations", |b| {
        b.iter(|| run.run(NoProgress))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
