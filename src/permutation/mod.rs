pub mod shuffle;

pub use self::shuffle::shuffle_within_participants;

use crate::aggregate::{self, ParticipantGroups, Statistic, Statistics};
use crate::config::PermutationParams;
use crate::data::Trial;
use crate::error::{SsResult, SteerError};
use crate::schemes::VehicleKeyScheme;
use crate::stats::{p_value_greater_equal, NullSummary};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Iterations handed to the pool between progress checks.
const BATCH_SIZE: usize = 64;

#[derive(Debug, Clone)]
pub struct PermutationOptions {
    pub iterations: usize,
    pub seed: Option<u64>,
    /// Worker threads; `None` lets rayon decide.
    pub threads: Option<usize>,
    pub max_time: Option<Duration>,
    pub track_danger: bool,
}

impl Default for PermutationOptions {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: None,
            threads: None,
            max_time: None,
            track_danger: false,
        }
    }
}

impl From<&PermutationParams> for PermutationOptions {
    fn from(params: &PermutationParams) -> Self {
        Self {
            iterations: params.permutations,
            seed: params.seed,
            threads: params.threads,
            max_time: params.max_seconds.and_then(|secs| {
                match Duration::try_from_secs_f64(secs) {
                    Ok(limit) => Some(limit),
                    Err(e) => {
                        warn!("Ignoring --max-seconds {}: {}", secs, e);
                        None
                    }
                }
            }),
            track_danger: params.danger,
        }
    }
}

/// Receives updates between batches.
/// Returning `false` aborts the run.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize) -> bool;
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize) -> bool {
        true
    }
}

/// One null array per tracked statistic, each exactly `iterations` long.
/// Iterations where a statistic is undefined hold NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullDistributions {
    iterations: usize,
    values: BTreeMap<Statistic, Vec<f64>>,
}

impl NullDistributions {
    fn from_samples(samples: &[Statistics], track_danger: bool) -> Self {
        let values = Statistic::iter()
            .filter(|s| track_danger || !s.is_danger())
            .map(|stat| {
                let column = samples
                    .iter()
                    .map(|s| s.get(stat).unwrap_or(f64::NAN))
                    .collect();
                (stat, column)
            })
            .collect();
        Self {
            iterations: samples.len(),
            values,
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn get(&self, stat: Statistic) -> Option<&[f64]> {
        self.values.get(&stat).map(Vec::as_slice)
    }

    /// Tracked statistics in report order.
    pub fn statistics(&self) -> Vec<Statistic> {
        self.values.keys().copied().collect()
    }
}

/// Observed value, p-value and null summary of one statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticResult {
    pub statistic: Statistic,
    pub observed: Option<f64>,
    pub p_value: Option<f64>,
    pub null: Option<NullSummary>,
}

#[derive(Debug, Clone)]
pub struct PermutationOutcome {
    pub observed: Statistics,
    pub nulls: NullDistributions,
    pub elapsed: Duration,
}

impl PermutationOutcome {
    pub fn results(&self) -> Vec<StatisticResult> {
        self.nulls
            .statistics()
            .into_iter()
            .map(|stat| {
                let null = self.nulls.get(stat).unwrap_or(&[]);
                let observed = self.observed.get(stat);
                StatisticResult {
                    statistic: stat,
                    observed,
                    p_value: observed.map(|obs| p_value_greater_equal(null, obs)),
                    null: NullSummary::new(null),
                }
            })
            .collect()
    }
}

/// Builds null distributions by replaying the metrics on shuffled keys.
///
/// Iteration `i` draws its keys from an RNG seeded with the `i`-th value of a
/// master stream, so a fixed seed yields the same nulls whatever the thread
/// count or completion order.
pub struct PermutationEngine<'a> {
    trials: &'a [Trial],
    scheme: &'a VehicleKeyScheme,
    groups: ParticipantGroups,
    options: PermutationOptions,
}

impl<'a> PermutationEngine<'a> {
    pub fn new(
        trials: &'a [Trial],
        scheme: &'a VehicleKeyScheme,
        options: PermutationOptions,
    ) -> Self {
        Self {
            trials,
            scheme,
            groups: ParticipantGroups::new(trials),
            options,
        }
    }

    pub fn observed(&self) -> Statistics {
        aggregate::observed(
            self.trials,
            &self.groups,
            self.scheme,
            self.options.track_danger,
        )
    }

    /// Statistics of a single shuffled replica.
    pub fn iteration(&self, seed: u64) -> Statistics {
        let mut rng = fastrand::Rng::with_seed(seed);
        let keys = shuffle_within_participants(self.trials, &self.groups, &mut rng);
        aggregate::summarize(
            self.trials,
            &keys,
            &self.groups,
            self.scheme,
            self.options.track_danger,
        )
    }

    /// Runs every iteration. An abort from `callback` or an exceeded time
    /// limit yields [`SteerError::Interrupted`] and the partial nulls are
    /// dropped.
    pub fn run<CB: ProgressCallback>(&self, callback: CB) -> SsResult<PermutationOutcome> {
        let opts = &self.options;
        let requested = opts.iterations;

        let mut master = match opts.seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        let seeds: Vec<u64> = (0..requested).map(|_| master.u64(..)).collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads.unwrap_or(0))
            .build()
            .map_err(|e| SteerError::Config(format!("thread pool: {e}")))?;

        info!(
            "Permuting {} trials from {} participants, {} iterations on {} threads",
            self.trials.len(),
            self.groups.len(),
            requested,
            pool.current_num_threads()
        );

        let observed = self.observed();
        let start = Instant::now();
        let mut samples: Vec<Statistics> = Vec::with_capacity(requested);

        for batch in seeds.chunks(BATCH_SIZE) {
            if let Some(limit) = opts.max_time {
                if start.elapsed() >= limit {
                    warn!(
                        "Time limit of {:?} reached after {} of {} iterations",
                        limit,
                        samples.len(),
                        requested
                    );
                    return Err(SteerError::Interrupted {
                        completed: samples.len(),
                        requested,
                    });
                }
            }

            let stats: Vec<Statistics> =
                pool.install(|| batch.par_iter().map(|&s| self.iteration(s)).collect());
            samples.extend(stats);

            debug!("{}/{} permutations", samples.len(), requested);
            if !callback.on_progress(samples.len(), requested) {
                warn!("Permutation run aborted after {} iterations", samples.len());
                return Err(SteerError::Interrupted {
                    completed: samples.len(),
                    requested,
                });
            }
        }

        let elapsed = start.elapsed();
        info!("Finished {} permutations in {:.2?}", requested, elapsed);

        Ok(PermutationOutcome {
            observed,
            nulls: NullDistributions::from_samples(&samples, opts.track_danger),
            elapsed,
        })
    }
}
