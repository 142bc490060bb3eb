use crate::reports;
use clap::Args;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use steerstat::config::{InputParams, PermutationParams};
use steerstat::data::load_trials;
use steerstat::error::SsResult;
use steerstat::permutation::{PermutationEngine, PermutationOptions, ProgressCallback};
use steerstat::schemes::VehicleKeyScheme;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct PermuteArgs {
    #[command(flatten)]
    pub params: PermutationParams,

    #[command(flatten)]
    pub input: InputParams,
}

/// Logs every completed tenth of the run.
struct LogProgress {
    last_decile: AtomicUsize,
}

impl ProgressCallback for LogProgress {
    fn on_progress(&self, completed: usize, total: usize) -> bool {
        let decile = (completed * 10).checked_div(total).unwrap_or(10);
        if decile > self.last_decile.swap(decile, Ordering::Relaxed) {
            info!("⏳ {}/{} permutations", completed, total);
        }
        true
    }
}

pub fn run(input: &Path, args: PermuteArgs, scheme: &VehicleKeyScheme) -> SsResult<()> {
    args.params.validate()?;
    let dataset = load_trials(input, args.input.permute_keys())?;
    let phase = dataset.phase(args.params.phase);
    info!(
        "Phase {}: {} of {} trials, {} participants",
        args.params.phase,
        phase.len(),
        dataset.len(),
        phase.participant_count()
    );
    if phase.is_empty() {
        warn!("No trials in phase {}; every statistic is undefined.", args.params.phase);
    }

    let options = PermutationOptions::from(&args.params);
    let engine = PermutationEngine::new(&phase.trials, scheme, options);
    let outcome = engine.run(LogProgress {
        last_decile: AtomicUsize::new(0),
    })?;

    reports::print_permutation_report(&outcome, &phase, args.params.phase);
    reports::print_null_histogram(&outcome, args.params.histogram_bins);

    if let Some(path) = &args.params.export_null {
        reports::export_nulls(path, &outcome.nulls)?;
        info!("💾 Null distributions written to {}", path.display());
    }

    Ok(())
}
