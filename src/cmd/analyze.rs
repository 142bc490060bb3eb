use crate::reports;
use clap::Args;
use std::path::Path;
use steerstat::analysis;
use steerstat::config::InputParams;
use steerstat::data::load_trials;
use steerstat::error::SsResult;
use steerstat::schemes::VehicleKeyScheme;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputParams,
}

pub fn run(input: &Path, args: AnalyzeArgs, scheme: &VehicleKeyScheme) -> SsResult<()> {
    let dataset = load_trials(input, args.input.analyze_keys())?;
    info!(
        "Analysing {} trials from {} participants",
        dataset.len(),
        dataset.participant_count()
    );

    let report = analysis::run(&dataset.trials, scheme);
    reports::print_analysis_report(&report);
    Ok(())
}
