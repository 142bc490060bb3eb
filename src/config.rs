use crate::data::loader::{COL_PLAN_SEQ, COL_RAW_INPUT_SEQ};
use crate::error::{SsResult, SteerError};
use crate::schemes::{KnownScheme, SchemeDefinition, VehicleKeyScheme};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermutationParams {
    #[arg(long, default_value_t = 1000)]
    pub permutations: usize,

    /// Fixes the random source; omit for a non-reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only trials from this phase enter the test.
    #[arg(long, default_value_t = 2)]
    pub phase: i64,

    /// Worker threads (default: available parallelism).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Wall-clock budget; the run is abandoned once it is exceeded.
    #[arg(long)]
    pub max_seconds: Option<f64>,

    /// Also test the two danger-alignment statistics.
    #[arg(long, default_value_t = false)]
    pub danger: bool,

    #[arg(long, default_value_t = 30)]
    pub histogram_bins: usize,

    /// Writes every null distribution to this CSV file.
    #[arg(long)]
    pub export_null: Option<PathBuf>,
}

impl Default for PermutationParams {
    fn default() -> Self {
        Self {
            permutations: 1000,
            seed: None,
            phase: 2,
            threads: None,
            max_seconds: None,
            danger: false,
            histogram_bins: 30,
            export_null: None,
        }
    }
}

impl PermutationParams {
    pub fn validate(&self) -> SsResult<()> {
        if self.histogram_bins == 0 {
            return Err(SteerError::Config(
                "--histogram-bins must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    /// Column holding the key sequence. If it is absent the other known
    /// sequence column is used.
    #[arg(long)]
    pub keys_column: Option<String>,
}

impl InputParams {
    pub fn keys_column_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.keys_column.as_deref().unwrap_or(default)
    }

    /// Preferred column for the permutation test.
    pub fn permute_keys(&self) -> &str {
        self.keys_column_or(COL_PLAN_SEQ)
    }

    /// Preferred column for the first-pass analysis.
    pub fn analyze_keys(&self) -> &str {
        self.keys_column_or(COL_RAW_INPUT_SEQ)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SchemeParams {
    /// Built-in key scheme: car-truck (v1) or car-sedan (v2).
    #[arg(global = true, long, default_value = "car-sedan")]
    pub scheme: KnownScheme,

    /// JSON scheme definition; overrides --scheme.
    #[arg(global = true, long)]
    pub scheme_file: Option<PathBuf>,
}

impl SchemeParams {
    pub fn resolve(&self) -> SsResult<VehicleKeyScheme> {
        let scheme = match &self.scheme_file {
            Some(path) => {
                info!("📂 Loading key scheme: {}", path.display());
                let def = SchemeDefinition::load_from_file(path)?;
                VehicleKeyScheme::from_definition(def)
            }
            None => {
                info!("🔑 Using built-in key scheme: {}", self.scheme);
                self.scheme.build()
            }
        };
        let mut vehicles: Vec<&str> = scheme.vehicle_types().collect();
        vehicles.sort_unstable();
        debug!("Vehicle types: {}", vehicles.join(", "));
        Ok(scheme)
    }
}
