pub mod danger;
pub mod sequence;

pub use self::danger::{danger_alignment, DangerAlignment};
pub use self::sequence::{decode, recompute_correct, recompute_valid};

use crate::data::Trial;
use crate::schemes::VehicleKeyScheme;

/// Per-trial scores recomputed from a key sequence.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TrialMetrics {
    pub correct: usize,
    pub valid: f64,
}

/// Scores one trial against `keys`, which may be the trial's own keys or a
/// shuffled replacement of the same length.
pub fn evaluate(trial: &Trial, keys: &[char], scheme: &VehicleKeyScheme) -> TrialMetrics {
    TrialMetrics {
        correct: recompute_correct(keys, &trial.optimal_route, &trial.vehicle_type, scheme),
        valid: recompute_valid(keys, &trial.vehicle_type, scheme),
    }
}
