use crate::schemes::Direction;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum GeneralizationOrder {
    #[strum(serialize = "first-order")]
    #[serde(rename = "first-order")]
    First,
    #[strum(serialize = "second-order")]
    #[serde(rename = "second-order")]
    Second,
}

impl GeneralizationOrder {
    /// Number of scored route positions per order, used to turn raw
    /// correctness into a proportion.
    pub fn correctness_scale(self) -> f64 {
        match self {
            Self::First => 4.0,
            Self::Second => 2.0,
        }
    }
}

/// One step of a planned route. Labels outside the four directions are kept
/// so positions stay aligned, but they can never be matched.
pub type RouteStep = Option<Direction>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trial {
    pub session_id: String,
    /// Lowercased; empty when missing.
    pub vehicle_type: String,
    /// Lowercased; constant across a participant's trials.
    pub dangerous_vehicle: String,
    /// Lowercased key presses in order.
    pub keys: Vec<char>,
    pub optimal_route: Vec<RouteStep>,
    pub order: Option<GeneralizationOrder>,
    pub phase: Option<f64>,

    // Questionnaire and pre-computed columns (first analysis only).
    pub worry: Option<f64>,
    pub somatic_anxiety: Option<f64>,
    pub correctness_generalization: Option<f64>,
    pub valid_generalization: Option<f64>,
    pub bias_second_order_valid: Option<f64>,
    pub bias_second_order_correct: Option<f64>,
}

impl Trial {
    pub fn has_vehicle(&self) -> bool {
        !self.vehicle_type.is_empty()
    }

    /// Proportion of the route answered correctly, from the exported
    /// `correctness_generalization` column.
    pub fn pcorrect(&self) -> Option<f64> {
        let scale = self.order?.correctness_scale();
        self.correctness_generalization.map(|c| c / scale)
    }
}

/// Trials of one analysis run, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub trials: Vec<Trial>,
}

impl Dataset {
    pub fn new(trials: Vec<Trial>) -> Self {
        Self { trials }
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Keeps only trials whose numeric phase equals `phase`.
    pub fn phase(&self, phase: i64) -> Dataset {
        let trials = self
            .trials
            .iter()
            .filter(|t| t.phase == Some(phase as f64))
            .cloned()
            .collect();
        Dataset { trials }
    }

    pub fn participant_count(&self) -> usize {
        let mut ids: Vec<&str> = self.trials.iter().map(|t| t.session_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}
