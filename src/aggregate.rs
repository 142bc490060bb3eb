//! Trial-level and participant-level aggregation.
//!
//! Correctness is pooled over trials within each generalization order, while
//! validity is averaged per participant first and then across participants.
//! The hypothesis tests target exactly this asymmetry.

use crate::data::{GeneralizationOrder, Trial};
use crate::metrics::{self, danger_alignment, DangerAlignment, TrialMetrics};
use crate::schemes::{Axis, VehicleKeyScheme};
use crate::stats::mean;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use strum_macros::{Display, EnumIter};

/// Trial indices grouped by session id, in order of first appearance.
/// Indices inside a group keep file order.
#[derive(Debug, Clone, Default)]
pub struct ParticipantGroups {
    pub ids: Vec<String>,
    pub members: Vec<Vec<usize>>,
}

impl ParticipantGroups {
    pub fn new(trials: &[Trial]) -> Self {
        let mut slot: HashMap<&str, usize> = HashMap::new();
        let mut groups = Self::default();

        for (idx, trial) in trials.iter().enumerate() {
            let g = *slot.entry(trial.session_id.as_str()).or_insert_with(|| {
                groups.ids.push(trial.session_id.clone());
                groups.members.push(Vec::new());
                groups.members.len() - 1
            });
            groups.members[g].push(idx);
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Per-participant mean of `metric`, called with trial indices.
    /// Undefined values are skipped; a participant with none is left out.
    pub fn subject_means<F>(&self, metric: F) -> BTreeMap<String, f64>
    where
        F: Fn(usize) -> Option<f64>,
    {
        self.ids
            .iter()
            .zip(&self.members)
            .filter_map(|(id, members)| {
                let values: Vec<f64> = members.iter().filter_map(|&i| metric(i)).collect();
                mean(&values).map(|m| (id.clone(), m))
            })
            .collect()
    }
}

/// Per-participant mean of a per-trial metric. Trials where the metric is
/// undefined do not count.
pub fn subject_mean<F>(trials: &[Trial], metric: F) -> BTreeMap<String, f64>
where
    F: Fn(&Trial) -> Option<f64>,
{
    ParticipantGroups::new(trials).subject_means(|i| metric(&trials[i]))
}

/// Simple mean over participants, so heavy responders do not dominate.
pub fn grand_mean_of_subject_means(subject_means: &BTreeMap<String, f64>) -> Option<f64> {
    let values: Vec<f64> = subject_means.values().copied().collect();
    mean(&values)
}

/// Pooled mean correctness over all trials of one generalization order.
pub fn order_mean(
    trials: &[Trial],
    metrics: &[TrialMetrics],
    order: GeneralizationOrder,
) -> Option<f64> {
    let values: Vec<f64> = trials
        .iter()
        .zip(metrics)
        .filter(|(t, _)| t.order == Some(order))
        .map(|(_, m)| m.correct as f64)
        .collect();
    mean(&values)
}

/// Danger-alignment totals for every participant that has at least one
/// scored mistake. Trials with no vehicle, no keys, or an unrecognised
/// dangerous-vehicle label are left out.
pub fn participant_danger<K: AsRef<[char]>>(
    trials: &[Trial],
    keys: &[K],
    groups: &ParticipantGroups,
    scheme: &VehicleKeyScheme,
) -> Vec<(String, DangerAlignment)> {
    let mut out = Vec::new();
    for (id, members) in groups.ids.iter().zip(&groups.members) {
        let mut total = DangerAlignment::default();
        for &i in members {
            let trial = &trials[i];
            let trial_keys = keys[i].as_ref();
            if !trial.has_vehicle() || trial_keys.is_empty() {
                continue;
            }
            let Some(category) = scheme.category_of_label(&trial.dangerous_vehicle) else {
                continue;
            };
            total += danger_alignment(trial_keys, &trial.vehicle_type, category, scheme);
        }
        if total.scored > 0 {
            out.push((id.clone(), total));
        }
    }
    out
}

/// Tracked statistics, in report order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize,
)]
pub enum Statistic {
    #[strum(to_string = "Raw correctness – first-order")]
    FirstOrderCorrect,
    #[strum(to_string = "Raw correctness – second-order")]
    SecondOrderCorrect,
    #[strum(to_string = "Valid generalization (subj-mean)")]
    SubjectValid,
    #[strum(to_string = "Danger alignment – updown")]
    DangerUpDown,
    #[strum(to_string = "Danger alignment – leftright")]
    DangerLeftRight,
}

impl Statistic {
    /// Short column name for exports.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstOrderCorrect => "first_order_correct",
            Self::SecondOrderCorrect => "second_order_correct",
            Self::SubjectValid => "subject_valid",
            Self::DangerUpDown => "danger_updown",
            Self::DangerLeftRight => "danger_leftright",
        }
    }

    pub fn is_danger(&self) -> bool {
        matches!(self, Self::DangerUpDown | Self::DangerLeftRight)
    }
}

/// The tracked statistics of one dataset (observed or permuted).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    pub first_order_correct: Option<f64>,
    pub second_order_correct: Option<f64>,
    pub subject_valid: Option<f64>,
    pub danger_up_down: Option<f64>,
    pub danger_left_right: Option<f64>,
}

impl Statistics {
    pub fn get(&self, stat: Statistic) -> Option<f64> {
        match stat {
            Statistic::FirstOrderCorrect => self.first_order_correct,
            Statistic::SecondOrderCorrect => self.second_order_correct,
            Statistic::SubjectValid => self.subject_valid,
            Statistic::DangerUpDown => self.danger_up_down,
            Statistic::DangerLeftRight => self.danger_left_right,
        }
    }
}

/// Recomputes all metrics for `trials` scored with `keys` (one entry per
/// trial) and aggregates them.
pub fn summarize<K: AsRef<[char]>>(
    trials: &[Trial],
    keys: &[K],
    groups: &ParticipantGroups,
    scheme: &VehicleKeyScheme,
    track_danger: bool,
) -> Statistics {
    debug_assert_eq!(trials.len(), keys.len());

    let scored: Vec<TrialMetrics> = trials
        .iter()
        .zip(keys)
        .map(|(t, k)| metrics::evaluate(t, k.as_ref(), scheme))
        .collect();

    let mut stats = Statistics {
        first_order_correct: order_mean(trials, &scored, GeneralizationOrder::First),
        second_order_correct: order_mean(trials, &scored, GeneralizationOrder::Second),
        subject_valid: grand_mean_of_subject_means(
            &groups.subject_means(|i| Some(scored[i].valid)),
        ),
        ..Default::default()
    };

    // No participant with a scored mistake means no alignment either way.
    if track_danger {
        let danger = participant_danger(trials, keys, groups, scheme);
        let axis_mean = |axis: Axis| {
            let values: Vec<f64> = danger.iter().map(|(_, d)| d.axis(axis) as f64).collect();
            Some(mean(&values).unwrap_or(0.0))
        };
        stats.danger_up_down = axis_mean(Axis::UpDown);
        stats.danger_left_right = axis_mean(Axis::LeftRight);
    }

    stats
}

/// Statistics of the data as observed.
pub fn observed(
    trials: &[Trial],
    groups: &ParticipantGroups,
    scheme: &VehicleKeyScheme,
    track_danger: bool,
) -> Statistics {
    let keys: Vec<&[char]> = trials.iter().map(|t| t.keys.as_slice()).collect();
    summarize(trials, &keys, groups, scheme, track_danger)
}
