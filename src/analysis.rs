//! First-pass analysis of the exported trial table: proportion correct,
//! order comparison, questionnaire correlations, danger-aligned mistakes and
//! a second-order regression.

use crate::aggregate::{participant_danger, subject_mean, ParticipantGroups};
use crate::data::{GeneralizationOrder, Trial};
use crate::schemes::{Axis, VehicleKeyScheme};
use crate::stats::hypothesis::{self, Correlation, OlsFit, TTest};
use crate::stats::mean;
use tracing::debug;

/// Second-order rows needed before the regression is attempted.
pub const MIN_OLS_ROWS: usize = 30;

/// A test that either ran or was skipped for lack of data.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome<T> {
    Ran(T),
    Skipped(String),
}

impl<T> TestOutcome<T> {
    fn from_option(value: Option<T>, reason: &str) -> Self {
        match value {
            Some(v) => Self::Ran(v),
            None => Self::Skipped(reason.to_string()),
        }
    }

    pub fn ran(&self) -> Option<&T> {
        match self {
            Self::Ran(v) => Some(v),
            Self::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRow {
    pub left: &'static str,
    pub right: &'static str,
    pub result: Option<Correlation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisDanger {
    pub axis: Axis,
    pub mean: f64,
    pub t_test: Option<TTest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirstAnalysis {
    pub overall_pcorrect: Option<f64>,
    pub pcorrect_by_order: Vec<(GeneralizationOrder, f64)>,
    /// Means of the validity and second-order bias columns as exported by
    /// the game, for rows where they are present.
    pub exported_means: Vec<(&'static str, f64)>,
    pub order_t_test: TestOutcome<TTest>,
    pub correlations: TestOutcome<Vec<CorrelationRow>>,
    pub danger: TestOutcome<Vec<AxisDanger>>,
    pub ols: TestOutcome<OlsFit>,
}

fn pcorrect_of(trials: &[Trial], order: GeneralizationOrder) -> Vec<f64> {
    trials
        .iter()
        .filter(|t| t.order == Some(order))
        .filter_map(Trial::pcorrect)
        .collect()
}

/// Welch t-test of pcorrect between first- and second-order trials.
pub fn order_t_test(trials: &[Trial]) -> TestOutcome<TTest> {
    let first = pcorrect_of(trials, GeneralizationOrder::First);
    let second = pcorrect_of(trials, GeneralizationOrder::Second);
    if first.len() < 2 || second.len() < 2 {
        return TestOutcome::Skipped("not enough data".into());
    }
    TestOutcome::from_option(
        hypothesis::welch_t_test(&first, &second),
        "zero variance in both groups",
    )
}

/// Participant-level mean pcorrect, worry and somatic anxiety. Participants
/// missing any of the three are dropped.
pub fn participant_profiles(trials: &[Trial]) -> Vec<(String, [f64; 3])> {
    let groups = ParticipantGroups::new(trials);
    let pcorrect = subject_mean(trials, Trial::pcorrect);
    groups
        .ids
        .iter()
        .zip(&groups.members)
        .filter_map(|(id, members)| {
            let rows: Vec<&Trial> = members.iter().map(|&i| &trials[i]).collect();
            let pcorrect = *pcorrect.get(id)?;
            let worry = rows.iter().find_map(|t| t.worry)?;
            let somatic = rows.iter().find_map(|t| t.somatic_anxiety)?;
            Some((id.clone(), [pcorrect, worry, somatic]))
        })
        .collect()
}

pub fn correlations(trials: &[Trial]) -> TestOutcome<Vec<CorrelationRow>> {
    let profiles = participant_profiles(trials);
    if profiles.len() < 2 {
        return TestOutcome::Skipped("<2 participants".into());
    }
    let column = |i: usize| -> Vec<f64> { profiles.iter().map(|(_, p)| p[i]).collect() };
    let (pc, worry, somatic) = (column(0), column(1), column(2));

    TestOutcome::Ran(vec![
        CorrelationRow {
            left: "pcorrect",
            right: "worry",
            result: hypothesis::pearson(&pc, &worry),
        },
        CorrelationRow {
            left: "pcorrect",
            right: "somatic_anxiety",
            result: hypothesis::pearson(&pc, &somatic),
        },
        CorrelationRow {
            left: "worry",
            right: "somatic_anxiety",
            result: hypothesis::pearson(&worry, &somatic),
        },
    ])
}

/// Mean participant danger-alignment per axis with a one-sample t-test
/// against zero.
pub fn danger_summary(trials: &[Trial], scheme: &VehicleKeyScheme) -> TestOutcome<Vec<AxisDanger>> {
    let groups = ParticipantGroups::new(trials);
    let keys: Vec<&[char]> = trials.iter().map(|t| t.keys.as_slice()).collect();
    let scores = participant_danger(trials, &keys, &groups, scheme);
    debug!("{} participants with scored mistakes", scores.len());

    if scores.is_empty() {
        return TestOutcome::Skipped("no mistakes detected".into());
    }

    let axes = [Axis::UpDown, Axis::LeftRight]
        .into_iter()
        .filter_map(|axis| {
            let values: Vec<f64> = scores.iter().map(|(_, d)| d.axis(axis) as f64).collect();
            Some(AxisDanger {
                axis,
                mean: mean(&values)?,
                t_test: hypothesis::one_sample_t_test(&values, 0.0),
            })
        })
        .collect();
    TestOutcome::Ran(axes)
}

/// `pcorrect ~ worry + somatic_anxiety + danger` over second-order trials.
pub fn second_order_regression(trials: &[Trial]) -> TestOutcome<OlsFit> {
    let second: Vec<&Trial> = trials
        .iter()
        .filter(|t| t.order == Some(GeneralizationOrder::Second))
        .collect();
    if second.len() <= MIN_OLS_ROWS {
        return TestOutcome::Skipped(format!(
            "not enough second-order rows (≤{MIN_OLS_ROWS})"
        ));
    }

    let mut y = Vec::new();
    let (mut worry, mut somatic, mut danger) = (Vec::new(), Vec::new(), Vec::new());
    for t in second {
        let (Some(pc), Some(w), Some(s)) = (t.pcorrect(), t.worry, t.somatic_anxiety) else {
            continue;
        };
        let dangerous = t.has_vehicle() && t.vehicle_type == t.dangerous_vehicle;
        y.push(pc);
        worry.push(w);
        somatic.push(s);
        danger.push(if dangerous { 1.0 } else { 0.0 });
    }

    TestOutcome::from_option(
        hypothesis::ols(
            &y,
            &[
                ("worry", worry),
                ("somatic_anxiety", somatic),
                ("danger", danger),
            ],
        ),
        "design matrix is singular or has too few complete rows",
    )
}

fn exported_means(trials: &[Trial]) -> Vec<(&'static str, f64)> {
    let columns: [(&'static str, fn(&Trial) -> Option<f64>); 3] = [
        ("valid_generalization", |t| t.valid_generalization),
        ("bias_second_order_valid", |t| t.bias_second_order_valid),
        ("bias_second_order_correct", |t| t.bias_second_order_correct),
    ];
    columns
        .into_iter()
        .filter_map(|(name, get)| {
            let values: Vec<f64> = trials.iter().filter_map(get).collect();
            mean(&values).map(|m| (name, m))
        })
        .collect()
}

pub fn run(trials: &[Trial], scheme: &VehicleKeyScheme) -> FirstAnalysis {
    let all: Vec<f64> = trials.iter().filter_map(Trial::pcorrect).collect();
    let pcorrect_by_order = [GeneralizationOrder::First, GeneralizationOrder::Second]
        .into_iter()
        .filter_map(|order| mean(&pcorrect_of(trials, order)).map(|m| (order, m)))
        .collect();

    FirstAnalysis {
        overall_pcorrect: mean(&all),
        pcorrect_by_order,
        exported_means: exported_means(trials),
        order_t_test: order_t_test(trials),
        correlations: correlations(trials),
        danger: danger_summary(trials, scheme),
        ols: second_order_regression(trials),
    }
}
