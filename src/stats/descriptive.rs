/// Mean and spread of a null distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NullSummary {
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator). Zero for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Number of finite values the summary was computed from.
    pub count: usize,
}

impl NullSummary {
    /// Summarizes the finite entries of `values`. Returns `None` when there
    /// are none.
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let mean = mean(&finite)?;
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            std_dev: sample_std_dev(&finite).unwrap_or(0.0),
            min,
            max,
            count: finite.len(),
        })
    }
}

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance. Needs at least two values.
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}
