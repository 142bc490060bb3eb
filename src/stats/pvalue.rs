/// One-tailed permutation p-value with the +1 correction:
/// `(#{null >= observed} + 1) / (N + 1)`.
///
/// Undefined draws (NaN) stay in the denominator but never count as
/// exceeding the observed value, so the result always lies in
/// `[1 / (N + 1), 1]`.
#[must_use]
pub fn p_value_greater_equal(null: &[f64], observed: f64) -> f64 {
    let exceed = null.iter().filter(|&&v| v >= observed).count();
    (exceed + 1) as f64 / (null.len() + 1) as f64
}
