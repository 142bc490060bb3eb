//! Classical tests used by the first-pass analysis.
//!
//! Every function returns `None` when the sample is too small or degenerate
//! for the test to be meaningful, so callers can print a skip notice instead
//! of a fabricated number.

use super::descriptive::{mean, sample_variance};
use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    pub statistic: f64,
    pub df: f64,
    /// Two-sided.
    pub p_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_err: f64,
    pub t: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub coefficients: Vec<Coefficient>,
    pub r_squared: f64,
    pub n: usize,
    pub df_resid: usize,
}

fn two_sided_p(t: f64, df: f64) -> Option<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Welch's unequal-variance t-test of `a` against `b`.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let va = sample_variance(a)? / na;
    let vb = sample_variance(b)? / nb;
    let se2 = va + vb;
    if se2 <= 0.0 {
        return None;
    }
    let statistic = (mean(a)? - mean(b)?) / se2.sqrt();
    let df = se2.powi(2) / (va.powi(2) / (na - 1.0) + vb.powi(2) / (nb - 1.0));
    Some(TTest {
        statistic,
        df,
        p_value: two_sided_p(statistic, df)?,
    })
}

pub fn one_sample_t_test(values: &[f64], popmean: f64) -> Option<TTest> {
    let n = values.len() as f64;
    let se = (sample_variance(values)? / n).sqrt();
    if se <= 0.0 {
        return None;
    }
    let statistic = (mean(values)? - popmean) / se;
    let df = n - 1.0;
    Some(TTest {
        statistic,
        df,
        p_value: two_sided_p(statistic, df)?,
    })
}

/// Pearson correlation with a two-sided p-value. Two points always
/// correlate perfectly, so their p-value is 1.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<Correlation> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    let (mx, my) = (mean(x)?, mean(y)?);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

    let p_value = if n == 2 {
        1.0
    } else if r.abs() >= 1.0 {
        0.0
    } else {
        let df = (n - 2) as f64;
        let t = r * (df / (1.0 - r * r)).sqrt();
        two_sided_p(t, df)?
    };

    Some(Correlation { r, p_value, n })
}

/// Ordinary least squares of `y` on an intercept plus `regressors`.
/// Each regressor is `(name, column)`; all columns must match `y` in length.
pub fn ols(y: &[f64], regressors: &[(&str, Vec<f64>)]) -> Option<OlsFit> {
    let n = y.len();
    let p = regressors.len() + 1;
    if n <= p || regressors.iter().any(|(_, col)| col.len() != n) {
        return None;
    }

    let x = DMatrix::from_fn(n, p, |row, col| {
        if col == 0 {
            1.0
        } else {
            regressors[col - 1].1[row]
        }
    });
    let yv = DVector::from_column_slice(y);

    let xt = x.transpose();
    let xtx_inv = (&xt * &x).try_inverse()?;
    let beta = &xtx_inv * &xt * &yv;

    let resid = &yv - &x * &beta;
    let rss = resid.norm_squared();
    let y_mean = yv.mean();
    let tss: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let df_resid = n - p;
    let sigma2 = rss / df_resid as f64;

    let names = std::iter::once("Intercept").chain(regressors.iter().map(|(name, _)| *name));
    let coefficients = names
        .enumerate()
        .map(|(i, name)| {
            let estimate = beta[i];
            let std_err = (sigma2 * xtx_inv[(i, i)]).max(0.0).sqrt();
            let t = if std_err > 0.0 { estimate / std_err } else { f64::NAN };
            let p_value = if t.is_finite() {
                two_sided_p(t, df_resid as f64).unwrap_or(f64::NAN)
            } else {
                f64::NAN
            };
            Coefficient {
                name: name.to_string(),
                estimate,
                std_err,
                t,
                p_value,
            }
        })
        .collect();

    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };

    Some(OlsFit {
        coefficients,
        r_squared,
        n,
        df_resid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn welch_matches_hand_computation() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        let t = welch_t_test(&a, &b).unwrap();
        // means 2.5 / 5.0, variances 5/3 and 20/3
        let se = ((5.0 / 3.0) / 4.0 + (20.0 / 3.0) / 4.0_f64).sqrt();
        assert!(close(t.statistic, -2.5 / se, 1e-12));
        assert!(t.p_value > 0.0 && t.p_value < 1.0);
    }

    #[test]
    fn welch_needs_two_per_group() {
        assert!(welch_t_test(&[1.0], &[2.0, 3.0]).is_none());
        assert!(welch_t_test(&[1.0, 1.0], &[2.0, 2.0]).is_none());
    }

    #[test]
    fn one_sample_symmetric_data_is_not_significant() {
        let t = one_sample_t_test(&[-2.0, -1.0, 1.0, 2.0], 0.0).unwrap();
        assert!(close(t.statistic, 0.0, 1e-12));
        assert!(close(t.p_value, 1.0, 1e-9));
        assert_eq!(t.df, 3.0);
    }

    #[test]
    fn pearson_detects_linear_relation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.1, 3.9, 6.2, 7.8, 10.1];
        let c = pearson(&x, &y).unwrap();
        assert!(c.r > 0.99);
        assert!(c.p_value < 0.01);
    }

    #[test]
    fn pearson_rejects_constant_or_tiny_samples() {
        assert!(pearson(&[1.0], &[1.0]).is_none());
        assert!(pearson(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).is_none());
        assert_eq!(pearson(&[1.0, 2.0], &[3.0, 1.0]).unwrap().p_value, 1.0);
    }

    #[test]
    fn ols_recovers_exact_coefficients() {
        let x1: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..10).map(|i| ((i * 7) % 5) as f64).collect();
        let y: Vec<f64> = x1
            .iter()
            .zip(&x2)
            .enumerate()
            .map(|(i, (a, b))| 1.0 + 2.0 * a - 0.5 * b + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();
        let fit = ols(&y, &[("x1", x1), ("x2", x2)]).unwrap();
        assert_eq!(fit.coefficients[0].name, "Intercept");
        assert!(close(fit.coefficients[1].estimate, 2.0, 0.01));
        assert!(close(fit.coefficients[2].estimate, -0.5, 0.01));
        assert!(fit.r_squared > 0.999);
        assert_eq!(fit.df_resid, 7);
    }

    #[test]
    fn ols_rejects_singular_design() {
        let x: Vec<f64> = vec![1.0; 6];
        let y: Vec<f64> = (0..6).map(|i| i as f64).collect();
        assert!(ols(&y, &[("const", x)]).is_none());
    }
}
