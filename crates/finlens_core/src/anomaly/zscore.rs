//! Population z-score outlier test

use crate::stats::mean_std;

/// Population z-scores of `values`.
///
/// Returns `None` when the standard deviation is zero (or the slice is
/// empty): every z-score would be undefined, and the caller treats that as
/// "nothing anomalous" rather than propagating NaN.
pub fn zscores(values: &[f64]) -> Option<Vec<f64>> {
    let (mean, std) = mean_std(values)?;
    if std == 0.0 || !std.is_finite() {
        return None;
    }
    Some(values.iter().map(|v| (v - mean) / std).collect())
}

/// Flag every value whose absolute z-score exceeds `threshold`.
pub fn flag(scores: Option<&[f64]>, len: usize, threshold: f64) -> Vec<bool> {
    match scores {
        Some(scores) => scores.iter().map(|z| z.abs() > threshold).collect(),
        None => vec![false; len],
    }
}
