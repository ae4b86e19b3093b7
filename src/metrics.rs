// 📏 Regression Metrics - scoring predictions against held-out targets
// R² follows the usual conventions for constant and tiny samples.

use tracing::warn;

/// Coefficient of determination between true and predicted values.
///
/// A constant `y_true` scores 1.0 when predicted exactly and 0.0 otherwise.
/// Fewer than two samples leave R² undefined and return NaN.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len(), "r2_score: length mismatch");

    if y_true.len() < 2 {
        warn!("R² is not well-defined with fewer than two samples");
        return f64::NAN;
    }

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean) * (t - mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}
