//! Small descriptive statistics over `f64` samples.
//!
//! All functions return `None` on empty input instead of `NaN`, which
//! lets feature extractors turn "nothing to measure" into a neutral
//! value explicitly.

/// Arithmetic mean.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Median; the mean of the two middle values for even counts.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(f64::midpoint(sorted[mid - 1], sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// Coefficient of variation `std / mean`, `None` when the mean is zero.
#[must_use]
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if m.abs() < f64::EPSILON {
        return None;
    }
    std_dev(values).map(|s| s / m.abs())
}

/// Weighted mean of `(value, weight)` pairs, `None` when the weights
/// sum to zero.
#[must_use]
pub fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
    let total: f64 = pairs.iter().map(|&(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    Some(pairs.iter().map(|&(v, w)| v * w).sum::<f64>() / total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_none() {
        assert!(mean(&[]).is_none());
        assert!(std_dev(&[]).is_none());
        assert!(median(&[]).is_none());
        assert!(coefficient_of_variation(&[]).is_none());
        assert!(weighted_mean(&[]).is_none());
    }

    #[test]
    fn mean_and_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values).unwrap() - 5.0).abs() < 1e-12);
        assert!((std_dev(&values).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn median_odd_and_even() {
        assert!((median(&[3.0, 1.0, 2.0]).unwrap() - 2.0).abs() < 1e-12);
        assert!((median(&[4.0, 1.0, 3.0, 2.0]).unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn cv_of_zero_mean_is_none() {
        assert!(coefficient_of_variation(&[0.0, 0.0]).is_none());
        let cv = coefficient_of_variation(&[9.0, 11.0]).unwrap();
        assert!((cv - 0.1).abs() < 1e-12);
    }

    #[test]
    fn weighted_mean_respects_weights() {
        let m = weighted_mean(&[(10.0, 3.0), (20.0, 1.0)]).unwrap();
        assert!((m - 12.5).abs() < 1e-12);
        assert!(weighted_mean(&[(1.0, 0.0)]).is_none());
    }
}
