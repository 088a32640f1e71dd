use herald_types::{Trend, TrendDirection};

use crate::config::TrendConfig;

/// Fits an OLS line to `values` taken in chronological order (index as the
/// independent variable) and classifies the direction (spec.md §4.F).
///
/// A flat series (`R²` undefined, zero total variance) is treated as a
/// perfect fit rather than an error — the literal `[2.0; 5]` scenario in
/// spec.md §8 expects `slope = 0`, `confidence >= 0.9`.
pub fn fit(values: &[f64], config: TrendConfig) -> Trend {
    if values.len() < config.min_matches {
        return Trend {
            direction: TrendDirection::InsufficientData,
            slope: 0.0,
            confidence: 0.0,
        };
    }

    let n = values.len() as f64;
    let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, y) in xs.iter().zip(values.iter()) {
        cov += (x - x_mean) * (y - y_mean);
        var_x += (x - x_mean).powi(2);
    }

    let ss_tot: f64 = values.iter().map(|y| (y - y_mean).powi(2)).sum();

    if ss_tot.abs() < f64::EPSILON {
        return Trend {
            direction: TrendDirection::Stable,
            slope: 0.0,
            confidence: 1.0,
        };
    }

    let slope = if var_x.abs() < f64::EPSILON { 0.0 } else { cov / var_x };
    let intercept = y_mean - slope * x_mean;

    let ss_res: f64 = xs
        .iter()
        .zip(values.iter())
        .map(|(x, y)| {
            let predicted = intercept + slope * x;
            (y - predicted).powi(2)
        })
        .sum();

    let r_squared = (1.0 - ss_res / ss_tot).clamp(0.0, 1.0);

    let direction = if slope.abs() < config.epsilon || r_squared < config.confidence_min {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    };

    Trend {
        direction,
        slope,
        confidence: r_squared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_is_stable_with_high_confidence() {
        let trend = fit(&[2.0, 2.0, 2.0, 2.0, 2.0], TrendConfig::default());
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.slope, 0.0);
        assert!(trend.confidence >= 0.9);
    }

    #[test]
    fn strictly_increasing_series_is_improving() {
        let trend = fit(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], TrendConfig::default());
        assert_eq!(trend.direction, TrendDirection::Improving);
        assert!(trend.slope > 0.0);
    }

    #[test]
    fn strictly_decreasing_series_is_declining() {
        let trend = fit(&[6.0, 5.0, 4.0, 3.0, 2.0, 1.0], TrendConfig::default());
        assert_eq!(trend.direction, TrendDirection::Declining);
        assert!(trend.slope < 0.0);
    }

    #[test]
    fn too_few_matches_is_insufficient_data() {
        let trend = fit(&[1.0, 2.0], TrendConfig::default());
        assert_eq!(trend.direction, TrendDirection::InsufficientData);
    }

    #[test]
    fn noisy_series_with_low_r_squared_is_stable() {
        let trend = fit(&[1.0, 5.0, 1.0, 5.0, 1.0, 5.0], TrendConfig::default());
        assert_eq!(trend.direction, TrendDirection::Stable);
    }
}
