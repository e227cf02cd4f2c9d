//! Average growth rate estimation from a historical series

/// Arithmetic mean of period-over-period growth rates of an oldest-first series
///
/// Each adjacent pair contributes `(curr - prev) / |prev|`. Pairs with a zero
/// starting value have no defined growth and are skipped. A series with no
/// usable pairs (fewer than two points, or all starting values zero) yields 0.
pub fn average_growth_rate(series: &[f64]) -> f64 {
    let rates: Vec<f64> = series
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0].abs())
        .collect();

    if rates.is_empty() {
        log::warn!(
            "no growth pairs in series of {} points, using 0% growth",
            series.len()
        );
        return 0.0;
    }

    rates.iter().sum::<f64>() / rates.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_growth() {
        assert_relative_eq!(average_growth_rate(&[100.0, 110.0, 121.0]), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(average_growth_rate(&[100.0]), 0.0);
        assert_eq!(average_growth_rate(&[]), 0.0);
    }

    #[test]
    fn test_zero_previous_skipped() {
        // 0 -> 50 is skipped; 50 -> 75 is +50%
        assert_relative_eq!(average_growth_rate(&[0.0, 50.0, 75.0]), 0.5, epsilon = 1e-12);
        assert_eq!(average_growth_rate(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_negative_base_uses_absolute_value() {
        // -100 -> -50 is an improvement: +50%
        assert_relative_eq!(average_growth_rate(&[-100.0, -50.0]), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_mixed_growth_is_arithmetic_mean() {
        // +20%, then -50%
        assert_relative_eq!(average_growth_rate(&[100.0, 120.0, 60.0]), -0.15, epsilon = 1e-12);
    }
}
