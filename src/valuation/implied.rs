//! Market-implied discount rate (reverse DCF)
//!
//! Solves for the discount rate at which the DCF price per share equals the
//! current market price, holding the projected cash flows and terminal growth fixed.

use super::dcf::{discount_projection, equity_per_share};

/// Smallest admissible gap between the discount rate and terminal growth
const MIN_SPREAD: f64 = 1e-6;
/// Widest discount rate searched, as a spread over terminal growth
const MAX_SPREAD: f64 = 1.0;

/// DCF price per share at a given discount rate, if defined
fn price_at_rate(
    free_cash_flows: &[f64],
    rate: f64,
    terminal_growth: f64,
    total_debt: f64,
    shares_outstanding: f64,
) -> Option<f64> {
    let discounted = discount_projection(free_cash_flows, rate, terminal_growth).ok()?;
    let (_, price) = equity_per_share(discounted.enterprise_value, total_debt, shares_outstanding).ok()?;
    Some(price)
}

/// Discount rate that reprices the projection to `target_price`, using bisection
///
/// # Returns
/// * `Option<f64>` - Annual rate as a decimal, or None if no rate in
///   (terminal growth, terminal growth + 100%] reproduces the price
pub fn implied_discount_rate(
    free_cash_flows: &[f64],
    terminal_growth: f64,
    total_debt: f64,
    shares_outstanding: f64,
    target_price: f64,
) -> Option<f64> {
    if free_cash_flows.is_empty() || !target_price.is_finite() {
        return None;
    }

    let gap = |rate: f64| {
        price_at_rate(free_cash_flows, rate, terminal_growth, total_debt, shares_outstanding)
            .map(|price| price - target_price)
    };

    let mut low = terminal_growth + MIN_SPREAD;
    let mut high = terminal_growth + MAX_SPREAD;
    let tolerance = 1e-10;
    let max_iterations = 1000;

    let mut gap_low = gap(low)?;
    let gap_high = gap(high)?;

    // Check that we have a root in this interval
    if gap_low * gap_high > 0.0 {
        return None;
    }

    for _ in 0..max_iterations {
        let mid = (low + high) / 2.0;
        let gap_mid = gap(mid)?;

        if gap_mid.abs() < tolerance || (high - low) / 2.0 < tolerance {
            return Some(mid);
        }

        if gap_mid * gap_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            gap_low = gap_mid;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_recovers_known_rate() {
        let fcfs = vec![100.0, 105.0, 110.0, 115.0, 120.0];
        let price = price_at_rate(&fcfs, 0.09, 0.025, 200.0, 50.0).unwrap();

        let implied = implied_discount_rate(&fcfs, 0.025, 200.0, 50.0, price).unwrap();
        assert_abs_diff_eq!(implied, 0.09, epsilon = 1e-6);
    }

    #[test]
    fn test_higher_price_means_lower_rate() {
        let fcfs = vec![50.0; 5];
        let cheap = implied_discount_rate(&fcfs, 0.02, 0.0, 10.0, 40.0).unwrap();
        let rich = implied_discount_rate(&fcfs, 0.02, 0.0, 10.0, 80.0).unwrap();
        assert!(rich < cheap);
    }

    #[test]
    fn test_no_root() {
        // Negative cash flows can never justify a positive price
        let fcfs = vec![-10.0; 5];
        assert_eq!(implied_discount_rate(&fcfs, 0.02, 0.0, 10.0, 25.0), None);
        assert_eq!(implied_discount_rate(&[], 0.02, 0.0, 10.0, 25.0), None);
    }
}
