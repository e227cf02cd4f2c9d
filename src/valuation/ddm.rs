//! Dividend discount model (Gordon Growth)

use super::dcf::upside_or_none;
use super::growth::average_growth_rate;
use crate::profile::FinancialProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum dividend history for a growth estimate worth valuing
pub const MIN_DIVIDEND_HISTORY: usize = 3;

/// Why the dividend discount model does not apply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotApplicableReason {
    /// Empty or all-zero dividend series
    NoDividends,
    /// Fewer than three years of dividends
    InsufficientHistory { available: usize },
    /// Perpetuity diverges when growth >= cost of equity
    GrowthExceedsCostOfEquity { growth: f64, cost_of_equity: f64 },
}

impl fmt::Display for NotApplicableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotApplicableReason::NoDividends => write!(f, "company pays no dividends"),
            NotApplicableReason::InsufficientHistory { available } => write!(
                f,
                "dividend history too short ({} of {} years)",
                available, MIN_DIVIDEND_HISTORY
            ),
            NotApplicableReason::GrowthExceedsCostOfEquity { .. } => {
                write!(f, "growth exceeds cost of equity")
            }
        }
    }
}

/// Output of a dividend discount valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DdmResult {
    pub applicable: bool,
    /// Present iff not applicable
    pub reason: Option<NotApplicableReason>,
    pub average_dividend_growth: Option<f64>,
    pub next_year_dividend: Option<f64>,
    pub intrinsic_value: Option<f64>,
    pub current_price: f64,
    pub upside: Option<f64>,
}

impl DdmResult {
    fn not_applicable(
        ticker: &str,
        reason: NotApplicableReason,
        growth: Option<f64>,
        current_price: f64,
    ) -> Self {
        log::warn!("{}: DDM not applicable: {}", ticker, reason);
        Self {
            applicable: false,
            reason: Some(reason),
            average_dividend_growth: growth,
            next_year_dividend: None,
            intrinsic_value: None,
            current_price,
            upside: None,
        }
    }
}

/// Value a dividend payer with the Gordon Growth Model at the given cost of equity
pub fn value_dividends(profile: &FinancialProfile, cost_of_equity: f64) -> DdmResult {
    let dividends = &profile.dividends_per_share;
    let current_price = profile.current_price_per_share;
    let ticker = profile.ticker.as_str();

    let latest = match profile.latest_dividend() {
        Some(latest) if !profile.pays_no_dividends() => latest,
        _ => return DdmResult::not_applicable(ticker, NotApplicableReason::NoDividends, None, current_price),
    };
    if dividends.len() < MIN_DIVIDEND_HISTORY {
        return DdmResult::not_applicable(
            ticker,
            NotApplicableReason::InsufficientHistory {
                available: dividends.len(),
            },
            None,
            current_price,
        );
    }

    let growth = average_growth_rate(dividends);
    if growth >= cost_of_equity {
        return DdmResult::not_applicable(
            ticker,
            NotApplicableReason::GrowthExceedsCostOfEquity {
                growth,
                cost_of_equity,
            },
            Some(growth),
            current_price,
        );
    }

    let next_year_dividend = latest * (1.0 + growth);
    let intrinsic_value = next_year_dividend / (cost_of_equity - growth);

    log::info!(
        "{}: DDM value {:.2} (dividend growth {:.4}, cost of equity {:.4})",
        ticker,
        intrinsic_value,
        growth,
        cost_of_equity
    );

    DdmResult {
        applicable: true,
        reason: None,
        average_dividend_growth: Some(growth),
        next_year_dividend: Some(next_year_dividend),
        intrinsic_value: Some(intrinsic_value),
        current_price,
        upside: upside_or_none(ticker, intrinsic_value, current_price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dividend_profile(dividends: Vec<f64>) -> FinancialProfile {
        FinancialProfile {
            dividends_per_share: dividends,
            current_price_per_share: 40.0,
            ..FinancialProfile::new("DIV")
        }
    }

    #[test]
    fn test_no_dividends() {
        let result = value_dividends(&dividend_profile(vec![0.0; 5]), 0.10);
        assert!(!result.applicable);
        assert_eq!(result.reason, Some(NotApplicableReason::NoDividends));
        assert_eq!(result.intrinsic_value, None);

        let empty = value_dividends(&dividend_profile(vec![]), 0.10);
        assert!(!empty.applicable);
    }

    #[test]
    fn test_short_history() {
        let result = value_dividends(&dividend_profile(vec![1.0, 1.1]), 0.10);
        assert!(!result.applicable);
        assert_eq!(
            result.reason,
            Some(NotApplicableReason::InsufficientHistory { available: 2 })
        );
    }

    #[test]
    fn test_growing_dividends() {
        let dividends = vec![2.10, 2.20, 2.30, 2.40, 2.50];
        let result = value_dividends(&dividend_profile(dividends.clone()), 0.10);

        assert!(result.applicable);
        assert_eq!(result.reason, None);

        let growth = result.average_dividend_growth.unwrap();
        assert!(growth > 0.0);
        assert_relative_eq!(growth, average_growth_rate(&dividends), epsilon = 1e-15);

        let next = result.next_year_dividend.unwrap();
        assert_relative_eq!(next, 2.50 * (1.0 + growth), epsilon = 1e-12);
        assert_relative_eq!(
            result.intrinsic_value.unwrap(),
            next / (0.10 - growth),
            epsilon = 1e-9
        );

        let expected_upside = (result.intrinsic_value.unwrap() - 40.0) / 40.0;
        assert_relative_eq!(result.upside.unwrap(), expected_upside, epsilon = 1e-12);
    }

    #[test]
    fn test_declining_dividends_still_valued() {
        let result = value_dividends(&dividend_profile(vec![2.50, 2.40, 2.30, 2.20, 2.10]), 0.10);
        assert!(result.applicable);
        assert!(result.average_dividend_growth.unwrap() < 0.0);
        assert!(result.intrinsic_value.unwrap() > 0.0);
    }

    #[test]
    fn test_growth_exceeds_cost_of_equity() {
        // 20% dividend growth against an 8% cost of equity
        let result = value_dividends(&dividend_profile(vec![1.0, 1.2, 1.44]), 0.08);

        assert!(!result.applicable);
        assert!(matches!(
            result.reason,
            Some(NotApplicableReason::GrowthExceedsCostOfEquity { .. })
        ));
        assert_eq!(result.reason.unwrap().to_string(), "growth exceeds cost of equity");
        assert!(result.average_dividend_growth.is_some());
        assert_eq!(result.upside, None);
    }
}
