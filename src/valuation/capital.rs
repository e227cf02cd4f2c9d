//! Cost of capital: CAPM cost of equity, after-tax cost of debt, and WACC

use crate::assumptions::MarketAssumptions;
use crate::error::{Result, ValuationError};
use crate::profile::FinancialProfile;
use serde::{Deserialize, Serialize};

/// CAPM: risk-free rate plus beta times the market risk premium
pub fn cost_of_equity(risk_free_rate: f64, beta: f64, market_risk_premium: f64) -> f64 {
    risk_free_rate + beta * market_risk_premium
}

/// Blended cost of capital and its components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapital {
    pub cost_of_equity: f64,
    /// After-tax cost of debt
    pub cost_of_debt: f64,
    pub equity_weight: f64,
    pub debt_weight: f64,
    pub wacc: f64,
}

impl CostOfCapital {
    /// Compute WACC from capital structure data
    ///
    /// With no debt the cost of debt and its weight are both zero. Negative
    /// debt is rejected along with non-positive total capital.
    pub fn calculate(
        beta: f64,
        risk_free_rate: f64,
        market_risk_premium: f64,
        total_debt: f64,
        interest_expense: f64,
        market_cap: f64,
        tax_rate: f64,
    ) -> Result<Self> {
        let total_capital = market_cap + total_debt;
        if total_capital.is_nan() || total_capital <= 0.0 || total_debt < 0.0 {
            return Err(ValuationError::InvalidCapitalStructure {
                market_cap,
                total_debt,
            });
        }

        let cost_of_equity = cost_of_equity(risk_free_rate, beta, market_risk_premium);
        let cost_of_debt = if total_debt > 0.0 {
            (interest_expense / total_debt) * (1.0 - tax_rate)
        } else {
            0.0
        };

        let equity_weight = market_cap / total_capital;
        let debt_weight = 1.0 - equity_weight;
        let wacc = equity_weight * cost_of_equity + debt_weight * cost_of_debt;

        Ok(Self {
            cost_of_equity,
            cost_of_debt,
            equity_weight,
            debt_weight,
            wacc,
        })
    }

    /// Cost of capital for a profile under the given market assumptions
    pub fn for_profile(profile: &FinancialProfile, assumptions: &MarketAssumptions) -> Result<Self> {
        let tax_rate = assumptions.effective_tax_rate(profile)?;
        let result = Self::calculate(
            profile.beta,
            assumptions.risk_free_rate,
            assumptions.market_risk_premium(),
            profile.total_debt,
            profile.interest_expense,
            profile.market_capitalization,
            tax_rate,
        )?;

        log::debug!(
            "{}: cost of equity {:.4}, cost of debt {:.4}, wacc {:.4}",
            profile.ticker,
            result.cost_of_equity,
            result.cost_of_debt,
            result.wacc
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_debt_wacc_equals_cost_of_equity() {
        // beta 1.2, rf 4%, market 9% => ke = 0.04 + 1.2 * 0.05 = 0.10
        let coc = CostOfCapital::calculate(1.2, 0.04, 0.09 - 0.04, 0.0, 0.0, 1_000.0, 0.21).unwrap();

        assert_relative_eq!(coc.cost_of_equity, 0.10, epsilon = 1e-12);
        assert_eq!(coc.cost_of_debt, 0.0);
        assert_eq!(coc.debt_weight, 0.0);
        assert_relative_eq!(coc.wacc, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_levered_wacc() {
        // 75/25 split, ke = 10%, kd = 6% * (1 - 25%) = 4.5%
        let coc = CostOfCapital::calculate(1.2, 0.04, 0.05, 250.0, 15.0, 750.0, 0.25).unwrap();

        assert_relative_eq!(coc.cost_of_debt, 0.045, epsilon = 1e-12);
        assert_relative_eq!(coc.equity_weight, 0.75, epsilon = 1e-12);
        assert_relative_eq!(coc.debt_weight, 0.25, epsilon = 1e-12);
        assert_relative_eq!(coc.wacc, 0.75 * 0.10 + 0.25 * 0.045, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_capital_structure() {
        let err = CostOfCapital::calculate(1.0, 0.04, 0.05, 0.0, 0.0, 0.0, 0.21).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidCapitalStructure { .. }));

        let err = CostOfCapital::calculate(1.0, 0.04, 0.05, 100.0, 5.0, -200.0, 0.21).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidCapitalStructure { .. }));
    }

    #[test]
    fn test_negative_debt_rejected() {
        // Total capital is still positive, but a negative debt weight would push WACC above ke
        let err = CostOfCapital::calculate(1.0, 0.04, 0.05, -100.0, 5.0, 1_000.0, 0.21).unwrap_err();
        assert_eq!(
            err,
            ValuationError::InvalidCapitalStructure {
                market_cap: 1_000.0,
                total_debt: -100.0,
            }
        );
    }

    #[test]
    fn test_for_profile_uses_assumptions() {
        let profile = FinancialProfile {
            beta: 1.2,
            market_capitalization: 5_000.0,
            tax_rate: 0.21,
            ..FinancialProfile::new("ACME")
        };
        let coc = CostOfCapital::for_profile(&profile, &MarketAssumptions::default()).unwrap();
        assert_relative_eq!(coc.wacc, 0.10, epsilon = 1e-12);
    }
}
