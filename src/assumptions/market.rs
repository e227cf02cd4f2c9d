//! Market assumptions supplied by the analyst or dashboard defaults

use crate::error::{Result, ValuationError};
use crate::profile::FinancialProfile;
use serde::{Deserialize, Serialize};

/// How the equity risk premium is specified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EquityPremium {
    /// Expected market return; premium = market return - risk-free rate
    MarketReturn(f64),
    /// Market risk premium given directly
    RiskPremium(f64),
}

impl EquityPremium {
    /// Market risk premium over the given risk-free rate
    pub fn risk_premium(&self, risk_free_rate: f64) -> f64 {
        match *self {
            EquityPremium::MarketReturn(market_return) => market_return - risk_free_rate,
            EquityPremium::RiskPremium(premium) => premium,
        }
    }

    /// Same form with the premium moved by `delta`
    pub fn shifted(&self, delta: f64) -> Self {
        match *self {
            EquityPremium::MarketReturn(r) => EquityPremium::MarketReturn(r + delta),
            EquityPremium::RiskPremium(p) => EquityPremium::RiskPremium(p + delta),
        }
    }

    fn value(&self) -> f64 {
        match *self {
            EquityPremium::MarketReturn(v) | EquityPremium::RiskPremium(v) => v,
        }
    }
}

/// Market-level inputs to a valuation, as decimal fractions (0.04 = 4%)
///
/// Fields missing from JSON input fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketAssumptions {
    pub risk_free_rate: f64,
    pub equity_premium: EquityPremium,
    pub terminal_growth_rate: f64,

    /// Overrides the profile's tax rate when set
    pub tax_rate: Option<f64>,

    /// Explicit forecast horizon in years
    pub forecast_years: usize,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.04,
            equity_premium: EquityPremium::MarketReturn(0.09),
            terminal_growth_rate: 0.025,
            tax_rate: None,
            forecast_years: 5,
        }
    }
}

impl MarketAssumptions {
    /// Reject assumptions no valuation can be run with
    pub fn validate(&self) -> Result<()> {
        if self.forecast_years == 0 {
            return Err(ValuationError::invalid_assumption("forecast_years", 0.0));
        }

        let rates = [
            ("risk_free_rate", self.risk_free_rate),
            ("equity_premium", self.equity_premium.value()),
            ("terminal_growth_rate", self.terminal_growth_rate),
        ];
        for (name, value) in rates {
            if !value.is_finite() {
                return Err(ValuationError::invalid_assumption(name, value));
            }
        }

        if let Some(tax) = self.tax_rate {
            check_tax_rate(tax)?;
        }

        Ok(())
    }

    /// Tax rate to use for a profile: the override if present, else the profile's own
    pub fn effective_tax_rate(&self, profile: &FinancialProfile) -> Result<f64> {
        let tax = self.tax_rate.unwrap_or(profile.tax_rate);
        check_tax_rate(tax)?;
        Ok(tax)
    }

    pub fn market_risk_premium(&self) -> f64 {
        self.equity_premium.risk_premium(self.risk_free_rate)
    }
}

fn check_tax_rate(tax: f64) -> Result<()> {
    if (0.0..=1.0).contains(&tax) {
        Ok(())
    } else {
        Err(ValuationError::invalid_assumption("tax_rate", tax))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_assumptions() {
        let a = MarketAssumptions::default();
        assert!(a.validate().is_ok());
        assert!((a.market_risk_premium() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_risk_premium_given_directly() {
        let a = MarketAssumptions {
            equity_premium: EquityPremium::RiskPremium(0.055),
            ..Default::default()
        };
        assert!((a.market_risk_premium() - 0.055).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_inputs() {
        let zero_years = MarketAssumptions {
            forecast_years: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_years.validate(),
            Err(ValuationError::InvalidAssumption { name: "forecast_years", .. })
        ));

        let bad_tax = MarketAssumptions {
            tax_rate: Some(1.5),
            ..Default::default()
        };
        assert!(bad_tax.validate().is_err());

        let nan_rate = MarketAssumptions {
            risk_free_rate: f64::NAN,
            ..Default::default()
        };
        assert!(nan_rate.validate().is_err());
    }

    #[test]
    fn test_effective_tax_rate() {
        let profile = FinancialProfile {
            tax_rate: 0.25,
            ..FinancialProfile::new("ACME")
        };

        let inherit = MarketAssumptions::default();
        assert_eq!(inherit.effective_tax_rate(&profile).unwrap(), 0.25);

        let override_tax = MarketAssumptions {
            tax_rate: Some(0.21),
            ..Default::default()
        };
        assert_eq!(override_tax.effective_tax_rate(&profile).unwrap(), 0.21);
    }

    #[test]
    fn test_shifted_premium() {
        let p = EquityPremium::MarketReturn(0.09).shifted(0.01);
        assert!((p.risk_premium(0.04) - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_serde_roundtrip_shape() {
        let json = r#"{
            "risk_free_rate": 0.04,
            "equity_premium": { "kind": "risk_premium", "value": 0.05 },
            "terminal_growth_rate": 0.02,
            "forecast_years": 10
        }"#;
        let a: MarketAssumptions = serde_json::from_str(json).unwrap();
        assert_eq!(a.equity_premium, EquityPremium::RiskPremium(0.05));
        assert_eq!(a.tax_rate, None);
        assert_eq!(a.forecast_years, 10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let a: MarketAssumptions = serde_json::from_str(r#"{ "risk_free_rate": 0.05 }"#).unwrap();
        assert_eq!(a.risk_free_rate, 0.05);
        assert_eq!(a.equity_premium, EquityPremium::MarketReturn(0.09));
        assert_eq!(a.forecast_years, 5);
    }
}
