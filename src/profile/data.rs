//! Financial profile of a single company
//!
//! Historical series are ordered oldest-first (index 0 = earliest fiscal year).
//! Ingestion normalizes to this order before a profile reaches the engine.

use serde::{Deserialize, Serialize};

/// Historical and current financial state of one company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    /// Ticker symbol
    pub ticker: String,

    /// First fiscal year covered by the historical series, if known
    #[serde(default)]
    pub first_fiscal_year: Option<i32>,

    // Historical series, oldest-first
    #[serde(default)]
    pub revenue: Vec<f64>,
    #[serde(default)]
    pub net_income: Vec<f64>,
    #[serde(default)]
    pub operating_income: Vec<f64>,
    #[serde(default)]
    pub cash_from_operations: Vec<f64>,
    /// Capital expenditure, stored as a negative cash adjustment
    #[serde(default)]
    pub capital_expenditure: Vec<f64>,
    #[serde(default)]
    pub dividends_per_share: Vec<f64>,

    // Snapshot values
    pub beta: f64,
    pub total_debt: f64,
    pub interest_expense: f64,
    pub market_capitalization: f64,
    pub shares_outstanding: f64,
    pub current_price_per_share: f64,

    /// Effective tax rate (0-1)
    pub tax_rate: f64,
}

impl FinancialProfile {
    /// Create an empty profile for a ticker
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    /// Historical free cash flow (operating cash flow + capex)
    ///
    /// Every series ends on the latest fiscal year (the CSV loader rejects
    /// gaps), so when the two differ in length they are aligned at the most
    /// recent year and the older, unmatched entries are dropped.
    pub fn free_cash_flow_history(&self) -> Vec<f64> {
        let n = self.cash_from_operations.len().min(self.capital_expenditure.len());
        let cfo = &self.cash_from_operations[self.cash_from_operations.len() - n..];
        let capex = &self.capital_expenditure[self.capital_expenditure.len() - n..];

        cfo.iter().zip(capex).map(|(c, x)| c + x).collect()
    }

    pub fn latest_revenue(&self) -> Option<f64> {
        self.revenue.last().copied()
    }

    pub fn latest_dividend(&self) -> Option<f64> {
        self.dividends_per_share.last().copied()
    }

    /// True when the dividend series is empty or all zero
    pub fn pays_no_dividends(&self) -> bool {
        self.dividends_per_share.iter().all(|&d| d == 0.0)
    }

    /// Operating margin of the latest fiscal year
    pub fn latest_operating_margin(&self) -> Option<f64> {
        let revenue = *self.revenue.last()?;
        let ebit = *self.operating_income.last()?;
        if revenue == 0.0 {
            None
        } else {
            Some(ebit / revenue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_cash_flow_history_same_length() {
        let profile = FinancialProfile {
            cash_from_operations: vec![100.0, 120.0, 150.0],
            capital_expenditure: vec![-20.0, -25.0, -30.0],
            ..FinancialProfile::new("ACME")
        };

        assert_eq!(profile.free_cash_flow_history(), vec![80.0, 95.0, 120.0]);
    }

    #[test]
    fn test_free_cash_flow_history_tail_aligned() {
        // Capex only reported for the last two years
        let profile = FinancialProfile {
            cash_from_operations: vec![100.0, 120.0, 150.0],
            capital_expenditure: vec![-25.0, -30.0],
            ..FinancialProfile::new("ACME")
        };

        assert_eq!(profile.free_cash_flow_history(), vec![95.0, 120.0]);
    }

    #[test]
    fn test_empty_series() {
        let profile = FinancialProfile::new("EMPTY");
        assert!(profile.free_cash_flow_history().is_empty());
        assert_eq!(profile.latest_revenue(), None);
        assert!(profile.pays_no_dividends());
        assert_eq!(profile.latest_operating_margin(), None);
    }

    #[test]
    fn test_latest_operating_margin() {
        let profile = FinancialProfile {
            revenue: vec![1000.0, 1200.0],
            operating_income: vec![150.0, 240.0],
            ..FinancialProfile::new("ACME")
        };
        assert!((profile.latest_operating_margin().unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_dividend_flags() {
        let payer = FinancialProfile {
            dividends_per_share: vec![0.0, 0.5, 0.6],
            ..FinancialProfile::new("DIV")
        };
        assert!(!payer.pays_no_dividends());
        assert_eq!(payer.latest_dividend(), Some(0.6));

        let non_payer = FinancialProfile {
            dividends_per_share: vec![0.0, 0.0, 0.0],
            ..FinancialProfile::new("GRO")
        };
        assert!(non_payer.pays_no_dividends());
    }
}
