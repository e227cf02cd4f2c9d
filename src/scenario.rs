//! Scenario runner for batch valuations
//!
//! Holds one valuation config and runs it across assumption scenarios,
//! across many tickers, or across a discount-rate / terminal-growth grid.
//! Each run is independent, so batches are spread over a rayon pool.

use crate::assumptions::{MarketAssumptions, Scenario};
use crate::error::{Result, ValuationError};
use crate::profile::FinancialProfile;
use crate::valuation::{
    discount_projection, equity_per_share, ValuationConfig, ValuationEngine, ValuationReport,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Result of one run within a batch; failures stay local to their run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name, or ticker for batch runs
    pub name: String,
    pub report: Option<ValuationReport>,
    pub error: Option<String>,
}

impl ScenarioOutcome {
    fn from_result(name: impl Into<String>, result: Result<ValuationReport>) -> Self {
        let name = name.into();
        match result {
            Ok(report) => Self {
                name,
                report: Some(report),
                error: None,
            },
            Err(e) => {
                log::warn!("{}: valuation failed: {}", name, e);
                Self {
                    name,
                    report: None,
                    error: Some(format!("{}: {}", e.kind(), e)),
                }
            }
        }
    }

    pub fn price_per_share(&self) -> Option<f64> {
        self.report.as_ref().map(|r| r.dcf.price_per_share)
    }
}

/// Price per share across discount rates (rows) and terminal growth rates (columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityTable {
    pub discount_rates: Vec<f64>,
    pub terminal_growth_rates: Vec<f64>,
    /// `None` where the terminal value does not converge
    pub prices: Vec<Vec<Option<f64>>>,
}

impl SensitivityTable {
    pub fn get(&self, rate_idx: usize, growth_idx: usize) -> Option<f64> {
        self.prices.get(rate_idx)?.get(growth_idx).copied().flatten()
    }
}

/// Pre-configured runner for scenario, batch, and sensitivity valuations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let scenarios = Scenario::standard_set(&MarketAssumptions::default());
/// for outcome in runner.run_scenarios(&profile, &scenarios) {
///     println!("{}: {:?}", outcome.name, outcome.price_per_share());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ValuationConfig,
}

impl ScenarioRunner {
    /// Create runner with the default config (growth from history)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValuationConfig) -> Self {
        Self { config }
    }

    /// Run a single valuation
    pub fn run(&self, profile: &FinancialProfile, assumptions: &MarketAssumptions) -> Result<ValuationReport> {
        ValuationEngine::new(assumptions.clone(), self.config.clone()).value(profile)
    }

    /// Value many tickers under the same assumptions
    pub fn run_batch(&self, profiles: &[FinancialProfile], assumptions: &MarketAssumptions) -> Vec<ScenarioOutcome> {
        let engine = ValuationEngine::new(assumptions.clone(), self.config.clone());
        profiles
            .par_iter()
            .map(|profile| ScenarioOutcome::from_result(profile.ticker.clone(), engine.value(profile)))
            .collect()
    }

    /// Value one ticker under several scenarios, preserving scenario order
    pub fn run_scenarios(&self, profile: &FinancialProfile, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        scenarios
            .par_iter()
            .map(|scenario| ScenarioOutcome::from_result(scenario.name.clone(), self.run(profile, &scenario.assumptions)))
            .collect()
    }

    /// Price per share over a grid of discount rates and terminal growth rates
    ///
    /// Free cash flow is projected once; only discounting varies per cell.
    pub fn sensitivity(
        &self,
        profile: &FinancialProfile,
        assumptions: &MarketAssumptions,
        discount_rates: &[f64],
        terminal_growth_rates: &[f64],
    ) -> Result<SensitivityTable> {
        assumptions.validate()?;
        let engine = ValuationEngine::new(assumptions.clone(), self.config.clone());
        let projected = engine.dcf_engine().project(profile)?;

        let mut prices = Vec::with_capacity(discount_rates.len());
        for &rate in discount_rates {
            let mut row = Vec::with_capacity(terminal_growth_rates.len());
            for &growth in terminal_growth_rates {
                let cell = match discount_projection(&projected.free_cash_flows, rate, growth) {
                    Ok(discounted) => {
                        let (_, price) = equity_per_share(
                            discounted.enterprise_value,
                            profile.total_debt,
                            profile.shares_outstanding,
                        )?;
                        Some(price)
                    }
                    Err(ValuationError::NonConvergentTerminalValue { .. }) => None,
                    Err(e) => return Err(e),
                };
                row.push(cell);
            }
            prices.push(row);
        }

        Ok(SensitivityTable {
            discount_rates: discount_rates.to_vec(),
            terminal_growth_rates: terminal_growth_rates.to_vec(),
            prices,
        })
    }
}
