//! Growth strategies for free cash flow projection

use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};

/// Default share of NOPAT converted to free cash flow
pub const DEFAULT_FCF_CONVERSION: f64 = 0.85;

fn default_fcf_conversion() -> f64 {
    DEFAULT_FCF_CONVERSION
}

/// A rate applied to every forecast year, or one rate per year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateSchedule {
    Uniform(f64),
    PerYear(Vec<f64>),
}

impl RateSchedule {
    /// Expand to exactly `years` rates
    ///
    /// A single-entry per-year schedule is treated as uniform.
    pub fn rates(&self, years: usize) -> Result<Vec<f64>> {
        let rates = match self {
            RateSchedule::Uniform(rate) => vec![*rate; years],
            RateSchedule::PerYear(rates) if rates.len() == 1 => vec![rates[0]; years],
            RateSchedule::PerYear(rates) if rates.len() == years => rates.clone(),
            RateSchedule::PerYear(rates) => {
                return Err(ValuationError::RateScheduleLength {
                    expected: years,
                    actual: rates.len(),
                })
            }
        };

        if let Some(&bad) = rates.iter().find(|r| !r.is_finite()) {
            return Err(ValuationError::invalid_assumption("rate_schedule", bad));
        }

        Ok(rates)
    }
}

impl From<f64> for RateSchedule {
    fn from(rate: f64) -> Self {
        RateSchedule::Uniform(rate)
    }
}

impl From<Vec<f64>> for RateSchedule {
    fn from(rates: Vec<f64>) -> Self {
        RateSchedule::PerYear(rates)
    }
}

/// Analyst operating assumptions for the revenue-driven projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingAssumptions {
    pub revenue_growth: RateSchedule,
    pub operating_margin: RateSchedule,

    /// Share of NOPAT that becomes free cash flow
    #[serde(default = "default_fcf_conversion")]
    pub fcf_conversion: f64,
}

impl OperatingAssumptions {
    pub fn new(revenue_growth: impl Into<RateSchedule>, operating_margin: impl Into<RateSchedule>) -> Self {
        Self {
            revenue_growth: revenue_growth.into(),
            operating_margin: operating_margin.into(),
            fcf_conversion: DEFAULT_FCF_CONVERSION,
        }
    }
}

/// Where projected free cash flow growth comes from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GrowthSource {
    /// Grow the latest free cash flow at its historical average growth rate
    #[default]
    FromHistory,
    /// Project revenue forward and derive free cash flow from margins
    FromAssumptions(OperatingAssumptions),
}
