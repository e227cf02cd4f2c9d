//! Free cash flow projection and per-year output rows

use crate::assumptions::RateSchedule;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Compound `base` forward by one rate per year
///
/// `out[0] = base * (1 + rates[0])`, `out[i] = out[i-1] * (1 + rates[i])`.
/// Negative or shrinking values are kept as-is.
pub fn project(base: f64, rates: &[f64]) -> Vec<f64> {
    rates
        .iter()
        .scan(base, |value, rate| {
            *value *= 1.0 + rate;
            Some(*value)
        })
        .collect()
}

/// Project `years` values from a rate schedule
pub fn project_schedule(base: f64, schedule: &RateSchedule, years: usize) -> Result<Vec<f64>> {
    let rates = schedule.rates(years)?;
    Ok(project(base, &rates))
}

/// One forecast year of a DCF projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Forecast year (1-indexed)
    pub year: usize,
    pub growth_rate: f64,
    pub free_cash_flow: f64,
    pub discount_factor: f64,
    pub present_value: f64,
}
