//! Annual discounting at a single rate

use serde::{Deserialize, Serialize};

/// Flat annual discount curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountCurve {
    /// Annual discount rate
    pub rate: f64,
}

impl DiscountCurve {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Discount factor to the end of year `years` (1-indexed)
    pub fn factor(&self, years: usize) -> f64 {
        1.0 / (1.0 + self.rate).powi(years as i32)
    }

    /// Discount factors for years 1..=n
    pub fn factors(&self, n: usize) -> Vec<f64> {
        (1..=n).map(|year| self.factor(year)).collect()
    }

    /// Present value of each end-of-year amount; element i is received at year i+1
    pub fn present_values(&self, amounts: &[f64]) -> Vec<f64> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| amount * self.factor(i + 1))
            .collect()
    }
}
