//! Gordon Growth terminal value

use super::discount::DiscountCurve;
use crate::error::{Result, ValuationError};

/// Perpetuity value at the end of the forecast horizon
///
/// `final_fcf * (1 + g) / (wacc - g)`. Fails unless `wacc > g`.
pub fn terminal_value(final_fcf: f64, terminal_growth: f64, wacc: f64) -> Result<f64> {
    if wacc.is_nan() || terminal_growth.is_nan() || wacc <= terminal_growth {
        return Err(ValuationError::NonConvergentTerminalValue {
            terminal_growth,
            wacc,
        });
    }

    Ok(final_fcf * (1.0 + terminal_growth) / (wacc - terminal_growth))
}

/// Terminal value discounted back `forecast_years` at `wacc`
pub fn terminal_value_pv(terminal_value: f64, wacc: f64, forecast_years: usize) -> f64 {
    terminal_value * DiscountCurve::new(wacc).factor(forecast_years)
}
