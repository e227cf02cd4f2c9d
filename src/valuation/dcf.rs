//! Discounted cash flow valuation

use super::capital::CostOfCapital;
use super::cashflows::{self, ProjectionRow};
use super::discount::DiscountCurve;
use super::growth::average_growth_rate;
use super::terminal;
use crate::assumptions::{GrowthSource, MarketAssumptions, OperatingAssumptions};
use crate::error::{Result, ValuationError};
use crate::profile::FinancialProfile;
use serde::{Deserialize, Serialize};

/// Fractional difference between fair value and current price
///
/// Fails when the current price is zero or unknown rather than returning infinity.
pub fn upside(fair_value: f64, current_price: f64) -> Result<f64> {
    if current_price == 0.0 || !current_price.is_finite() {
        return Err(ValuationError::DivisionByZero { quantity: "upside" });
    }
    Ok((fair_value - current_price) / current_price)
}

/// Upside as an optional field: `None` when it is undefined
pub(crate) fn upside_or_none(ticker: &str, fair_value: f64, current_price: f64) -> Option<f64> {
    match upside(fair_value, current_price) {
        Ok(u) => Some(u),
        Err(e) => {
            log::warn!("{}: upside undefined ({})", ticker, e);
            None
        }
    }
}

/// Free cash flow forecast before discounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCashFlows {
    /// Growth applied in each year (FCF growth from history, revenue growth from assumptions)
    pub growth_rates: Vec<f64>,
    pub free_cash_flows: Vec<f64>,
}

/// Discounted forecast plus terminal value at one discount rate
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountedCashFlows {
    pub discount_factors: Vec<f64>,
    pub present_values: Vec<f64>,
    pub terminal_value: f64,
    pub terminal_value_pv: f64,
    pub enterprise_value: f64,
}

/// Discount a forecast and add the present value of its terminal value
pub fn discount_projection(
    free_cash_flows: &[f64],
    wacc: f64,
    terminal_growth: f64,
) -> Result<DiscountedCashFlows> {
    let years = free_cash_flows.len();
    let final_fcf = free_cash_flows.last().copied().ok_or(ValuationError::InvalidAssumption {
        name: "forecast_years",
        value: 0.0,
    })?;

    let terminal_value = terminal::terminal_value(final_fcf, terminal_growth, wacc)?;
    let terminal_value_pv = terminal::terminal_value_pv(terminal_value, wacc, years);

    let curve = DiscountCurve::new(wacc);
    let present_values = curve.present_values(free_cash_flows);
    let enterprise_value = present_values.iter().sum::<f64>() + terminal_value_pv;

    Ok(DiscountedCashFlows {
        discount_factors: curve.factors(years),
        present_values,
        terminal_value,
        terminal_value_pv,
        enterprise_value,
    })
}

/// Equity value (enterprise value less debt) per share
///
/// Debt stands in for net debt; cash is not modeled separately.
pub fn equity_per_share(enterprise_value: f64, total_debt: f64, shares_outstanding: f64) -> Result<(f64, f64)> {
    if shares_outstanding.is_nan() || shares_outstanding <= 0.0 {
        return Err(ValuationError::InvalidShareCount {
            shares: shares_outstanding,
        });
    }
    let equity_value = enterprise_value - total_debt;
    Ok((equity_value, equity_value / shares_outstanding))
}

/// Output of a DCF valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfResult {
    pub wacc: f64,
    pub cost_of_equity: f64,
    pub cost_of_debt: f64,
    pub growth_rates: Vec<f64>,
    pub projected_free_cash_flows: Vec<f64>,
    pub discount_factors: Vec<f64>,
    pub present_values: Vec<f64>,
    pub terminal_value: f64,
    pub terminal_value_pv: f64,
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub price_per_share: f64,
    pub current_price: f64,
    /// `None` when the current price is zero or unknown
    pub upside: Option<f64>,
}

impl DcfResult {
    /// Per-year projection table
    pub fn projection_rows(&self) -> Vec<ProjectionRow> {
        (0..self.projected_free_cash_flows.len())
            .map(|i| ProjectionRow {
                year: i + 1,
                growth_rate: self.growth_rates[i],
                free_cash_flow: self.projected_free_cash_flows[i],
                discount_factor: self.discount_factors[i],
                present_value: self.present_values[i],
            })
            .collect()
    }

    /// Share of enterprise value coming from the terminal value
    pub fn terminal_value_share(&self) -> Option<f64> {
        if self.enterprise_value == 0.0 {
            None
        } else {
            Some(self.terminal_value_pv / self.enterprise_value)
        }
    }
}

/// DCF engine for one set of market assumptions and one growth strategy
#[derive(Debug, Clone)]
pub struct DcfEngine {
    assumptions: MarketAssumptions,
    growth_source: GrowthSource,
}

impl DcfEngine {
    pub fn new(assumptions: MarketAssumptions, growth_source: GrowthSource) -> Self {
        Self {
            assumptions,
            growth_source,
        }
    }

    pub fn assumptions(&self) -> &MarketAssumptions {
        &self.assumptions
    }

    /// Run the full DCF for a profile
    pub fn value(&self, profile: &FinancialProfile) -> Result<DcfResult> {
        self.assumptions.validate()?;

        let capital = CostOfCapital::for_profile(profile, &self.assumptions)?;
        let projected = self.project(profile)?;
        self.value_projection(profile, &projected, &capital)
    }

    /// Discount an existing projection with an already computed cost of capital
    pub fn value_projection(
        &self,
        profile: &FinancialProfile,
        projected: &ProjectedCashFlows,
        capital: &CostOfCapital,
    ) -> Result<DcfResult> {
        let discounted = discount_projection(
            &projected.free_cash_flows,
            capital.wacc,
            self.assumptions.terminal_growth_rate,
        )?;
        let (equity_value, price_per_share) = equity_per_share(
            discounted.enterprise_value,
            profile.total_debt,
            profile.shares_outstanding,
        )?;

        let current_price = profile.current_price_per_share;
        let upside = upside_or_none(&profile.ticker, price_per_share, current_price);

        log::info!(
            "{}: DCF fair value {:.2} vs price {:.2} (wacc {:.4}, EV {:.0})",
            profile.ticker,
            price_per_share,
            current_price,
            capital.wacc,
            discounted.enterprise_value
        );

        Ok(DcfResult {
            wacc: capital.wacc,
            cost_of_equity: capital.cost_of_equity,
            cost_of_debt: capital.cost_of_debt,
            growth_rates: projected.growth_rates.clone(),
            projected_free_cash_flows: projected.free_cash_flows.clone(),
            discount_factors: discounted.discount_factors,
            present_values: discounted.present_values,
            terminal_value: discounted.terminal_value,
            terminal_value_pv: discounted.terminal_value_pv,
            enterprise_value: discounted.enterprise_value,
            equity_value,
            price_per_share,
            current_price,
            upside,
        })
    }

    /// Forecast free cash flow using the configured growth strategy
    pub fn project(&self, profile: &FinancialProfile) -> Result<ProjectedCashFlows> {
        let years = self.assumptions.forecast_years;
        match &self.growth_source {
            GrowthSource::FromHistory => project_from_history(profile, years),
            GrowthSource::FromAssumptions(ops) => {
                let tax_rate = self.assumptions.effective_tax_rate(profile)?;
                project_from_assumptions(profile, ops, tax_rate, years)
            }
        }
    }
}

/// Grow the latest historical FCF at the historical average FCF growth rate
fn project_from_history(profile: &FinancialProfile, years: usize) -> Result<ProjectedCashFlows> {
    let history = profile.free_cash_flow_history();
    let base = match history.last() {
        Some(&base) if history.len() >= 2 => base,
        _ => {
            return Err(ValuationError::InsufficientHistory {
                series: "free_cash_flow",
                required: 2,
                available: history.len(),
            })
        }
    };

    let growth = average_growth_rate(&history);
    log::debug!(
        "{}: base FCF {:.2}, historical FCF growth {:.4}",
        profile.ticker,
        base,
        growth
    );

    let growth_rates = vec![growth; years];
    let free_cash_flows = cashflows::project(base, &growth_rates);
    Ok(ProjectedCashFlows {
        growth_rates,
        free_cash_flows,
    })
}

/// Project revenue, apply margin and tax, and convert NOPAT to FCF
fn project_from_assumptions(
    profile: &FinancialProfile,
    ops: &OperatingAssumptions,
    tax_rate: f64,
    years: usize,
) -> Result<ProjectedCashFlows> {
    if !ops.fcf_conversion.is_finite() {
        return Err(ValuationError::invalid_assumption("fcf_conversion", ops.fcf_conversion));
    }

    let base_revenue = profile
        .latest_revenue()
        .ok_or(ValuationError::InsufficientHistory {
            series: "revenue",
            required: 1,
            available: 0,
        })?;

    let growth_rates = ops.revenue_growth.rates(years)?;
    let margins = ops.operating_margin.rates(years)?;
    let revenue = cashflows::project(base_revenue, &growth_rates);

    let free_cash_flows = revenue
        .iter()
        .zip(&margins)
        .map(|(rev, margin)| {
            let nopat = rev * margin * (1.0 - tax_rate);
            nopat * ops.fcf_conversion
        })
        .collect();

    log::debug!(
        "{}: base revenue {:.2}, FCF conversion {:.2}",
        profile.ticker,
        base_revenue,
        ops.fcf_conversion
    );

    Ok(ProjectedCashFlows {
        growth_rates,
        free_cash_flows,
    })
}
