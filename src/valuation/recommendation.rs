//! Buy/hold/sell classification from DCF and DDM results

use super::dcf::DcfResult;
use super::ddm::DdmResult;
use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upside above which a stock is a strong buy
pub const STRONG_BUY_THRESHOLD: f64 = 0.15;
/// Upside above which a stock is a buy
pub const BUY_THRESHOLD: f64 = 0.05;
/// Upside above which a stock is a hold; at or below is a sell
pub const HOLD_THRESHOLD: f64 = -0.05;

/// Terminal value share of EV beyond which the valuation is flagged
const TERMINAL_CONCENTRATION_LIMIT: f64 = 0.75;
/// Minimum comfortable gap between WACC and terminal growth
const MIN_DISCOUNT_SPREAD: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
}

impl Rating {
    /// Classify an average upside; every threshold is exclusive
    pub fn from_upside(average_upside: f64) -> Self {
        if average_upside > STRONG_BUY_THRESHOLD {
            Rating::StrongBuy
        } else if average_upside > BUY_THRESHOLD {
            Rating::Buy
        } else if average_upside > HOLD_THRESHOLD {
            Rating::Hold
        } else {
            Rating::Sell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::StrongBuy => "Strong Buy",
            Rating::Buy => "Buy",
            Rating::Hold => "Hold",
            Rating::Sell => "Sell",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrative recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rating: Rating,
    pub average_upside: f64,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub summary: String,
}

impl Recommendation {
    /// Combine DCF and DDM upside into a rating plus strengths and risks
    ///
    /// DDM upside is averaged in only when the model applies.
    pub fn synthesize(
        dcf: &DcfResult,
        ddm: &DdmResult,
        terminal_growth_rate: f64,
    ) -> Result<Self> {
        let dcf_upside = dcf
            .upside
            .ok_or(ValuationError::DivisionByZero { quantity: "upside" })?;

        let average_upside = match (ddm.applicable, ddm.upside) {
            (true, Some(ddm_upside)) => (dcf_upside + ddm_upside) / 2.0,
            _ => dcf_upside,
        };
        let rating = Rating::from_upside(average_upside);

        let mut strengths = Vec::new();
        let mut risks = Vec::new();

        if dcf.projected_free_cash_flows.iter().all(|&fcf| fcf > 0.0) {
            strengths.push("Positive free cash flow across the forecast horizon".to_string());
        } else {
            risks.push("Negative projected free cash flow in at least one forecast year".to_string());
        }

        if dcf_upside > STRONG_BUY_THRESHOLD {
            strengths.push(format!(
                "DCF fair value {:.2} is {:.1}% above the current price",
                dcf.price_per_share,
                dcf_upside * 100.0
            ));
        } else if dcf_upside <= HOLD_THRESHOLD {
            risks.push(format!(
                "Current price {:.2} exceeds DCF fair value of {:.2}",
                dcf.current_price, dcf.price_per_share
            ));
        }

        match (ddm.applicable, ddm.reason) {
            (true, _) => strengths.push("Dividend history supports a dividend discount valuation".to_string()),
            (false, Some(reason)) => risks.push(format!("Dividend discount model not applicable: {}", reason)),
            (false, None) => {}
        }

        if let Some(share) = dcf.terminal_value_share() {
            if share > TERMINAL_CONCENTRATION_LIMIT {
                risks.push(format!(
                    "Terminal value is {:.0}% of enterprise value",
                    share * 100.0
                ));
            }
        }

        if dcf.wacc - terminal_growth_rate < MIN_DISCOUNT_SPREAD {
            risks.push(format!(
                "Narrow spread between WACC ({:.2}%) and terminal growth ({:.2}%)",
                dcf.wacc * 100.0,
                terminal_growth_rate * 100.0
            ));
        }

        let summary = format!(
            "{}: {:.1}% upside from {}",
            rating,
            average_upside * 100.0,
            if ddm.applicable { "DCF and DDM" } else { "DCF" },
        );

        Ok(Self {
            rating,
            average_upside,
            strengths,
            risks,
            summary,
        })
    }
}
