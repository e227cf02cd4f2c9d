//! Full analysis for one company: DCF, DDM, implied rate, recommendation

use super::capital::CostOfCapital;
use super::dcf::{DcfEngine, DcfResult};
use super::ddm::{value_dividends, DdmResult};
use super::implied::implied_discount_rate;
use super::recommendation::Recommendation;
use crate::assumptions::{GrowthSource, MarketAssumptions};
use crate::error::Result;
use crate::profile::FinancialProfile;
use serde::{Deserialize, Serialize};

/// Configuration for a valuation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Free cash flow growth strategy
    #[serde(default)]
    pub growth_source: GrowthSource,
}

/// Everything produced by one valuation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub ticker: String,
    pub dcf: DcfResult,
    pub ddm: DdmResult,
    /// Discount rate at which the DCF reproduces the current price
    pub implied_discount_rate: Option<f64>,
    /// `None` when the current price is unknown and no upside can be computed
    pub recommendation: Option<Recommendation>,
}

/// Main valuation engine
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    dcf: DcfEngine,
}

impl ValuationEngine {
    /// Create a new valuation engine with given assumptions and config
    pub fn new(assumptions: MarketAssumptions, config: ValuationConfig) -> Self {
        Self {
            dcf: DcfEngine::new(assumptions, config.growth_source),
        }
    }

    pub fn assumptions(&self) -> &MarketAssumptions {
        self.dcf.assumptions()
    }

    pub fn dcf_engine(&self) -> &DcfEngine {
        &self.dcf
    }

    /// Run the full analysis for a single profile
    pub fn value(&self, profile: &FinancialProfile) -> Result<ValuationReport> {
        let assumptions = self.assumptions();
        assumptions.validate()?;

        let capital = CostOfCapital::for_profile(profile, assumptions)?;
        let projected = self.dcf.project(profile)?;
        let dcf = self.dcf.value_projection(profile, &projected, &capital)?;
        let ddm = value_dividends(profile, capital.cost_of_equity);

        let implied = implied_discount_rate(
            &projected.free_cash_flows,
            assumptions.terminal_growth_rate,
            profile.total_debt,
            profile.shares_outstanding,
            profile.current_price_per_share,
        );

        let recommendation = match Recommendation::synthesize(&dcf, &ddm, assumptions.terminal_growth_rate) {
            Ok(rec) => Some(rec),
            Err(e) => {
                log::warn!("{}: no recommendation ({})", profile.ticker, e);
                None
            }
        };

        Ok(ValuationReport {
            ticker: profile.ticker.clone(),
            dcf,
            ddm,
            implied_discount_rate: implied,
            recommendation,
        })
    }
}
