//! Valuation Engine - discounted cash flow and dividend discount valuation
//!
//! This library provides:
//! - Cost of capital (CAPM cost of equity, after-tax cost of debt, WACC)
//! - Free cash flow projection from history or from operating assumptions
//! - Gordon Growth terminal value and DCF fair value per share
//! - Dividend discount valuation with applicability checks
//! - Buy/hold/sell recommendations with strengths and risks
//! - Scenario comparison, sensitivity grids, and batch valuation

pub mod error;
pub mod profile;
pub mod assumptions;
pub mod valuation;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoadError, ValuationError};
pub use profile::FinancialProfile;
pub use assumptions::{EquityPremium, GrowthSource, MarketAssumptions, OperatingAssumptions, RateSchedule, Scenario};
pub use valuation::{DcfResult, DdmResult, Rating, Recommendation, ValuationConfig, ValuationEngine, ValuationReport};
pub use scenario::ScenarioRunner;
