//! Valuation engine: cost of capital, cash flow projection, DCF, DDM, and recommendations
//!
//! Every routine here is a pure function of its inputs. Data flows one way:
//! historical series and market assumptions -> growth and cost of capital ->
//! projection and terminal value -> DCF / DDM -> recommendation.

mod growth;
mod capital;
mod discount;
mod cashflows;
mod terminal;
mod dcf;
mod ddm;
mod implied;
mod recommendation;
mod engine;

pub use growth::average_growth_rate;
pub use capital::{cost_of_equity, CostOfCapital};
pub use discount::DiscountCurve;
pub use cashflows::{project, project_schedule, ProjectionRow};
pub use terminal::{terminal_value, terminal_value_pv};
pub use dcf::{
    discount_projection, equity_per_share, upside, DcfEngine, DcfResult, DiscountedCashFlows,
    ProjectedCashFlows,
};
pub use ddm::{value_dividends, DdmResult, NotApplicableReason, MIN_DIVIDEND_HISTORY};
pub use implied::implied_discount_rate;
pub use recommendation::{Rating, Recommendation, BUY_THRESHOLD, HOLD_THRESHOLD, STRONG_BUY_THRESHOLD};
pub use engine::{ValuationConfig, ValuationEngine, ValuationReport};
