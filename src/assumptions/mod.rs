//! Valuation assumptions: market inputs, growth strategies, and scenarios

mod market;
mod operating;
mod scenarios;

pub use market::{EquityPremium, MarketAssumptions};
pub use operating::{GrowthSource, OperatingAssumptions, RateSchedule, DEFAULT_FCF_CONVERSION};
pub use scenarios::{load_scenarios, load_scenarios_from_reader, Scenario};
