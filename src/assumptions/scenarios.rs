//! Named assumption sets for scenario comparison

use super::MarketAssumptions;
use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Terminal growth shift between the base case and the bull/bear cases
const TERMINAL_GROWTH_SHIFT: f64 = 0.005;

/// Equity premium shift between the base case and the bull/bear cases
const EQUITY_PREMIUM_SHIFT: f64 = 0.01;

/// A named set of market assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub assumptions: MarketAssumptions,
}

impl Scenario {
    pub fn new(name: impl Into<String>, assumptions: MarketAssumptions) -> Self {
        Self {
            name: name.into(),
            assumptions,
        }
    }

    /// Bear / base / bull cases around a base set of assumptions
    ///
    /// Bear: lower terminal growth, higher equity premium.
    /// Bull: higher terminal growth, lower equity premium.
    pub fn standard_set(base: &MarketAssumptions) -> Vec<Scenario> {
        let bear = MarketAssumptions {
            terminal_growth_rate: base.terminal_growth_rate - TERMINAL_GROWTH_SHIFT,
            equity_premium: base.equity_premium.shifted(EQUITY_PREMIUM_SHIFT),
            ..base.clone()
        };
        let bull = MarketAssumptions {
            terminal_growth_rate: base.terminal_growth_rate + TERMINAL_GROWTH_SHIFT,
            equity_premium: base.equity_premium.shifted(-EQUITY_PREMIUM_SHIFT),
            ..base.clone()
        };

        vec![
            Scenario::new("bear", bear),
            Scenario::new("base", base.clone()),
            Scenario::new("bull", bull),
        ]
    }
}

/// Load a JSON array of scenarios
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, LoadError> {
    let file = File::open(path)?;
    load_scenarios_from_reader(file)
}

pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Scenario>, LoadError> {
    let scenarios: Vec<Scenario> = serde_json::from_reader(reader)?;
    if scenarios.is_empty() {
        return Err(LoadError::EmptyInput);
    }
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_ordering() {
        let base = MarketAssumptions::default();
        let set = Scenario::standard_set(&base);

        let names: Vec<_> = set.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["bear", "base", "bull"]);

        let bear = &set[0].assumptions;
        let bull = &set[2].assumptions;
        assert!(bear.terminal_growth_rate < base.terminal_growth_rate);
        assert!(bull.terminal_growth_rate > base.terminal_growth_rate);
        assert!(bear.market_risk_premium() > bull.market_risk_premium());
        assert_eq!(set[1].assumptions, base);
    }

    #[test]
    fn test_load_scenarios_from_json() {
        let json = r#"[
            {
                "name": "rates up",
                "assumptions": {
                    "risk_free_rate": 0.05,
                    "equity_premium": { "kind": "market_return", "value": 0.10 },
                    "terminal_growth_rate": 0.02,
                    "forecast_years": 5
                }
            }
        ]"#;

        let scenarios = load_scenarios_from_reader(json.as_bytes()).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "rates up");
        assert_eq!(scenarios[0].assumptions.risk_free_rate, 0.05);
    }

    #[test]
    fn test_empty_scenario_file() {
        let err = load_scenarios_from_reader("[]".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyInput));
    }

    #[test]
    fn test_load_sample_scenarios() {
        let scenarios = load_scenarios("data/scenarios.json").unwrap();
        assert_eq!(scenarios.len(), 2);
        // Omitted fields take the defaults
        assert_eq!(scenarios[0].assumptions.forecast_years, 5);
        assert_eq!(scenarios[1].assumptions.forecast_years, 7);
    }
}
