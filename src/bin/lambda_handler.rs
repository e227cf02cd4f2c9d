//! AWS Lambda handler for single-company valuations
//!
//! Accepts a financial profile plus optional market assumptions and growth
//! mode as JSON, and returns the full valuation report. Valuation failures are
//! reported in the `error` field rather than failing the invocation.

use chrono::{DateTime, Utc};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use valuation_engine::scenario::ScenarioOutcome;
use valuation_engine::{
    FinancialProfile, GrowthSource, MarketAssumptions, Scenario, ScenarioRunner, ValuationConfig,
    ValuationReport,
};

/// Input for one valuation
#[derive(Debug, Deserialize)]
pub struct ValuationRequest {
    pub profile: FinancialProfile,

    /// Market assumptions; omitted fields use the defaults (rf 4%, market return 9%, g 2.5%, 5 years)
    #[serde(default)]
    pub assumptions: MarketAssumptions,

    /// Growth mode (default: from historical free cash flow)
    #[serde(default)]
    pub growth_source: GrowthSource,

    /// Also run the bear/base/bull scenarios
    #[serde(default)]
    pub include_scenarios: bool,
}

/// Output from the valuation
#[derive(Debug, Serialize)]
pub struct ValuationResponse {
    pub ticker: String,
    pub assumptions: MarketAssumptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ValuationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<ScenarioOutcome>>,
    pub generated_at: DateTime<Utc>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn value_request(request: ValuationRequest) -> ValuationResponse {
    let start = std::time::Instant::now();

    let runner = ScenarioRunner::with_config(ValuationConfig {
        growth_source: request.growth_source,
    });

    let (report, error) = match runner.run(&request.profile, &request.assumptions) {
        Ok(report) => (Some(report), None),
        Err(e) => {
            log::warn!("{}: valuation failed: {}", request.profile.ticker, e);
            (None, Some(format!("{}: {}", e.kind(), e)))
        }
    };

    let scenarios = if request.include_scenarios && report.is_some() {
        let set = Scenario::standard_set(&request.assumptions);
        Some(runner.run_scenarios(&request.profile, &set))
    } else {
        None
    };

    ValuationResponse {
        ticker: request.profile.ticker,
        assumptions: request.assumptions,
        report,
        scenarios,
        generated_at: Utc::now(),
        execution_time_ms: start.elapsed().as_millis() as u64,
        error,
    }
}

async fn handler(event: LambdaEvent<ValuationRequest>) -> Result<ValuationResponse, Error> {
    let response = value_request(event.payload);
    log::info!(
        "{} valued in {} ms",
        response.ticker,
        response.execution_time_ms
    );
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
