//! Valuation Engine CLI
//!
//! Command-line interface for DCF/DDM valuations, scenario comparisons,
//! sensitivity grids, and batch runs over many tickers.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use valuation_engine::assumptions::{load_scenarios, DEFAULT_FCF_CONVERSION};
use valuation_engine::profile::{load_profile, load_profile_json, load_profiles};
use valuation_engine::scenario::{ScenarioOutcome, SensitivityTable};
use valuation_engine::{
    EquityPremium, FinancialProfile, GrowthSource, MarketAssumptions, OperatingAssumptions,
    RateSchedule, Scenario, ScenarioRunner, ValuationConfig, ValuationReport,
};

#[derive(Parser)]
#[command(name = "valuation_engine")]
#[command(about = "DCF and dividend discount valuation for equities", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value a single company
    Value {
        /// Profile file (.csv or .json)
        profile: PathBuf,
        #[command(flatten)]
        market: MarketArgs,
        #[command(flatten)]
        growth: GrowthArgs,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Write the per-year projection table to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Compare bear/base/bull (or custom) scenarios for one company
    Scenarios {
        profile: PathBuf,
        #[command(flatten)]
        market: MarketArgs,
        #[command(flatten)]
        growth: GrowthArgs,
        /// JSON file with custom scenarios instead of the standard set
        #[arg(long)]
        scenarios: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Price per share across discount rates and terminal growth rates
    Sensitivity {
        profile: PathBuf,
        #[command(flatten)]
        market: MarketArgs,
        #[command(flatten)]
        growth: GrowthArgs,
        #[arg(long, value_delimiter = ',', default_value = "0.08,0.09,0.10,0.11,0.12")]
        rates: Vec<f64>,
        #[arg(long, value_delimiter = ',', default_value = "0.015,0.02,0.025,0.03,0.035")]
        growths: Vec<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Value every ticker in a multi-company CSV file
    Batch {
        profiles: PathBuf,
        #[command(flatten)]
        market: MarketArgs,
        #[command(flatten)]
        growth: GrowthArgs,
        /// Summary CSV output path
        #[arg(long, default_value = "valuation_summary.csv")]
        output: PathBuf,
    },
}

#[derive(Args, Clone)]
struct MarketArgs {
    #[arg(long, default_value_t = 0.04)]
    risk_free_rate: f64,
    /// Expected market return (ignored when --risk-premium is given)
    #[arg(long, default_value_t = 0.09)]
    market_return: f64,
    /// Market risk premium, given directly
    #[arg(long)]
    risk_premium: Option<f64>,
    #[arg(long, default_value_t = 0.025)]
    terminal_growth: f64,
    /// Overrides the profile's tax rate
    #[arg(long)]
    tax_rate: Option<f64>,
    #[arg(long, default_value_t = 5)]
    forecast_years: usize,
}

impl MarketArgs {
    fn to_assumptions(&self) -> MarketAssumptions {
        let equity_premium = match self.risk_premium {
            Some(premium) => EquityPremium::RiskPremium(premium),
            None => EquityPremium::MarketReturn(self.market_return),
        };
        MarketAssumptions {
            risk_free_rate: self.risk_free_rate,
            equity_premium,
            terminal_growth_rate: self.terminal_growth,
            tax_rate: self.tax_rate,
            forecast_years: self.forecast_years,
        }
    }
}

#[derive(Args, Clone)]
struct GrowthArgs {
    /// Revenue growth per year (one value or one per forecast year); switches
    /// projection from historical FCF growth to revenue x margin
    #[arg(long, value_delimiter = ',')]
    revenue_growth: Vec<f64>,
    /// Operating margin per year; defaults to the latest historical margin
    #[arg(long, value_delimiter = ',')]
    operating_margin: Vec<f64>,
    #[arg(long, default_value_t = DEFAULT_FCF_CONVERSION)]
    fcf_conversion: f64,
}

impl GrowthArgs {
    /// Growth strategy for a profile; `profile` supplies the fallback margin
    fn to_config(&self, profile: Option<&FinancialProfile>) -> Result<ValuationConfig> {
        if self.revenue_growth.is_empty() {
            return Ok(ValuationConfig::default());
        }

        let operating_margin = if !self.operating_margin.is_empty() {
            RateSchedule::PerYear(self.operating_margin.clone())
        } else {
            match profile.and_then(|p| p.latest_operating_margin()) {
                Some(margin) => RateSchedule::Uniform(margin),
                None => bail!("--operating-margin is required when the profile has no operating history"),
            }
        };

        Ok(ValuationConfig {
            growth_source: GrowthSource::FromAssumptions(OperatingAssumptions {
                revenue_growth: RateSchedule::PerYear(self.revenue_growth.clone()),
                operating_margin,
                fcf_conversion: self.fcf_conversion,
            }),
        })
    }
}

/// JSON envelope for CLI output
#[derive(Serialize)]
struct JsonOutput<'a, T: Serialize> {
    generated_at: DateTime<Utc>,
    assumptions: &'a MarketAssumptions,
    result: T,
}

fn print_json<T: Serialize>(assumptions: &MarketAssumptions, result: T) -> Result<()> {
    let output = JsonOutput {
        generated_at: Utc::now(),
        assumptions,
        result,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_profile(path: &Path) -> Result<FinancialProfile> {
    let is_json = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    let profile = if is_json {
        load_profile_json(path)
    } else {
        load_profile(path)
    };
    profile.with_context(|| format!("failed to load profile from {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Value {
            profile,
            market,
            growth,
            json,
            export,
        } => {
            let profile = read_profile(&profile)?;
            let assumptions = market.to_assumptions();
            let runner = ScenarioRunner::with_config(growth.to_config(Some(&profile))?);

            let report = runner
                .run(&profile, &assumptions)
                .with_context(|| format!("valuation of {} failed", profile.ticker))?;

            if let Some(path) = export {
                write_projection(&path, &report)?;
                log::info!("projection written to {}", path.display());
            }

            if json {
                print_json(&assumptions, &report)
            } else {
                print_report(&report);
                Ok(())
            }
        }
        Commands::Scenarios {
            profile,
            market,
            growth,
            scenarios,
            json,
        } => {
            let profile = read_profile(&profile)?;
            let assumptions = market.to_assumptions();
            let runner = ScenarioRunner::with_config(growth.to_config(Some(&profile))?);

            let scenarios = match scenarios {
                Some(path) => load_scenarios(&path)
                    .with_context(|| format!("failed to load scenarios from {}", path.display()))?,
                None => Scenario::standard_set(&assumptions),
            };
            let outcomes = runner.run_scenarios(&profile, &scenarios);

            if json {
                print_json(&assumptions, &outcomes)
            } else {
                print_outcomes(&profile.ticker, &outcomes);
                Ok(())
            }
        }
        Commands::Sensitivity {
            profile,
            market,
            growth,
            rates,
            growths,
            json,
        } => {
            let profile = read_profile(&profile)?;
            let assumptions = market.to_assumptions();
            let runner = ScenarioRunner::with_config(growth.to_config(Some(&profile))?);

            let table = runner
                .sensitivity(&profile, &assumptions, &rates, &growths)
                .with_context(|| format!("sensitivity for {} failed", profile.ticker))?;

            if json {
                print_json(&assumptions, &table)
            } else {
                print_sensitivity(&profile.ticker, &table);
                Ok(())
            }
        }
        Commands::Batch {
            profiles,
            market,
            growth,
            output,
        } => {
            let profiles = load_profiles(&profiles)
                .with_context(|| format!("failed to load profiles from {}", profiles.display()))?;
            let assumptions = market.to_assumptions();
            let runner = ScenarioRunner::with_config(growth.to_config(None)?);

            let outcomes = runner.run_batch(&profiles, &assumptions);
            write_batch_summary(&output, &outcomes)?;

            let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
            println!(
                "Valued {} of {} companies; summary written to {}",
                outcomes.len() - failed,
                outcomes.len(),
                output.display()
            );
            Ok(())
        }
    }
}

fn print_report(report: &ValuationReport) {
    let dcf = &report.dcf;

    println!("Valuation: {}", report.ticker);
    println!("======================\n");
    println!("  Cost of Equity: {:.2}%", dcf.cost_of_equity * 100.0);
    println!("  Cost of Debt:   {:.2}%", dcf.cost_of_debt * 100.0);
    println!("  WACC:           {:.2}%", dcf.wacc * 100.0);
    println!();

    println!("{:>4} {:>10} {:>16} {:>10} {:>16}", "Year", "Growth", "FCF", "DF", "PV");
    println!("{}", "-".repeat(60));
    for row in dcf.projection_rows() {
        println!(
            "{:>4} {:>9.2}% {:>16.2} {:>10.6} {:>16.2}",
            row.year,
            row.growth_rate * 100.0,
            row.free_cash_flow,
            row.discount_factor,
            row.present_value
        );
    }
    println!();

    println!("  Terminal Value:    {:.2} (PV {:.2})", dcf.terminal_value, dcf.terminal_value_pv);
    println!("  Enterprise Value:  {:.2}", dcf.enterprise_value);
    println!("  Equity Value:      {:.2}", dcf.equity_value);
    println!("  DCF Fair Value:    ${:.2}", dcf.price_per_share);
    println!("  Current Price:     ${:.2}", dcf.current_price);
    match dcf.upside {
        Some(u) => println!("  Upside:            {:.1}%", u * 100.0),
        None => println!("  Upside:            N/A"),
    }
    if let Some(rate) = report.implied_discount_rate {
        println!("  Implied Discount:  {:.2}%", rate * 100.0);
    }
    println!();

    let ddm = &report.ddm;
    match (ddm.intrinsic_value, ddm.reason) {
        (Some(value), _) => {
            println!("  DDM Value:         ${:.2}", value);
            if let Some(g) = ddm.average_dividend_growth {
                println!("  Dividend Growth:   {:.2}%", g * 100.0);
            }
        }
        (None, Some(reason)) => println!("  DDM:               N/A ({})", reason),
        (None, None) => println!("  DDM:               N/A"),
    }
    println!();

    match &report.recommendation {
        Some(rec) => {
            println!("Recommendation: {}", rec.summary);
            for s in &rec.strengths {
                println!("  + {}", s);
            }
            for r in &rec.risks {
                println!("  - {}", r);
            }
        }
        None => println!("Recommendation: N/A (current price unknown)"),
    }
}

fn print_outcomes(ticker: &str, outcomes: &[ScenarioOutcome]) {
    println!("Scenarios: {}", ticker);
    println!("{:<12} {:>8} {:>12} {:>10} {:>12}", "Scenario", "WACC", "Fair Value", "Upside", "Rating");
    println!("{}", "-".repeat(58));

    for outcome in outcomes {
        match &outcome.report {
            Some(report) => println!(
                "{:<12} {:>7.2}% {:>12.2} {:>10} {:>12}",
                outcome.name,
                report.dcf.wacc * 100.0,
                report.dcf.price_per_share,
                report
                    .dcf
                    .upside
                    .map_or("N/A".to_string(), |u| format!("{:.1}%", u * 100.0)),
                report
                    .recommendation
                    .as_ref()
                    .map_or("N/A", |r| r.rating.as_str()),
            ),
            None => println!(
                "{:<12} error: {}",
                outcome.name,
                outcome.error.as_deref().unwrap_or("unknown")
            ),
        }
    }
}

fn print_sensitivity(ticker: &str, table: &SensitivityTable) {
    println!("Sensitivity: {} (rows = discount rate, columns = terminal growth)", ticker);

    print!("{:>8}", "");
    for g in &table.terminal_growth_rates {
        print!(" {:>9.2}%", g * 100.0);
    }
    println!();

    for (rate, row) in table.discount_rates.iter().zip(&table.prices) {
        print!("{:>7.2}%", rate * 100.0);
        for cell in row {
            match cell {
                Some(price) => print!(" {:>10.2}", price),
                None => print!(" {:>10}", "n/c"),
            }
        }
        println!();
    }
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("unable to create {}", path.display()))
}

fn write_projection(path: &Path, report: &ValuationReport) -> Result<()> {
    write_projection_csv(create_file(path)?, report)
}

/// Per-year projection table as CSV
fn write_projection_csv<W: Write>(out: W, report: &ValuationReport) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in report.dcf.projection_rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// One line of the batch summary CSV
#[derive(Serialize)]
struct SummaryRow<'a> {
    ticker: &'a str,
    wacc: Option<f64>,
    dcf_value: Option<f64>,
    ddm_value: Option<f64>,
    current_price: Option<f64>,
    upside: Option<f64>,
    rating: Option<&'static str>,
    error: Option<&'a str>,
}

fn write_batch_summary(path: &Path, outcomes: &[ScenarioOutcome]) -> Result<()> {
    write_batch_summary_csv(create_file(path)?, outcomes)
}

fn write_batch_summary_csv<W: Write>(out: W, outcomes: &[ScenarioOutcome]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    for outcome in outcomes {
        let report = outcome.report.as_ref();
        writer.serialize(SummaryRow {
            ticker: &outcome.name,
            wacc: report.map(|r| r.dcf.wacc),
            dcf_value: report.map(|r| r.dcf.price_per_share),
            ddm_value: report.and_then(|r| r.ddm.intrinsic_value),
            current_price: report.map(|r| r.dcf.current_price),
            upside: report.and_then(|r| r.recommendation.as_ref().map(|rec| rec.average_upside)),
            rating: report.and_then(|r| r.recommendation.as_ref().map(|rec| rec.rating.as_str())),
            error: outcome.error.as_deref(),
        })?;
    }

    writer.flush()?;
    Ok(())
}
