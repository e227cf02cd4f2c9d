//! Load financial profiles from CSV or JSON
//!
//! CSV layout: one row per ticker per fiscal year, fixed snake_case headers.
//! Historical columns may be empty only before a series' first reported
//! year; a gap once a series has started is rejected.
//! Snapshot columns (beta, debt, price, ...) are read from each ticker's
//! most recent row.

use super::FinancialProfile;
use crate::error::LoadError;
use csv::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    ticker: String,
    fiscal_year: i32,
    revenue: Option<f64>,
    net_income: Option<f64>,
    operating_income: Option<f64>,
    cash_from_operations: Option<f64>,
    capital_expenditure: Option<f64>,
    dividends_per_share: Option<f64>,
    beta: Option<f64>,
    total_debt: Option<f64>,
    interest_expense: Option<f64>,
    market_capitalization: Option<f64>,
    shares_outstanding: Option<f64>,
    current_price_per_share: Option<f64>,
    tax_rate: Option<f64>,
}

fn required(row: &CsvRow, field: &'static str, value: Option<f64>) -> Result<f64, LoadError> {
    value.ok_or_else(|| LoadError::MissingField {
        ticker: row.ticker.clone(),
        field,
        fiscal_year: row.fiscal_year,
    })
}

/// Build one profile from a ticker's rows (any order)
fn rows_to_profile(mut rows: Vec<CsvRow>) -> Result<FinancialProfile, LoadError> {
    rows.sort_by_key(|r| r.fiscal_year);

    for pair in rows.windows(2) {
        if pair[0].fiscal_year == pair[1].fiscal_year {
            return Err(LoadError::DuplicateYear {
                ticker: pair[1].ticker.clone(),
                fiscal_year: pair[1].fiscal_year,
            });
        }
        if pair[1].fiscal_year != pair[0].fiscal_year + 1 {
            return Err(LoadError::MissingYear {
                ticker: pair[1].ticker.clone(),
                fiscal_year: pair[0].fiscal_year + 1,
            });
        }
    }

    let latest = rows.last().ok_or(LoadError::EmptyInput)?;

    let mut profile = FinancialProfile {
        ticker: latest.ticker.clone(),
        first_fiscal_year: rows.first().map(|r| r.fiscal_year),
        beta: required(latest, "beta", latest.beta)?,
        total_debt: required(latest, "total_debt", latest.total_debt)?,
        interest_expense: required(latest, "interest_expense", latest.interest_expense)?,
        market_capitalization: required(
            latest,
            "market_capitalization",
            latest.market_capitalization,
        )?,
        shares_outstanding: required(latest, "shares_outstanding", latest.shares_outstanding)?,
        current_price_per_share: required(
            latest,
            "current_price_per_share",
            latest.current_price_per_share,
        )?,
        tax_rate: required(latest, "tax_rate", latest.tax_rate)?,
        ..Default::default()
    };

    for row in &rows {
        push_year(&mut profile.revenue, row, "revenue", row.revenue)?;
        push_year(&mut profile.net_income, row, "net_income", row.net_income)?;
        push_year(&mut profile.operating_income, row, "operating_income", row.operating_income)?;
        push_year(
            &mut profile.cash_from_operations,
            row,
            "cash_from_operations",
            row.cash_from_operations,
        )?;
        // Sources disagree on the sign of capex; store it as a cash outflow
        push_year(
            &mut profile.capital_expenditure,
            row,
            "capital_expenditure",
            row.capital_expenditure.map(|c| -c.abs()),
        )?;
        push_year(
            &mut profile.dividends_per_share,
            row,
            "dividends_per_share",
            row.dividends_per_share,
        )?;
    }

    Ok(profile)
}

/// Append one fiscal year to a series
///
/// A series may start late, but once started it must run through the latest
/// year, so every series ends on the same fiscal year.
fn push_year(
    series: &mut Vec<f64>,
    row: &CsvRow,
    field: &'static str,
    value: Option<f64>,
) -> Result<(), LoadError> {
    match value {
        Some(v) => series.push(v),
        None if series.is_empty() => {}
        None => {
            return Err(LoadError::SeriesGap {
                ticker: row.ticker.clone(),
                field,
                fiscal_year: row.fiscal_year,
            })
        }
    }
    Ok(())
}

/// Load profiles for every ticker in a CSV file
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<FinancialProfile>, LoadError> {
    let file = File::open(path)?;
    load_profiles_from_reader(file)
}

/// Load profiles from any reader (e.g., string buffer, upload stream)
///
/// Profiles are returned in the order their tickers first appear.
pub fn load_profiles_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<FinancialProfile>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut grouped: Vec<Vec<CsvRow>> = Vec::new();

    for result in csv_reader.deserialize() {
        let mut row: CsvRow = result?;
        row.ticker = row.ticker.trim().to_uppercase();

        let slot = *index.entry(row.ticker.clone()).or_insert_with(|| {
            grouped.push(Vec::new());
            grouped.len() - 1
        });
        grouped[slot].push(row);
    }

    if grouped.is_empty() {
        return Err(LoadError::EmptyInput);
    }

    grouped.into_iter().map(rows_to_profile).collect()
}

/// Load a CSV file that must describe exactly one ticker
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<FinancialProfile, LoadError> {
    let mut profiles = load_profiles(path)?;
    if profiles.len() > 1 {
        return Err(LoadError::MixedTickers(
            profiles.into_iter().map(|p| p.ticker).collect(),
        ));
    }
    profiles.pop().ok_or(LoadError::EmptyInput)
}

/// Load a profile serialized as JSON
pub fn load_profile_json<P: AsRef<Path>>(path: P) -> Result<FinancialProfile, LoadError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ticker,fiscal_year,revenue,net_income,operating_income,cash_from_operations,capital_expenditure,dividends_per_share,beta,total_debt,interest_expense,market_capitalization,shares_outstanding,current_price_per_share,tax_rate\n";

    #[test]
    fn test_load_profiles_sorts_oldest_first() {
        let data = format!(
            "{HEADER}\
             acme,2023,1210,121,181,160,40,1.2,1.1,500,25,5000,100,50,0.21\n\
             acme,2021,1000,100,150,120,30,1.0,,,,,,,\n\
             acme,2022,1100,110,165,140,-35,1.1,,,,,,,\n"
        );

        let profiles = load_profiles_from_reader(data.as_bytes()).unwrap();
        assert_eq!(profiles.len(), 1);

        let p = &profiles[0];
        assert_eq!(p.ticker, "ACME");
        assert_eq!(p.first_fiscal_year, Some(2021));
        assert_eq!(p.revenue, vec![1000.0, 1100.0, 1210.0]);
        // Positive and negative capex both normalized to outflows
        assert_eq!(p.capital_expenditure, vec![-30.0, -35.0, -40.0]);
        assert_eq!(p.dividends_per_share, vec![1.0, 1.1, 1.2]);
        assert_eq!(p.shares_outstanding, 100.0);
        assert_eq!(p.tax_rate, 0.21);
    }

    #[test]
    fn test_load_multiple_tickers_and_gaps() {
        let data = format!(
            "{HEADER}\
             AAA,2022,100,,,50,-10,,1.0,0,0,1000,10,100,0.2\n\
             BBB,2021,,,,20,-5,,,,,,,,\n\
             BBB,2022,300,,,25,-5,,0.8,50,3,2000,20,100,0.25\n"
        );

        let profiles = load_profiles_from_reader(data.as_bytes()).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].ticker, "AAA");
        assert_eq!(profiles[1].ticker, "BBB");
        // Revenue missing for 2021, so BBB's revenue series is shorter
        assert_eq!(profiles[1].revenue, vec![300.0]);
        assert_eq!(profiles[1].cash_from_operations, vec![20.0, 25.0]);
        assert!(profiles[1].dividends_per_share.is_empty());
    }

    #[test]
    fn test_missing_snapshot_field() {
        let data = format!("{HEADER}ACME,2023,1210,121,181,160,-40,,1.1,500,25,,100,50,0.21\n");

        let err = load_profiles_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField { field: "market_capitalization", fiscal_year: 2023, .. }
        ));
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let data = format!(
            "{HEADER}\
             ACME,2023,1210,121,181,160,-40,,1.1,500,25,5000,100,50,0.21\n\
             ACME,2023,1210,121,181,160,-40,,1.1,500,25,5000,100,50,0.21\n"
        );

        let err = load_profiles_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateYear { fiscal_year: 2023, .. }));
    }

    #[test]
    fn test_empty_input() {
        let err = load_profiles_from_reader(HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyInput));
    }

    #[test]
    fn test_load_sample_file() {
        let profiles = load_profiles("data/sample_profiles.csv").unwrap();
        let tickers: Vec<_> = profiles.iter().map(|p| p.ticker.as_str()).collect();
        assert_eq!(tickers, ["STDY", "GRWT"]);
        assert_eq!(profiles[0].dividends_per_share.len(), 5);
        assert!(profiles[1].pays_no_dividends());

        assert!(matches!(
            load_profile("data/sample_profiles.csv"),
            Err(LoadError::MixedTickers(_))
        ));
    }

    #[test]
    fn test_interior_gap_rejected() {
        // 2022 operating cash flow missing between two reported years
        let data = format!(
            "{HEADER}\
             X,2021,,,,100,-10,,1.0,0,0,1000,10,100,0.2\n\
             X,2022,,,,,-50,,1.0,0,0,1000,10,100,0.2\n\
             X,2023,,,,130,-30,,1.0,0,0,1000,10,100,0.2\n"
        );

        let err = load_profiles_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::SeriesGap { field: "cash_from_operations", fiscal_year: 2022, .. }
        ));
    }

    #[test]
    fn test_trailing_gap_rejected() {
        let data = format!(
            "{HEADER}\
             X,2021,,,,100,-10,,,,,,,,\n\
             X,2022,,,,120,,,1.0,0,0,1000,10,100,0.2\n"
        );

        let err = load_profiles_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::SeriesGap { field: "capital_expenditure", fiscal_year: 2022, .. }
        ));
    }

    #[test]
    fn test_late_start_stays_year_aligned() {
        // Capex reported from 2022 only; FCF pairs 2022 and 2023 figures
        let data = format!(
            "{HEADER}\
             X,2021,,,,100,,,,,,,,,\n\
             X,2022,,,,120,-20,,,,,,,,\n\
             X,2023,,,,130,-30,,1.0,0,0,1000,10,100,0.2\n"
        );

        let profiles = load_profiles_from_reader(data.as_bytes()).unwrap();
        assert_eq!(profiles[0].free_cash_flow_history(), vec![100.0, 100.0]);
    }

    #[test]
    fn test_missing_fiscal_year_rejected() {
        let data = format!(
            "{HEADER}\
             X,2021,,,,100,-10,,,,,,,,\n\
             X,2023,,,,130,-30,,1.0,0,0,1000,10,100,0.2\n"
        );

        let err = load_profiles_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingYear { fiscal_year: 2022, .. }));
    }
}
