//! Error types for valuation runs and profile ingestion

use thiserror::Error;

/// Failure of a single valuation invocation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    /// Negative debt, or market capitalization plus debt not positive
    #[error("invalid capital structure: market cap {market_cap}, total debt {total_debt}")]
    InvalidCapitalStructure { market_cap: f64, total_debt: f64 },

    /// Perpetuity formula diverges (terminal growth >= discount rate)
    #[error("terminal value does not converge: terminal growth {terminal_growth} >= wacc {wacc}")]
    NonConvergentTerminalValue { terminal_growth: f64, wacc: f64 },

    /// Not enough historical data points to estimate growth
    #[error("insufficient history for {series}: need {required} data points, have {available}")]
    InsufficientHistory {
        series: &'static str,
        required: usize,
        available: usize,
    },

    /// Denominator was zero or unknown
    #[error("division by zero computing {quantity}")]
    DivisionByZero { quantity: &'static str },

    /// Assumption outside its valid domain
    #[error("invalid assumption: {name} = {value}")]
    InvalidAssumption { name: &'static str, value: f64 },

    /// Per-year rate schedule does not cover the forecast horizon
    #[error("rate schedule has {actual} entries, forecast horizon is {expected} years")]
    RateScheduleLength { expected: usize, actual: usize },

    /// Shares outstanding must be positive to express value per share
    #[error("invalid share count: {shares}")]
    InvalidShareCount { shares: f64 },
}

impl ValuationError {
    pub fn invalid_assumption(name: &'static str, value: f64) -> Self {
        Self::InvalidAssumption { name, value }
    }

    /// Short machine-readable kind, shown by callers next to the message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCapitalStructure { .. } => "InvalidCapitalStructure",
            Self::NonConvergentTerminalValue { .. } => "NonConvergentTerminalValue",
            Self::InsufficientHistory { .. } => "InsufficientHistory",
            Self::DivisionByZero { .. } => "DivisionByZero",
            Self::InvalidAssumption { .. } => "InvalidAssumption",
            Self::RateScheduleLength { .. } => "RateScheduleLength",
            Self::InvalidShareCount { .. } => "InvalidShareCount",
        }
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Failure while turning external data into typed profiles or scenarios
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{ticker}: missing required field '{field}' in fiscal year {fiscal_year}")]
    MissingField {
        ticker: String,
        field: &'static str,
        fiscal_year: i32,
    },

    #[error("{ticker}: fiscal year {fiscal_year} appears more than once")]
    DuplicateYear { ticker: String, fiscal_year: i32 },

    #[error("{ticker}: no row for fiscal year {fiscal_year}")]
    MissingYear { ticker: String, fiscal_year: i32 },

    #[error("{ticker}: '{field}' missing in fiscal year {fiscal_year} after earlier years were reported")]
    SeriesGap {
        ticker: String,
        field: &'static str,
        fiscal_year: i32,
    },

    #[error("expected a single ticker, found {0:?}")]
    MixedTickers(Vec<String>),

    #[error("no rows found")]
    EmptyInput,
}
