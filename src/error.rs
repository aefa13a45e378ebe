use thiserror::Error;

/// A row of the option-chain payload that failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("row {row}: missing strikePrice")]
    MissingStrike { row: usize },

    #[error("row {row}: invalid strike price {strike}")]
    InvalidStrike { row: usize, strike: f64 },

    #[error("row {row} ({leg}): invalid open interest {value}")]
    InvalidOpenInterest { row: usize, leg: &'static str, value: f64 },

    #[error("row {row} ({leg}): invalid change in open interest {value}")]
    InvalidChangeInOpenInterest { row: usize, leg: &'static str, value: f64 },

    #[error("invalid underlying value {0}")]
    InvalidUnderlying(f64),
}

/// Failure to obtain one symbol's option chain from the exchange.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("request error: {0}")]
    Request(String),

    #[error("HTTP {status}: {preview}")]
    Status { status: u16, preview: String },

    #[error("non-JSON response: {0}")]
    NonJson(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed option chain: {0}")]
    Parse(#[from] ParseError),

    #[error("no usable expiry date for {0}")]
    NoExpiry(String),

    #[error("fetch cut off by the run deadline")]
    Timeout,
}

impl From<reqwest::Error> for DataSourceError {
    fn from(err: reqwest::Error) -> Self {
        DataSourceError::Request(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("strike ladder is empty")]
pub struct InsufficientDataError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("option chain has no rows")]
    EmptyChain,

    #[error("option chain carries no underlying price")]
    MissingUnderlying,

    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    #[error("MIN(Sum_PE_OI, Sum_CE_OI) is not positive (CE {ce}, PE {pe})")]
    ZeroMinOpenInterest { ce: i64, pe: i64 },

    #[error("Sum_PE_OI + Sum_CE_OI is not positive (CE {ce}, PE {pe})")]
    ZeroTotalOpenInterest { ce: i64, pe: i64 },

    #[error("open interest sum {0} does not fit in a contract count")]
    OpenInterestOutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected by channel: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        NotificationError::Transport(err.to_string())
    }
}

/// Anything that can go wrong while processing a single symbol.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Fatal: without a symbol universe there is nothing to process.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("symbol list not found: {0}")]
    NotFound(String),

    #[error("failed to read symbol list: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse symbol list: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported symbol list format '.{extension}' for {path} (use .csv or .txt)")]
    UnsupportedFormat { path: String, extension: String },

    #[error("no 'Symbol' column in {path} (columns: {columns:?})")]
    MissingSymbolColumn { path: String, columns: Vec<String> },
}
