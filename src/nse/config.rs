use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::time::Duration;

// -----------------------------------------------
// NSE API ENDPOINTS
// -----------------------------------------------
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";
pub const NSE_OPTION_CHAIN_PAGE: &str = "https://www.nseindia.com/option-chain";

pub fn nse_contract_info_url(symbol: &str) -> String {
    format!(
        "{}/api/option-chain-contract-info?symbol={}",
        NSE_BASE_URL,
        urlencoding::encode(symbol)
    )
}

pub fn nse_option_chain_url(typ: &str, symbol: &str, expiry: &str) -> String {
    format!(
        "{}/api/option-chain-v3?type={}&symbol={}&expiry={}",
        NSE_BASE_URL,
        typ,
        urlencoding::encode(symbol),
        urlencoding::encode(expiry)
    )
}

/// Instrument type sent to the option-chain endpoint; the universe is stocks only.
pub const EQUITY_TYPE: &str = "Equity";

/// Expiry date format used by the contract-info endpoint, e.g. "30-Dec-2025".
pub const EXPIRY_FORMAT: &str = "%d-%b-%Y";

// -----------------------------------------------
// MARKET CLOCK
// -----------------------------------------------

/// Business timezone for every date and timestamp we produce.
pub const MARKET_TZ: Tz = chrono_tz::Asia::Kolkata;

pub fn market_now() -> DateTime<Tz> {
    to_market_time(Utc::now())
}

pub fn to_market_time(at: DateTime<Utc>) -> DateTime<Tz> {
    at.with_timezone(&MARKET_TZ)
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// SESSION WARMUP
// -----------------------------------------------
pub const WARMUP_DELAY_MS: u64 = 200;

// -----------------------------------------------
// RETRY CONFIG
// -----------------------------------------------
pub const RETRY_BASE_DELAY_MS: u64 = 100;
pub const RETRY_FACTOR: u64 = 2;
pub const RETRY_MAX_DELAY_SECS: u64 = 3;
pub const RETRY_MAX_ATTEMPTS: usize = 3;

// -----------------------------------------------
// HTTP HEADERS
// -----------------------------------------------
pub const HEADER_REFERER: &str = "https://www.nseindia.com/";
pub const HEADER_X_REQUESTED_WITH: &str = "XMLHttpRequest";
pub const HEADER_ACCEPT_HTML: &str = "text/html";

/// Characters of a failed response body kept in error messages.
pub const BODY_PREVIEW_CHARS: usize = 200;
