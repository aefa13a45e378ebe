use super::config;
use super::models::{ContractInfo, OptionChain};
use crate::batch::ChainSource;
use crate::error::DataSourceError;
use crate::models::RawChainEntry;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::BoxFuture;
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{header, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

// -----------------------------------------------
// CLIENT WRAPPER WITH SESSION STATE
// -----------------------------------------------
pub struct NSEClient {
    client: Client,
    warmed_up: Arc<RwLock<bool>>,
}

/// Nearest expiry strictly after `today`; falls back to the earliest parsable
/// expiry when every date is today or in the past.
pub fn select_expiry(expiry_dates: &[String], today: NaiveDate) -> Option<&String> {
    let mut parsed: Vec<(NaiveDate, &String)> = expiry_dates
        .iter()
        .filter_map(|s| match NaiveDate::parse_from_str(s, config::EXPIRY_FORMAT) {
            Ok(date) => Some((date, s)),
            Err(e) => {
                warn!(expiry = %s, error = %e, "skipping unparsable expiry date");
                None
            }
        })
        .collect();

    parsed.sort_by_key(|(date, _)| *date);

    parsed
        .iter()
        .find(|(date, _)| *date > today)
        .or_else(|| parsed.first())
        .map(|(_, s)| *s)
}

impl NSEClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            warmed_up: Arc::new(RwLock::new(false)),
        })
    }

    /// Warmup NSE session (only once per client). Best effort: a failed
    /// warmup is logged and the API calls are attempted anyway.
    async fn warmup_if_needed(&self) {
        if *self.warmed_up.read().await {
            return;
        }

        let mut warmed = self.warmed_up.write().await;
        if !*warmed {
            let res = self
                .client
                .get(config::NSE_OPTION_CHAIN_PAGE)
                .header(header::ACCEPT, config::HEADER_ACCEPT_HTML)
                .send()
                .await;

            if let Err(e) = res {
                warn!(error = %e, "NSE session warmup failed");
            }

            tokio::time::sleep(Duration::from_millis(config::WARMUP_DELAY_MS)).await;
            *warmed = true;
        }
    }

    /// GET a JSON document, retrying transport failures, 429 and 5xx.
    async fn fetch_json(&self, url: &str) -> Result<String, DataSourceError> {
        self.warmup_if_needed().await;

        let backoff = ExponentialBackoff::from_millis(config::RETRY_BASE_DELAY_MS)
            .factor(config::RETRY_FACTOR)
            .max_delay(Duration::from_secs(config::RETRY_MAX_DELAY_SECS))
            .take(config::RETRY_MAX_ATTEMPTS);

        RetryIf::spawn(backoff, || self.fetch_once(url), is_retryable).await
    }

    async fn fetch_once(&self, url: &str) -> Result<String, DataSourceError> {
        let res = self
            .client
            .get(url)
            .header(header::REFERER, config::HEADER_REFERER)
            .header("X-Requested-With", config::HEADER_X_REQUESTED_WITH)
            .send()
            .await?;

        let status = res.status();
        debug!(url, status = status.as_u16(), "NSE response");

        if status.is_success() {
            let text = res.text().await?;

            let trimmed = text.trim();
            if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                return Err(DataSourceError::NonJson(preview(&text)));
            }

            Ok(text)
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(DataSourceError::Status {
                status: status.as_u16(),
                preview: preview(&body),
            })
        }
    }

    // -----------------------------------------------
    // STEP 1: FETCH CONTRACT INFO
    // -----------------------------------------------
    pub async fn fetch_contract_info(&self, symbol: &str) -> Result<ContractInfo, DataSourceError> {
        let url = config::nse_contract_info_url(symbol);
        let text = self.fetch_json(&url).await?;
        Ok(serde_json::from_str(&text)?)
    }

    // -----------------------------------------------
    // STEP 2: FETCH OPTION CHAIN
    // -----------------------------------------------
    pub async fn fetch_option_chain(
        &self,
        symbol: &str,
        expiry: &str,
    ) -> Result<OptionChain, DataSourceError> {
        let url = config::nse_option_chain_url(config::EQUITY_TYPE, symbol, expiry);
        let text = self.fetch_json(&url).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Contract info, expiry selection and chain fetch for one stock.
    pub async fn fetch_stock_chain(&self, symbol: &str) -> Result<Vec<RawChainEntry>, DataSourceError> {
        let info = self.fetch_contract_info(symbol).await?;

        let today = config::market_now().date_naive();
        let expiry = select_expiry(&info.expiry_dates, today)
            .ok_or_else(|| DataSourceError::NoExpiry(symbol.to_string()))?;
        debug!(symbol, expiry = %expiry, "expiry selected");

        let chain = self.fetch_option_chain(symbol, expiry).await?;
        Ok(chain.into_entries()?)
    }
}

impl ChainSource for NSEClient {
    fn fetch_chain<'a>(
        &'a self,
        symbol: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawChainEntry>, DataSourceError>> {
        Box::pin(self.fetch_stock_chain(symbol))
    }
}

fn is_retryable(err: &DataSourceError) -> bool {
    match err {
        DataSourceError::Request(_) | DataSourceError::NonJson(_) => true,
        DataSourceError::Status { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        _ => false,
    }
}

fn preview(body: &str) -> String {
    body.chars().take(config::BODY_PREVIEW_CHARS).collect()
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    // Rotating Accept-Language headers (fingerprint avoidance)
    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .copied()
        .unwrap_or("en-US,en;q=0.9");
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_str(lang)?);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_select_expiry_nearest_future() {
        let expiries = dates(&["27-Nov-2026", "30-Oct-2026", "29-Dec-2026"]);
        let chosen = select_expiry(&expiries, day(2026, 10, 16)).unwrap();
        assert_eq!(chosen, "30-Oct-2026");
    }

    #[test]
    fn test_select_expiry_skips_today() {
        let expiries = dates(&["16-Oct-2026", "30-Oct-2026"]);
        let chosen = select_expiry(&expiries, day(2026, 10, 16)).unwrap();
        assert_eq!(chosen, "30-Oct-2026");
    }

    #[test]
    fn test_select_expiry_falls_back_to_earliest() {
        let expiries = dates(&["25-Sep-2026", "28-Aug-2026"]);
        let chosen = select_expiry(&expiries, day(2026, 10, 16)).unwrap();
        assert_eq!(chosen, "28-Aug-2026");
    }

    #[test]
    fn test_select_expiry_ignores_garbage() {
        let expiries = dates(&["soon", "30-Oct-2026"]);
        assert_eq!(select_expiry(&expiries, day(2026, 10, 16)).unwrap(), "30-Oct-2026");
        assert!(select_expiry(&dates(&["soon"]), day(2026, 10, 16)).is_none());
    }

    #[test]
    fn test_retry_policy() {
        assert!(is_retryable(&DataSourceError::Status { status: 429, preview: String::new() }));
        assert!(is_retryable(&DataSourceError::Status { status: 503, preview: String::new() }));
        assert!(!is_retryable(&DataSourceError::Status { status: 404, preview: String::new() }));
        assert!(!is_retryable(&DataSourceError::NoExpiry("X".into())));
    }
}
