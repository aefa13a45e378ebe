use crate::analysis::analyze;
use crate::error::{DataSourceError, SymbolError};
use crate::models::{RawChainEntry, SymbolResult};
use crate::nse::config::market_now;
use crate::utility::timing::AggregateTimer;
use chrono::DateTime;
use chrono_tz::Tz;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Supplier of raw option-chain rows for one symbol.
pub trait ChainSource: Send + Sync {
    fn fetch_chain<'a>(
        &'a self,
        symbol: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RawChainEntry>, DataSourceError>>;
}

/// Pacing and bounding of a run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Pause between consecutive symbols.
    pub request_delay: Duration,
    /// Attempt at most this many symbols.
    pub max_symbols: Option<usize>,
    /// Wall-clock budget for the whole run.
    pub budget: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of one run. Counts are always derived from the collected
/// sequences, so `successful + failed == total_stocks` holds by construction.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Sorted by `combined_ch_oi`, descending.
    pub data: Vec<SymbolResult>,
    pub failures: Vec<SymbolFailure>,
    /// Never attempted: beyond the symbol cap or past the deadline.
    pub skipped_symbols: Vec<String>,
    pub generated_at: DateTime<Tz>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchSummary {
    pub total_stocks: usize,
    pub successful: usize,
    pub failed: usize,
    pub failed_symbols: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_symbols: Vec<String>,
}

impl BatchReport {
    pub fn failed_symbols(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.symbol.clone()).collect()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total_stocks: self.data.len() + self.failures.len(),
            successful: self.data.len(),
            failed: self.failures.len(),
            failed_symbols: self.failed_symbols(),
            skipped_symbols: self.skipped_symbols.clone(),
        }
    }

    /// Run date in the market timezone, `YYYY-MM-DD`.
    pub fn date(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    pub fn top(&self, n: usize) -> &[SymbolResult] {
        &self.data[..n.min(self.data.len())]
    }
}

/// Published payload of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    pub success: bool,
    pub telegram_sent: bool,
    pub date: String,
    pub summary: BatchSummary,
    pub data: Vec<SymbolResult>,
    pub timestamp: String,
}

impl RunResponse {
    pub fn from_report(report: &BatchReport, telegram_sent: bool) -> Self {
        Self {
            success: true,
            telegram_sent,
            date: report.date(),
            summary: report.summary(),
            data: report.data.clone(),
            timestamp: market_now().to_rfc3339(),
        }
    }
}

/// Payload returned when a run could not start.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            timestamp: market_now().to_rfc3339(),
        }
    }
}

/// Sequentially fetches and analyzes every symbol of the universe.
pub struct BatchOrchestrator {
    source: Arc<dyn ChainSource>,
    options: BatchOptions,
}

impl BatchOrchestrator {
    pub fn new(source: Arc<dyn ChainSource>, options: BatchOptions) -> Self {
        Self { source, options }
    }

    pub async fn run(&self, symbols: &[String]) -> BatchReport {
        let deadline = self.options.budget.map(|b| Instant::now() + b);
        let limit = self.options.max_symbols.unwrap_or(symbols.len());

        let mut data = Vec::new();
        let mut failures = Vec::new();
        let mut skipped_symbols = Vec::new();
        let mut fetch_timer = AggregateTimer::new("symbol fetch+analyze");

        for (idx, symbol) in symbols.iter().enumerate() {
            if idx >= limit {
                skipped_symbols.push(symbol.clone());
                continue;
            }

            if idx > 0 && !self.options.request_delay.is_zero() {
                tokio::time::sleep(self.options.request_delay).await;
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                skipped_symbols.push(symbol.clone());
                continue;
            }

            info!(symbol = %symbol, "[{}/{}] processing", idx + 1, symbols.len());

            let started = Instant::now();
            let outcome = self.process_symbol(symbol, deadline).await;
            fetch_timer.record(started.elapsed());

            match outcome {
                Ok(result) => {
                    info!(
                        symbol = %symbol,
                        ce_oi = result.sum_ce_oi,
                        pe_oi = result.sum_pe_oi,
                        combined_oi = result.combined_oi,
                        combined_ch_oi = result.combined_ch_oi,
                        "symbol analyzed"
                    );
                    data.push(result);
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "symbol failed");
                    failures.push(SymbolFailure {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !skipped_symbols.is_empty() {
            warn!(
                skipped = skipped_symbols.len(),
                "symbols not attempted (symbol cap or run budget reached)"
            );
        }
        fetch_timer.log_summary();

        // Vec::sort_by is stable: equal values keep processing order
        data.sort_by(|a, b| b.combined_ch_oi.total_cmp(&a.combined_ch_oi));

        BatchReport {
            data,
            failures,
            skipped_symbols,
            generated_at: market_now(),
        }
    }

    async fn process_symbol(
        &self,
        symbol: &str,
        deadline: Option<Instant>,
    ) -> Result<SymbolResult, SymbolError> {
        let fetch = self.source.fetch_chain(symbol);

        let entries = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fetch)
                .await
                .map_err(|_| DataSourceError::Timeout)??,
            None => fetch.await?,
        };

        Ok(analyze(symbol, &entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nse::config::to_market_time;
    use chrono::{TimeZone, Utc};

    fn result(symbol: &str, combined_ch_oi: f64) -> SymbolResult {
        SymbolResult {
            symbol: symbol.to_string(),
            underlying_value: 100.0,
            sum_ce_oi: 10,
            sum_pe_oi: 10,
            sum_ce_change_oi: 0,
            sum_pe_change_oi: 0,
            combined_oi: 0.0,
            combined_ch_oi,
        }
    }

    fn report() -> BatchReport {
        BatchReport {
            data: vec![result("A", 0.3), result("B", 0.1)],
            failures: vec![SymbolFailure { symbol: "C".into(), reason: "boom".into() }],
            skipped_symbols: vec![],
            generated_at: to_market_time(Utc.with_ymd_and_hms(2026, 10, 15, 19, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_summary_counts_from_sequences() {
        let summary = report().summary();
        assert_eq!(summary.total_stocks, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failed_symbols, vec!["C".to_string()]);
    }

    #[test]
    fn test_date_uses_market_timezone() {
        // 19:00 UTC on the 15th is 00:30 IST on the 16th
        let report = report();
        assert_eq!(report.generated_at.naive_utc().date().to_string(), "2026-10-15");
        assert_eq!(report.date(), "2026-10-16");
        assert_eq!(report.generated_at.to_rfc3339(), "2026-10-16T00:30:00+05:30");
    }

    #[test]
    fn test_top_is_bounded() {
        let report = report();
        assert_eq!(report.top(10).len(), 2);
        assert_eq!(report.top(1)[0].symbol, "A");
    }

    #[test]
    fn test_response_shape() {
        let response = RunResponse::from_report(&report(), false);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["telegram_sent"], false);
        assert_eq!(json["date"], "2026-10-16");
        assert_eq!(json["summary"]["total_stocks"], 3);
        assert!(json["summary"].get("skipped_symbols").is_none());
        assert_eq!(json["data"][0]["Symbol"], "A");
        assert_eq!(json["data"][0]["Combined_CH_OI"], 0.3);
        assert!(json["timestamp"].as_str().unwrap().ends_with("+05:30"));
    }
}
