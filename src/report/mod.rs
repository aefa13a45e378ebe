pub mod telegram;

use crate::batch::BatchReport;
use crate::error::NotificationError;
use crate::models::SymbolResult;
use futures::future::BoxFuture;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{error, info};

pub use telegram::TelegramNotifier;

/// Rows included in the notification unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 10;

/// Delivery channel for the formatted summary.
pub trait Notifier: Send + Sync {
    fn send<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Result<(), NotificationError>>;
}

/// Formats the top of a run and hands it to the notifier. Delivery is best
/// effort: the outcome is returned as a flag and never fails the run.
#[derive(Clone)]
pub struct Reporter {
    notifier: Option<Arc<dyn Notifier>>,
    top_n: usize,
}

impl Reporter {
    pub fn new(notifier: Option<Arc<dyn Notifier>>, top_n: usize) -> Self {
        Self { notifier, top_n }
    }

    pub fn disabled() -> Self {
        Self::new(None, DEFAULT_TOP_N)
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Send the top `top_n` rows of a finished run. A run with no successful
    /// symbol sends nothing.
    pub async fn notify_report(&self, report: &BatchReport) -> bool {
        if report.data.is_empty() {
            info!(failed = report.failures.len(), "no symbols analyzed, skipping notification");
            return false;
        }
        self.notify(report.top(self.top_n), &report.date(), report.data.len())
            .await
    }

    /// Returns `true` only when the channel accepted the message.
    pub async fn notify(&self, top: &[SymbolResult], date: &str, total_successful: usize) -> bool {
        let Some(notifier) = &self.notifier else {
            info!("notifications disabled, skipping send");
            return false;
        };

        let message = format_message(top, date, total_successful);
        match notifier.send(&message).await {
            Ok(()) => {
                info!(rows = top.len(), "notification sent");
                true
            }
            Err(e) => {
                error!(error = %e, "failed to send notification");
                false
            }
        }
    }
}

/// Telegram HTML summary of the top-ranked symbols.
pub fn format_message(top: &[SymbolResult], date: &str, total_successful: usize) -> String {
    let mut msg = String::new();

    let _ = writeln!(msg, "📊 <b>Stock OI Analysis - Top {}</b>", top.len());
    let _ = writeln!(msg, "Date: {}", date);
    let _ = writeln!(msg, "Total Stocks: {}", total_successful);
    let _ = writeln!(msg);
    let _ = writeln!(msg, "<b>Top {} by Combined CH_OI:</b>", top.len());
    let _ = writeln!(msg);

    for row in top {
        let _ = writeln!(msg, "<b>{}</b>", escape_html(&row.symbol));
        let _ = writeln!(msg, "  OI: {:+.4} | CH_OI: {:+.4}", row.combined_oi, row.combined_ch_oi);
    }

    let _ = writeln!(msg);
    msg.push_str("Powered by NSE Stock OI Tracker");
    msg
}

/// Escape the characters Telegram's HTML parse mode rejects.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
