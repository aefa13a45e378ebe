use crate::api_server;
use crate::app_config::AppConfig;
use crate::batch::{BatchReport, ChainSource};
use crate::nse::NSEClient;
use crate::pipeline::{self, reporter_from_config};
use crate::utility::Timer;
use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

/// Failed symbols listed before the rest are collapsed.
const FAILED_PREVIEW: usize = 10;

/// Run the batch analysis over the configured symbol universe
pub async fn run_batch(config: &AppConfig) -> Result<()> {
    banner("NSE Stock OI Tracker");

    let timer = Timer::start("batch run");
    let source: Arc<dyn ChainSource> = Arc::new(NSEClient::new()?);
    let reporter = reporter_from_config(config)?;

    println!("{} Loading symbols from {}...", "→".cyan(), config.symbols_path.display());
    let outcome = pipeline::run_pipeline(config, source, &reporter)
        .await
        .context("Failed to load symbol universe")?;
    println!();

    display_batch_summary(&outcome.report, timer.elapsed_secs());
    display_top(&outcome.report, reporter.top_n());

    if reporter.is_enabled() {
        if outcome.telegram_sent {
            println!("{} Telegram notification sent", "✓".green());
        } else {
            println!("{} Telegram notification failed", "✗".red());
        }
    }
    if let Some(path) = &outcome.export_path {
        println!("{} Saved results to {}", "✓".green(), path.display());
    }

    let elapsed = timer.stop();
    println!();
    println!("{} Total execution time: {:.2}s", "⏱".yellow(), elapsed.as_secs_f64());
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Done!".green().bold());
    println!("{}", "=".repeat(60).blue());

    Ok(())
}

/// Run API server mode
pub async fn run_server(config: AppConfig) -> Result<()> {
    banner("NSE Stock OI Tracker API Server");
    api_server::start_server(config).await
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60).blue());
    println!("{}", title.green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();
}

fn display_batch_summary(report: &BatchReport, elapsed_secs: f64) {
    let summary = report.summary();

    println!("{}", "=".repeat(60).blue());
    println!("{}", "Summary".cyan().bold());
    println!("{}", "=".repeat(60).blue());
    println!("{} Date: {}", "ℹ".blue(), report.date());
    println!("{} Successful: {}", "✓".green(), summary.successful);
    println!("{} Failed: {}", "✗".red(), summary.failed);
    if !summary.skipped_symbols.is_empty() {
        println!("{} Not attempted: {}", "⏱".yellow(), summary.skipped_symbols.len());
    }
    println!("{} Time taken: {:.2}s", "⏱".yellow(), elapsed_secs);
    if summary.total_stocks > 0 {
        println!(
            "{} Avg time per symbol: {:.2}s",
            "⏱".yellow(),
            elapsed_secs / summary.total_stocks as f64
        );
    }
    println!();

    if !report.failures.is_empty() {
        println!("{}", "Failed Symbols:".red());
        for failure in report.failures.iter().take(FAILED_PREVIEW) {
            println!(
                "  {} {} → {}",
                "✗".red(),
                failure.symbol.yellow(),
                failure.reason.chars().take(80).collect::<String>()
            );
        }
        if report.failures.len() > FAILED_PREVIEW {
            println!("  ... and {} more", report.failures.len() - FAILED_PREVIEW);
        }
        println!();
    }
}

fn display_top(report: &BatchReport, top_n: usize) {
    let top = report.top(top_n);
    if top.is_empty() {
        println!("{} No symbols analyzed", "ℹ".blue());
        return;
    }

    println!("{}", format!("Top {} by Combined CH_OI:", top.len()).cyan().bold());
    println!(
        "  {:<14} {:>12} {:>12} {:>12}",
        "Symbol", "Underlying", "OI", "CH_OI"
    );
    for row in top {
        println!(
            "  {} {:>12.2} {:>+12.4} {:>+12.4}",
            format!("{:<14}", row.symbol).yellow(),
            row.underlying_value,
            row.combined_oi,
            row.combined_ch_oi
        );
    }
    println!();
}
