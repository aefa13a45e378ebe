use crate::app_config::AppConfig;
use crate::batch::{BatchOrchestrator, BatchReport, ChainSource, RunResponse};
use crate::error::UniverseError;
use crate::export;
use crate::report::{Notifier, Reporter, TelegramNotifier};
use crate::universe;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: BatchReport,
    pub telegram_sent: bool,
    pub export_path: Option<PathBuf>,
}

impl PipelineOutcome {
    pub fn response(&self) -> RunResponse {
        RunResponse::from_report(&self.report, self.telegram_sent)
    }
}

/// Reporter wired to Telegram when both credentials are configured.
pub fn reporter_from_config(config: &AppConfig) -> Result<Reporter> {
    let notifier = match &config.telegram {
        Some(tg) => Some(Arc::new(TelegramNotifier::new(tg.clone())?) as Arc<dyn Notifier>),
        None => None,
    };
    Ok(Reporter::new(notifier, config.top_n))
}

/// Load the universe, analyze every symbol, notify and export.
///
/// Only a universe loading failure aborts the run; per-symbol, notification
/// and export failures are folded into the outcome.
pub async fn run_pipeline(
    config: &AppConfig,
    source: Arc<dyn ChainSource>,
    reporter: &Reporter,
) -> Result<PipelineOutcome, UniverseError> {
    let symbols = universe::load_symbols(&config.symbols_path)?;

    let orchestrator = BatchOrchestrator::new(source, config.batch_options());
    let report = orchestrator.run(&symbols).await;

    let summary = report.summary();
    info!(
        total = summary.total_stocks,
        successful = summary.successful,
        failed = summary.failed,
        skipped = summary.skipped_symbols.len(),
        "batch complete"
    );

    let telegram_sent = reporter.notify_report(&report).await;

    let export_path = match &config.output_dir {
        Some(dir) => export::export_report(&report, dir),
        None => {
            info!("export disabled, skipping CSV");
            None
        }
    };

    Ok(PipelineOutcome {
        report,
        telegram_sent,
        export_path,
    })
}
