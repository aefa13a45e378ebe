pub mod analysis;
pub mod api_server;
pub mod app_config;
pub mod batch;
pub mod commands;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod nse;
pub mod pipeline;
pub mod report;
pub mod universe;
pub mod utility;

// Re-exports for convenience
pub use analysis::analyze;
pub use batch::{BatchOptions, BatchOrchestrator, BatchReport, ChainSource, RunResponse};
pub use models::{OptionType, RawChainEntry, SymbolResult};
pub use nse::NSEClient;
pub use report::{Notifier, Reporter};
