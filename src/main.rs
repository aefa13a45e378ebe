use anyhow::Result;
use colored::Colorize;
use nse_oi_tracker::app_config::AppConfig;
use nse_oi_tracker::{commands, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();
    logging::init_logging(&config.log_dir)?;
    config.log_config();

    let mode = config.mode.clone();
    match mode.as_str() {
        "server" => {
            if config.ci {
                println!("{} CI only supports batch mode, running batch instead", "ℹ".blue());
                commands::run_batch(&config).await?;
            } else {
                commands::run_server(config).await?;
            }
        }
        "batch" => commands::run_batch(&config).await?,
        other => {
            eprintln!("Invalid mode '{}'. Use 'batch' or 'server'", other);
            eprintln!("Set NSE_MODE environment variable to control execution mode");
            eprintln!("Examples:");
            eprintln!("  NSE_MODE=batch cargo run                   # Run batch analysis");
            eprintln!("  NSE_MODE=server NSE_PORT=3001 cargo run   # Start API server on port 3001");
            std::process::exit(1);
        }
    }

    Ok(())
}
