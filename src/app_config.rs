use crate::batch::BatchOptions;
use crate::report::DEFAULT_TOP_N;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

// -----------------------------------------------
// DEFAULTS
// -----------------------------------------------
pub const DEFAULT_MODE: &str = "batch";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_SYMBOLS_FILE: &str = "fno_stock_list.csv";
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Wall-clock budget applied when running under CI.
pub const CI_RUN_BUDGET_SECS: u64 = 750;

/// Notification channel credentials; both values are required.
#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramConfig {
    /// Chat id safe for logs: `***` plus the last four characters.
    pub fn masked_chat_id(&self) -> String {
        let chars: Vec<char> = self.chat_id.chars().collect();
        if chars.len() <= 4 {
            self.chat_id.clone()
        } else {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("***{}", tail)
        }
    }
}

/// Application configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: String,
    pub port: u16,
    pub symbols_path: PathBuf,
    /// `None` disables the dated CSV export. Server mode only exports to an
    /// explicitly configured directory.
    pub output_dir: Option<PathBuf>,
    pub telegram: Option<TelegramConfig>,
    pub top_n: usize,
    pub request_delay: Duration,
    pub max_symbols: Option<usize>,
    pub run_budget: Option<Duration>,
    pub log_dir: PathBuf,
    pub ci: bool,
}

impl AppConfig {
    /// Create new configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let flag = |key: &str| var(key).is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        let ci = var("CI").is_some() || var("GITHUB_ACTIONS").is_some();
        let mode = var("NSE_MODE").unwrap_or_else(|| DEFAULT_MODE.to_string());

        // CI runs server mode as a batch, so it keeps the batch default
        let serving = mode == "server" && !ci;
        let output_dir = if flag("VERCEL") || flag("NSE_SKIP_EXPORT") {
            None
        } else {
            match var("NSE_OUTPUT_DIR") {
                Some(dir) => Some(PathBuf::from(dir)),
                None if serving => None,
                None => Some(PathBuf::from(".")),
            }
        };

        let telegram = match (var("TELEGRAM_BOT_TOKEN"), var("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };

        let run_budget = var("NSE_RUN_BUDGET_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .or(ci.then_some(CI_RUN_BUDGET_SECS))
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            mode,
            port: var("NSE_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            symbols_path: PathBuf::from(
                var("NSE_SYMBOLS_FILE").unwrap_or_else(|| DEFAULT_SYMBOLS_FILE.to_string()),
            ),
            output_dir,
            telegram,
            top_n: var("NSE_TOP_N")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_TOP_N),
            request_delay: Duration::from_millis(
                var("NSE_REQUEST_DELAY_MS")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(0),
            ),
            max_symbols: var("NSE_MAX_SYMBOLS").and_then(|v| v.parse::<usize>().ok()),
            run_budget,
            log_dir: PathBuf::from(var("NSE_LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())),
            ci,
        }
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            request_delay: self.request_delay,
            max_symbols: self.max_symbols,
            budget: self.run_budget,
        }
    }

    /// Print configuration details to the console
    pub fn log_config(&self) {
        if self.ci {
            println!("{}", "Running in CI environment (GitHub Actions)".blue().bold());
        }
        println!("{} Mode: {}", "→".cyan(), self.mode.yellow());
        println!("{} Symbols: {}", "→".cyan(), self.symbols_path.display());
        match &self.telegram {
            Some(tg) => println!("{} Telegram: enabled (chat {})", "→".cyan(), tg.masked_chat_id()),
            None => println!("{} Telegram: disabled (missing bot token or chat ID)", "→".cyan()),
        }
        if let Some(budget) = self.run_budget {
            println!("{} Run budget: {}s", "⏱".yellow(), budget.as_secs());
        }
        println!();
    }
}
