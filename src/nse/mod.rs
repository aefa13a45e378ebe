pub mod config;
pub mod models;
pub mod nse_client;

pub use models::{ContractInfo, OptionChain};
pub use nse_client::NSEClient;
