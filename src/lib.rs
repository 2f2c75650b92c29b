pub mod chain;
pub mod config;
pub mod evaluator;
pub mod handlers;
pub mod image;
pub mod metadata;
pub mod stories;

use ethers::providers::{Http, Provider};

use crate::chain::ChainClient;
use crate::config::Config;

pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub provider: Provider<Http>,
    pub chain: Option<ChainClient>,
    /// Serializes mint submissions; see `handlers::mint`.
    pub mint_lock: tokio::sync::Mutex<()>,
}
