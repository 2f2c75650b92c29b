use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rpc_url: String,
    pub chain_id: u64,
    pub chain_name: String,
    pub explorer_url: String,
    pub private_key: Option<String>,
    pub contract_address: String,
    pub ai_api_key: String,
    pub ai_api_base: String,
    pub ai_model: String,
    pub image_model: String,
    pub score_threshold: u32,
}

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            rpc_url: env::var("RPC_URL")
                .unwrap_or_else(|_| "https://ethereum-sepolia-rpc.publicnode.com".to_string()),
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| "11155111".to_string())
                .parse()
                .expect("CHAIN_ID must be a valid number"),
            chain_name: env::var("CHAIN_NAME").unwrap_or_else(|_| "Ethereum Sepolia".to_string()),
            explorer_url: env::var("EXPLORER_URL")
                .unwrap_or_else(|_| "https://sepolia.etherscan.io".to_string()),
            private_key: env::var("PRIVATE_KEY")
                .ok()
                .filter(|k| !k.is_empty() && k != "your_private_key_here"),
            contract_address: env::var("CONTRACT_ADDRESS")
                .unwrap_or_else(|_| ZERO_ADDRESS.to_string()),
            ai_api_key: env::var("AI_API_KEY")
                .or_else(|_| env::var("OPENAI_API_KEY"))
                .unwrap_or_default(),
            ai_api_base: env::var("AI_API_BASE")
                .unwrap_or_else(|_| "https://api.siliconflow.cn/v1".to_string()),
            ai_model: env::var("AI_MODEL")
                .unwrap_or_else(|_| "Qwen/Qwen3-Next-80B-A3B-Instruct".to_string()),
            image_model: env::var("IMAGE_MODEL")
                .unwrap_or_else(|_| "black-forest-labs/FLUX.1-schnell".to_string()),
            score_threshold: env::var("SCORE_THRESHOLD")
                .unwrap_or_else(|_| "85".to_string())
                .parse()
                .expect("SCORE_THRESHOLD must be a valid number"),
        }
    }
}
