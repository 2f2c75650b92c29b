use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use ethers::prelude::*;
use ethers::utils::format_ether;
use serde::Serialize;

use crate::config::Config;

abigen!(
    MemoryToken,
    r#"[
        function mintToken(address recipient, string tokenURI) external returns (uint256)
    ]"#
);

const MINT_GAS_LIMIT: u64 = 300_000;
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

#[derive(Debug, Clone, Serialize)]
pub struct MintResult {
    pub success: bool,
    pub tx_hash: String,
    pub gas_used: u64,
    pub block_number: u64,
    pub explorer_url: String,
    pub timestamp: String,
}

/// Read-only provider for connectivity checks; works without a wallet key.
pub fn provider(rpc_url: &str) -> Result<Provider<Http>> {
    Provider::<Http>::try_from(rpc_url).with_context(|| format!("invalid rpc url: {rpc_url}"))
}

pub fn explorer_tx_url(explorer_base: &str, tx_hash: &str) -> String {
    format!("{}/tx/{}", explorer_base.trim_end_matches('/'), tx_hash)
}

/// Minimal ABI handed to the frontend, only the function we call.
pub fn minimal_abi() -> serde_json::Value {
    serde_json::json!([
        {
            "inputs": [
                {"internalType": "address", "name": "recipient", "type": "address"},
                {"internalType": "string", "name": "tokenURI", "type": "string"}
            ],
            "name": "mintToken",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "nonpayable",
            "type": "function"
        }
    ])
}

/// Signing client around the MemoryToken contract. The nonce is read
/// just-in-time by the signer middleware, so callers must not submit
/// concurrent mints from the same wallet.
#[derive(Clone)]
pub struct ChainClient {
    client: Arc<SignerClient>,
    contract: MemoryToken<SignerClient>,
    explorer_base: String,
}

impl ChainClient {
    pub fn new(config: &Config) -> Result<Self> {
        let provider = provider(&config.rpc_url)?;

        let private_key = config
            .private_key
            .as_deref()
            .ok_or_else(|| anyhow!("PRIVATE_KEY is not set"))?;
        let wallet: LocalWallet = private_key
            .parse::<LocalWallet>()
            .context("failed parsing PRIVATE_KEY")?
            .with_chain_id(config.chain_id);

        let client = Arc::new(SignerMiddleware::new(provider, wallet));

        let addr: Address = config
            .contract_address
            .parse()
            .context("invalid CONTRACT_ADDRESS")?;
        if addr == Address::zero() {
            return Err(anyhow!(
                "CONTRACT_ADDRESS is zero; deploy the contract and update the env"
            ));
        }

        let contract = MemoryToken::new(addr, client.clone());
        Ok(Self {
            client,
            contract,
            explorer_base: config.explorer_url.clone(),
        })
    }

    pub fn address(&self) -> Address {
        self.client.signer().address()
    }

    pub async fn balance_ether(&self) -> Result<f64> {
        let wei = self
            .client
            .get_balance(self.address(), None)
            .await
            .context("failed reading wallet balance")?;
        Ok(format_ether(wei).parse().unwrap_or(0.0))
    }

    /// Build, sign and broadcast a mintToken call, then wait for the receipt.
    pub async fn mint_token(&self, recipient: Address, token_uri: String) -> Result<MintResult> {
        let gas_price = self
            .client
            .get_gas_price()
            .await
            .context("failed reading gas price")?;

        let call = self
            .contract
            .mint_token(recipient, token_uri)
            .gas(MINT_GAS_LIMIT)
            .gas_price(gas_price)
            .legacy();

        let pending = call.send().await.context("failed sending mintToken tx")?;
        let tx_hash: TxHash = *pending;
        let tx_hash = format!("{:#x}", tx_hash);
        tracing::info!("Mint transaction sent: {}", tx_hash);

        let receipt = tokio::time::timeout(RECEIPT_TIMEOUT, pending)
            .await
            .map_err(|_| anyhow!("timed out waiting for mint receipt"))?
            .context("failed waiting for tx confirmation")?
            .ok_or_else(|| anyhow!("tx dropped from mempool"))?;

        let success = receipt.status == Some(1u64.into());
        if success {
            tracing::info!(
                "Mint confirmed in block {} (gas used: {})",
                receipt.block_number.unwrap_or_default(),
                receipt.gas_used.unwrap_or_default()
            );
        } else {
            tracing::error!("Mint transaction reverted: {}", tx_hash);
        }

        Ok(MintResult {
            success,
            explorer_url: explorer_tx_url(&self.explorer_base, &tx_hash),
            tx_hash,
            gas_used: receipt.gas_used.unwrap_or_default().as_u64(),
            block_number: receipt.block_number.unwrap_or_default().as_u64(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZERO_ADDRESS;

    // Well-known anvil/hardhat dev key, never funded on a live network.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_config() -> Config {
        Config {
            port: 5001,
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 11155111,
            chain_name: "Ethereum Sepolia".to_string(),
            explorer_url: "https://sepolia.etherscan.io".to_string(),
            private_key: Some(DEV_KEY.to_string()),
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            ai_api_key: String::new(),
            ai_api_base: "https://api.siliconflow.cn/v1".to_string(),
            ai_model: "test".to_string(),
            image_model: "test".to_string(),
            score_threshold: 85,
        }
    }

    #[test]
    fn explorer_url_format() {
        assert_eq!(
            explorer_tx_url("https://sepolia.etherscan.io/", "0xabc"),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
    }

    #[test]
    fn client_builds_with_valid_config() {
        let client = ChainClient::new(&test_config()).unwrap();
        assert_eq!(
            format!("{:#x}", client.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn rejects_missing_private_key() {
        let mut config = test_config();
        config.private_key = None;
        assert!(ChainClient::new(&config).is_err());
    }

    #[test]
    fn rejects_zero_contract_address() {
        let mut config = test_config();
        config.contract_address = ZERO_ADDRESS.to_string();
        assert!(ChainClient::new(&config).is_err());
    }

    #[test]
    fn minimal_abi_names_mint_token() {
        let abi = minimal_abi();
        assert_eq!(abi[0]["name"], "mintToken");
        assert_eq!(abi[0]["inputs"][1]["type"], "string");
    }
}
