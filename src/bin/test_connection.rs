//! Environment sanity check: RPC reachability, wallet key, AI API key and
//! contract address. Exits nonzero if anything is misconfigured.

use ethers::providers::Middleware;
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::format_ether;

use digital_archivist::chain;
use digital_archivist::config::{Config, ZERO_ADDRESS};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let mut all_ok = true;

    println!("Test 1: RPC connection");
    println!("  URL: {}", config.rpc_url);
    match chain::provider(&config.rpc_url) {
        Ok(provider) => match provider.get_chainid().await {
            Ok(chain_id) => {
                let chain_id = chain_id.as_u64();
                println!("  OK: chain id {}", chain_id);
                if let Ok(block) = provider.get_block_number().await {
                    println!("  Current block: {}", block);
                }
                if chain_id != config.chain_id {
                    println!(
                        "  WARNING: chain id {} does not match configured {} ({})",
                        chain_id, config.chain_id, config.chain_name
                    );
                }

                match &config.private_key {
                    Some(key) => match key.parse::<LocalWallet>() {
                        Ok(wallet) => {
                            println!();
                            println!("Test 2: wallet");
                            println!("  Address: {:#x}", wallet.address());
                            match provider.get_balance(wallet.address(), None).await {
                                Ok(wei) => println!("  Balance: {} ETH", format_ether(wei)),
                                Err(e) => println!("  Could not read balance: {}", e),
                            }
                        }
                        Err(e) => {
                            println!();
                            println!("Test 2: wallet");
                            println!("  FAIL: PRIVATE_KEY is not a valid key: {}", e);
                            all_ok = false;
                        }
                    },
                    None => {
                        println!();
                        println!("Test 2: wallet");
                        println!("  FAIL: PRIVATE_KEY is not set");
                        all_ok = false;
                    }
                }
            }
            Err(e) => {
                println!("  FAIL: RPC unreachable: {}", e);
                all_ok = false;
            }
        },
        Err(e) => {
            println!("  FAIL: invalid RPC_URL: {:#}", e);
            all_ok = false;
        }
    }

    println!();
    println!("Test 3: AI API key");
    if config.ai_api_key.is_empty() {
        println!("  FAIL: AI_API_KEY is not set");
        all_ok = false;
    } else {
        println!("  OK: model {} via {}", config.ai_model, config.ai_api_base);
    }

    println!();
    println!("Test 4: contract address");
    if config.contract_address == ZERO_ADDRESS {
        println!("  FAIL: CONTRACT_ADDRESS is not set");
        all_ok = false;
    } else {
        println!("  OK: {}", config.contract_address);
    }

    println!();
    if all_ok {
        println!("All checks passed.");
    } else {
        println!("Some checks failed; fix the env configuration above.");
        std::process::exit(1);
    }
}
