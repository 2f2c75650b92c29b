//! Same evaluate -> decide -> mint flow as `archivist`, backed by the
//! Anthropic Messages API instead of an OpenAI-compatible endpoint.
//! Requires ANTHROPIC_API_KEY; ANTHROPIC_MODEL overrides the default model.

use std::env;

use anyhow::{Context, Result};
use chrono::Utc;

use digital_archivist::chain::ChainClient;
use digital_archivist::config::Config;
use digital_archivist::{evaluator, metadata};

const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

const SAMPLE_STORY: &str = "In the old quarter of the city stands a library over a hundred \
years old. Every night after closing, the watchman walks the aisles between the shelves. One \
night he found a yellowed diary wedged between two heavy history volumes, left by a young \
librarian who, during the war, risked her life moving rare books to safety. Its last page \
read: knowledge is humanity's most precious wealth, worth guarding with our lives.";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let http_client = reqwest::Client::new();

    let api_key = env::var("ANTHROPIC_API_KEY").context("ANTHROPIC_API_KEY must be set")?;
    let model = env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let story = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let story = if story.trim().is_empty() {
        SAMPLE_STORY.to_string()
    } else {
        story
    };

    println!("=== Digital Archivist Agent (Claude) ===");
    println!("AI model: {}", model);
    println!();
    println!(
        "Evaluating story ({} characters)...",
        story.chars().count()
    );

    let evaluation =
        evaluator::evaluate_story_anthropic(&http_client, &api_key, &model, &story).await?;

    println!();
    println!("Score: {}/100", evaluation.score);
    println!("Title: {}", evaluation.title);
    println!("Description: {}", evaluation.description);
    if let Some(feedback) = &evaluation.feedback {
        println!("Feedback: {}", feedback);
    }

    println!();
    if !evaluator::should_mint(evaluation.score, config.score_threshold) {
        println!(
            "Score {} is below the threshold of {}; not minting.",
            evaluation.score, config.score_threshold
        );
        return Ok(());
    }

    println!(
        "Score {} >= threshold {}; minting Memory Token NFT...",
        evaluation.score, config.score_threshold
    );

    let chain = ChainClient::new(&config)?;
    println!("Agent wallet: {:#x}", chain.address());

    let story_metadata = metadata::StoryMetadata {
        title: evaluation.title.clone(),
        description: evaluation.description.clone(),
        score: evaluation.score,
        timestamp: Utc::now().to_rfc3339(),
        image_url: None,
        image_prompt: evaluation.image_prompt.clone(),
    };
    let token_uri = metadata::encode_token_uri(&metadata::build_token_metadata(&story_metadata))
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("Token URI: {} characters", token_uri.len());

    let result = chain.mint_token(chain.address(), token_uri).await?;

    println!();
    if result.success {
        println!("Mint confirmed!");
        println!("  Tx hash:  {}", result.tx_hash);
        println!("  Gas used: {}", result.gas_used);
        println!("  Block:    {}", result.block_number);
        println!("  Explorer: {}", result.explorer_url);
    } else {
        println!("Mint transaction reverted: {}", result.tx_hash);
        std::process::exit(1);
    }

    Ok(())
}
