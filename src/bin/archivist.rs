//! Manual evaluate -> decide -> mint run against an OpenAI-compatible API.
//! Pass the story text as arguments, or run with none to use the sample.

use anyhow::Result;
use chrono::Utc;

use digital_archivist::chain::ChainClient;
use digital_archivist::config::Config;
use digital_archivist::{evaluator, metadata};

const SAMPLE_STORY: &str = "In an old village lived an elderly master potter. He had spent a \
lifetime shaping clay into vessels, firing his memories into every piece. His hands were \
covered in cracks, like the texture of the jars he threw. On a rainy night he lit his kiln \
for the last time, and in the firelight he saw his whole life. When the villagers found him \
the next morning, the jars had finished firing, smooth and warm as jade, and the old man sat \
beside them with a contented smile, as if he himself had become his final work.";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let http_client = reqwest::Client::new();

    let story = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let story = if story.trim().is_empty() {
        SAMPLE_STORY.to_string()
    } else {
        story
    };

    println!("=== Digital Archivist Agent ===");
    println!("AI model: {} via {}", config.ai_model, config.ai_api_base);
    println!();
    println!(
        "Evaluating story ({} characters)...",
        story.chars().count()
    );

    let evaluation = evaluator::evaluate_story(&http_client, &config, &story).await?;

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
