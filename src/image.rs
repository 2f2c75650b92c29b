use std::time::Duration;

use crate::config::Config;

const IMAGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Generate an illustration for the story via the text-to-image endpoint.
///
/// Returns the first image URL, or `None` on timeout, missing URL, or any
/// other failure. Callers treat image generation as best-effort; the
/// evaluation result stands either way.
pub async fn generate_image(
    config: &Config,
    http_client: &reqwest::Client,
    prompt: &str,
) -> Option<String> {
    let request_body = serde_json::json!({
        "model": config.image_model,
        "prompt": prompt,
        "image_size": "1024x1024",
        "batch_size": 1,
        "num_inference_steps": 20
    });

    tracing::info!("Generating image for prompt: {}", prompt);

    let url = format!(
        "{}/images/generations",
        config.ai_api_base.trim_end_matches('/')
    );
    let response = match http_client
        .post(&url)
        .header("Authorization", format!("Bearer {}", config.ai_api_key))
        .timeout(IMAGE_TIMEOUT)
        .json(&request_body)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) if e.is_timeout() => {
            tracing::warn!("Image generation timed out");
            return None;
        }
        Err(e) => {
            tracing::warn!("Image generation request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Image API error {}: {}", status, body);
        return None;
    }

    let resp_json: serde_json::Value = match response.json().await {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to parse image response: {}", e);
            return None;
        }
    };

    match resp_json["images"][0]["url"].as_str() {
        Some(image_url) => {
            tracing::info!("Image generated: {}", image_url);
            Some(image_url.to_string())
        }
        None => {
            tracing::warn!("No image URL in response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ZERO_ADDRESS};

    fn unreachable_config() -> Config {
        Config {
            port: 5001,
            rpc_url: "http://127.0.0.1:1".to_string(),
            chain_id: 11155111,
            chain_name: "Ethereum Sepolia".to_string(),
            explorer_url: "https://sepolia.etherscan.io".to_string(),
            private_key: None,
            contract_address: ZERO_ADDRESS.to_string(),
            ai_api_key: String::new(),
            ai_api_base: "http://127.0.0.1:1".to_string(),
            ai_model: "test".to_string(),
            image_model: "test".to_string(),
            score_threshold: 85,
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_none_not_error() {
        let http_client = reqwest::Client::new();
        let result =
            generate_image(&unreachable_config(), &http_client, "a village kiln at night").await;
        assert!(result.is_none());
    }
}
