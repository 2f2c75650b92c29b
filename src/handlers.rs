use actix_web::{HttpResponse, web};
use ethers::providers::Middleware;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::chain;
use crate::evaluator::{self, EvalError, Evaluation};
use crate::image;
use crate::metadata::{self, StoryMetadata};
use crate::stories;

const MIN_STORY_CHARS: usize = 50;

#[derive(Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub story_text: String,
}

#[derive(Serialize)]
struct EvaluateResponse {
    #[serde(flatten)]
    evaluation: Evaluation,
    timestamp: String,
    should_mint: bool,
    /// Absent when the model gave no image prompt; explicit `null` when
    /// it did but generation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<Option<String>>,
}

#[derive(Deserialize)]
pub struct MintRequest {
    #[serde(default)]
    pub metadata: StoryMetadata,
}

fn error_json(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "error": message.into() })
}

/// Input gate for `/api/evaluate`; runs before any outbound call.
fn validate_story(story_text: &str) -> Result<&str, String> {
    let trimmed = story_text.trim();
    if trimmed.is_empty() {
        return Err("Story text must not be empty".to_string());
    }
    if trimmed.chars().count() < MIN_STORY_CHARS {
        return Err(format!(
            "Story is too short; at least {} characters required",
            MIN_STORY_CHARS
        ));
    }
    Ok(trimmed)
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../static/index.html"))
}

/// RPC connectivity plus wallet info when a key is configured. A dead RPC
/// endpoint reports `web3_connected: false` instead of an error.
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    let mut body = serde_json::json!({
        "web3_connected": false,
        "contract_address": state.config.contract_address,
        "threshold": state.config.score_threshold,
    });

    match state.provider.get_chainid().await {
        Ok(chain_id) => {
            body["web3_connected"] = serde_json::json!(true);
            body["chain_id"] = serde_json::json!(chain_id.as_u64());
            if let Ok(block) = state.provider.get_block_number().await {
                body["block_number"] = serde_json::json!(block.as_u64());
            }
            if let Some(chain) = &state.chain {
                body["agent_address"] = serde_json::json!(format!("{:#x}", chain.address()));
                match chain.balance_ether().await {
                    Ok(balance) => body["balance"] = serde_json::json!(balance),
                    Err(e) => body["wallet_error"] = serde_json::json!(format!("{:#}", e)),
                }
            }
        }
        Err(e) => {
            tracing::warn!("RPC connectivity check failed: {}", e);
        }
    }

    HttpResponse::Ok().json(body)
}

pub async fn evaluate(
    state: web::Data<AppState>,
    body: web::Json<EvaluateRequest>,
) -> HttpResponse {
    let story_text = match validate_story(&body.story_text) {
        Ok(text) => text,
        Err(msg) => return HttpResponse::BadRequest().json(error_json(msg)),
    };

    let evaluation =
        match evaluator::evaluate_story(&state.http_client, &state.config, story_text).await {
            Ok(eval) => eval,
            Err(e @ EvalError::Parse(_)) => {
                tracing::error!("{}", e);
                return HttpResponse::InternalServerError().json(error_json(e.to_string()));
            }
            Err(e) => {
                tracing::error!("Evaluation failed: {}", e);
                return HttpResponse::InternalServerError()
                    .json(error_json(format!("Evaluation failed: {}", e)));
            }
        };

    tracing::info!(
        "Story scored {}/100: {}",
        evaluation.score,
        evaluation.title
    );

    let should_mint = evaluator::should_mint(evaluation.score, state.config.score_threshold);

    // Best effort; a failed image never fails the evaluation.
    let image_url = match &evaluation.image_prompt {
        Some(prompt) => {
            Some(image::generate_image(&state.config, &state.http_client, prompt).await)
        }
        None => None,
    };

    HttpResponse::Ok().json(EvaluateResponse {
        evaluation,
        timestamp: chrono::Utc::now().to_rfc3339(),
        should_mint,
        image_url,
    })
}

pub async fn mint(state: web::Data<AppState>, body: web::Json<MintRequest>) -> HttpResponse {
    let story = &body.metadata;
    if story.title.is_empty() || story.description.is_empty() {
        return HttpResponse::BadRequest().json(error_json("Metadata is incomplete"));
    }

    let Some(chain) = &state.chain else {
        return HttpResponse::InternalServerError().json(error_json(
            "Minting is not configured: set PRIVATE_KEY and CONTRACT_ADDRESS",
        ));
    };

    let token_metadata = metadata::build_token_metadata(story);
    let token_uri = match metadata::encode_token_uri(&token_metadata) {
        Ok(uri) => uri,
        Err(e) => return HttpResponse::InternalServerError().json(error_json(e)),
    };

    tracing::info!(
        "Minting \"{}\" (score {}, token URI {} chars)",
        story.title,
        story.score,
        token_uri.len()
    );

    // One mint at a time: the wallet nonce is read just-in-time, so
    // concurrent submissions from the same key would collide.
    let _guard = state.mint_lock.lock().await;

    match chain.mint_token(chain.address(), token_uri).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            tracing::error!("Mint failed: {:#}", e);
            HttpResponse::InternalServerError().json(error_json(format!("Mint failed: {:#}", e)))
        }
    }
}

pub async fn contract_config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "address": state.config.contract_address,
        "abi": chain::minimal_abi(),
        "chain_id": state.config.chain_id,
        "chain_name": state.config.chain_name,
    }))
}

pub async fn examples() -> HttpResponse {
    HttpResponse::Ok().json(stories::EXAMPLE_STORIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_story_is_rejected() {
        assert!(validate_story("").is_err());
        assert!(validate_story("   \n\t  ").is_err());
    }

    #[test]
    fn short_story_is_rejected() {
        let err = validate_story("Once upon a time.").unwrap_err();
        assert!(err.contains("50"));
    }

    #[test]
    fn length_is_counted_in_characters_not_bytes() {
        // 49 CJK characters: well over 50 bytes but still too short.
        let story = "火".repeat(49);
        assert!(validate_story(&story).is_err());
        let story = "火".repeat(50);
        assert!(validate_story(&story).is_ok());
    }

    fn sample_evaluation(image_prompt: Option<&str>) -> Evaluation {
        Evaluation {
            score: 92,
            title: "The Potter's Last Kiln".to_string(),
            description: "An elderly potter fires his final work.".to_string(),
            feedback: None,
            image_prompt: image_prompt.map(str::to_string),
        }
    }

    #[test]
    fn image_url_key_absent_without_image_prompt() {
        let response = EvaluateResponse {
            evaluation: sample_evaluation(None),
            timestamp: "2026-08-23T12:00:00Z".to_string(),
            should_mint: true,
            image_url: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("image_url").is_none());
        assert_eq!(json["metadata_title"], "The Potter's Last Kiln");
    }

    #[test]
    fn failed_image_serializes_as_explicit_null() {
        let response = EvaluateResponse {
            evaluation: sample_evaluation(Some("a glowing kiln at night")),
            timestamp: "2026-08-23T12:00:00Z".to_string(),
            should_mint: true,
            image_url: Some(None),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["image_url"], serde_json::Value::Null);
    }

    #[test]
    fn valid_story_is_trimmed() {
        let story = format!("  {}  ", "a meaningful story about a village potter and his kiln");
        assert_eq!(
            validate_story(&story).unwrap(),
            "a meaningful story about a village potter and his kiln"
        );
    }
}
