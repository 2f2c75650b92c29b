use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;

const SYSTEM_PROMPT: &str =
    "You are a professional literary critic. Always respond with valid JSON.";

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The rubric-scored result parsed from the model's JSON reply.
/// Field values are taken verbatim from the model; nothing re-checks
/// that `score` actually lands in 0-100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u32,
    #[serde(rename = "metadata_title")]
    pub title: String,
    #[serde(rename = "metadata_description")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

/// Transport/API failures and model-output parse failures surface
/// differently to callers, so keep them apart.
#[derive(Debug)]
pub enum EvalError {
    Api(String),
    Parse(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Api(msg) => write!(f, "AI request failed: {}", msg),
            EvalError::Parse(msg) => write!(f, "AI response parse failed: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

pub fn rubric_prompt(story_text: &str) -> String {
    format!(
        r#"You are a professional literary critic and cultural archivist. Evaluate the
value of the following human story and return the result as JSON.

Scoring rubric (0-100):
- Emotional depth and authenticity (30 points)
- Cultural and historical value (25 points)
- Narrative quality and structure (20 points)
- Originality and uniqueness (15 points)
- Social significance and impact (10 points)

Story:
{}

Return strict JSON only (no markdown formatting):
{{
    "score": [integer 0-100],
    "metadata_title": "[short title, at most 50 characters]",
    "metadata_description": "[description summarizing the story's core value, 100-200 characters]",
    "feedback": "[detailed assessment explaining the score]",
    "image_prompt": "[English text-to-image prompt describing the story's key scene, mood and visual elements, 50-100 characters]"
}}"#,
        story_text
    )
}

/// Models often wrap JSON in ``` fences despite being told not to.
/// Returns the content between the first fence pair, or the trimmed
/// input when no fence is present.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let inner = rest.split("```").next().unwrap_or(rest);
    inner.trim()
}

pub fn parse_evaluation(raw: &str) -> Result<Evaluation, EvalError> {
    serde_json::from_str(strip_code_fences(raw)).map_err(|e| EvalError::Parse(e.to_string()))
}

pub fn should_mint(score: u32, threshold: u32) -> bool {
    score >= threshold
}

/// Score a story via an OpenAI-compatible chat-completion endpoint.
pub async fn evaluate_story(
    http_client: &reqwest::Client,
    config: &Config,
    story_text: &str,
) -> Result<Evaluation, EvalError> {
    let request_body = serde_json::json!({
        "model": config.ai_model,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": rubric_prompt(story_text)}
        ],
        "temperature": 0.7,
        "max_tokens": 800
    });

    let url = format!(
        "{}/chat/completions",
        config.ai_api_base.trim_end_matches('/')
    );
    let response = http_client
        .post(&url)
        .header("Authorization", format!("Bearer {}", config.ai_api_key))
        .json(&request_body)
        .send()
        .await
        .map_err(|e| EvalError::Api(format!("chat completion request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(EvalError::Api(format!("AI API error {}: {}", status, body)));
    }

    let resp_json: serde_json::Value = response
        .json()
        .await
        .map_err(|e| EvalError::Api(format!("failed to read AI response: {}", e)))?;

    let content = resp_json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            EvalError::Api(format!(
                "no message content in AI response: {}",
                serde_json::to_string(&resp_json).unwrap_or_default()
            ))
        })?;

    parse_evaluation(content)
}

/// Same rubric, posted to the Anthropic Messages API instead.
pub async fn evaluate_story_anthropic(
    http_client: &reqwest::Client,
    api_key: &str,
    model: &str,
    story_text: &str,
) -> Result<Evaluation, EvalError> {
    let request_body = serde_json::json!({
        "model": model,
        "max_tokens": 800,
        "system": SYSTEM_PROMPT,
        "messages": [
            {"role": "user", "content": rubric_prompt(story_text)}
        ]
    });

    let response = http_client
        .post(ANTHROPIC_API_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&request_body)
        .send()
        .await
        .map_err(|e| EvalError::Api(format!("Anthropic request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(EvalError::Api(format!(
            "Anthropic API error {}: {}",
            status, body
        )));
    }

    let resp_json: serde_json::Value = response
        .json()
        .await
        .map_err(|e| EvalError::Api(format!("failed to read Anthropic response: {}", e)))?;

    let content = resp_json["content"][0]["text"].as_str().ok_or_else(|| {
        EvalError::Api(format!(
            "no text content in Anthropic response: {}",
            serde_json::to_string(&resp_json).unwrap_or_default()
        ))
    })?;

    parse_evaluation(content)
}
