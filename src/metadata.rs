use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

const DATA_URI_PREFIX: &str = "data:application/json;base64,";

/// Story fields the caller hands back to `/api/mint` after evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryMetadata {
    #[serde(rename = "metadata_title", default)]
    pub title: String,
    #[serde(rename = "metadata_description", default)]
    pub description: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_prompt: Option<String>,
}

/// ERC-721 style metadata document inlined into the token URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub trait_type: String,
    pub value: serde_json::Value,
}

pub fn build_token_metadata(story: &StoryMetadata) -> TokenMetadata {
    let mut attributes = vec![
        Attribute {
            trait_type: "Score".to_string(),
            value: serde_json::json!(story.score),
        },
        Attribute {
            trait_type: "Timestamp".to_string(),
            value: serde_json::json!(story.timestamp),
        },
    ];

    if let Some(prompt) = &story.image_prompt {
        attributes.push(Attribute {
            trait_type: "Image Prompt".to_string(),
            value: serde_json::json!(prompt),
        });
    }

    TokenMetadata {
        name: if story.title.is_empty() {
            "Untitled Memory".to_string()
        } else {
            story.title.clone()
        },
        description: story.description.clone(),
        image: story.image_url.clone().unwrap_or_default(),
        attributes,
    }
}

/// Inline the metadata JSON as a base64 `data:` URI, used directly as the
/// on-chain token URI instead of pinning to IPFS.
pub fn encode_token_uri(metadata: &TokenMetadata) -> Result<String, String> {
    let json = serde_json::to_string(metadata)
        .map_err(|e| format!("Failed to serialize token metadata: {}", e))?;
    Ok(format!("{}{}", DATA_URI_PREFIX, BASE64.encode(json)))
}

pub fn decode_token_uri(token_uri: &str) -> Result<TokenMetadata, String> {
    let encoded = token_uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| format!("Not a base64 JSON data URI: {}", token_uri))?;
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| format!("Invalid base64 in token URI: {}", e))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("Invalid JSON in token URI: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_story() -> StoryMetadata {
        StoryMetadata {
            title: "The Night Librarian".to_string(),
            description: "A wartime diary found between history books.".to_string(),
            score: 91,
            timestamp: "2026-08-23T12:00:00Z".to_string(),
            image_url: Some("https://cdn.example.com/night-librarian.png".to_string()),
            image_prompt: Some("an old library at night, a single reading lamp".to_string()),
        }
    }

    #[test]
    fn token_uri_round_trips() {
        let metadata = build_token_metadata(&sample_story());
        let uri = encode_token_uri(&metadata).unwrap();
        assert!(uri.starts_with("data:application/json;base64,"));
        let decoded = decode_token_uri(&uri).unwrap();
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn attributes_carry_score_and_timestamp() {
        let metadata = build_token_metadata(&sample_story());
        assert_eq!(metadata.attributes[0].trait_type, "Score");
        assert_eq!(metadata.attributes[0].value, serde_json::json!(91));
        assert_eq!(metadata.attributes[1].trait_type, "Timestamp");
    }

    #[test]
    fn image_prompt_attribute_only_when_present() {
        let mut story = sample_story();
        assert_eq!(build_token_metadata(&story).attributes.len(), 3);
        story.image_prompt = None;
        assert_eq!(build_token_metadata(&story).attributes.len(), 2);
    }

    #[test]
    fn missing_image_becomes_empty_string() {
        let mut story = sample_story();
        story.image_url = None;
        assert_eq!(build_token_metadata(&story).image, "");
    }

    #[test]
    fn untitled_fallback() {
        let story = StoryMetadata::default();
        assert_eq!(build_token_metadata(&story).name, "Untitled Memory");
    }

    #[test]
    fn rejects_non_data_uri() {
        assert!(decode_token_uri("ipfs://QmExample").is_err());
    }
}
