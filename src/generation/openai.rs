//! OpenAI image synthesis client
//!
//! Asks for exactly one square, natural-style image. The provider may
//! answer with a fetchable URL or inline base64 bytes; both end up as the
//! same raw byte vector for the normalizer.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};

use crate::constants::{IMAGE_REQUEST_SIZE, OPENAI_IMAGES_URL, PROVIDER_TIMEOUT_SECS};
use crate::images::ImageError;

/// What the image provider handed back.
#[derive(Clone, Debug)]
pub enum ImagePayload {
    /// A URL to download the image from.
    Url(String),
    /// Base64-encoded image bytes, possibly wrapped in a data URL.
    Inline(String),
}

/// Seam for the image-synthesis provider so tests can swap in a mock.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Requests one illustrative image for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<ImagePayload, ImageError>;
}

/// OpenAI images API client.
#[derive(Debug)]
pub struct DallEClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl DallEClient {
    /// Creates a client for the given key and model.
    pub fn new(api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            api_key,
            model,
            client,
        }
    }
}

#[derive(Debug, Serialize)]
struct ImagesGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    style: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImagesGenerateResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: Option<String>,
    url: Option<String>,
}

#[async_trait]
impl ImageGenerator for DallEClient {
    async fn generate(&self, prompt: &str) -> Result<ImagePayload, ImageError> {
        let request = ImagesGenerateRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: IMAGE_REQUEST_SIZE,
            style: "natural",
            response_format: "url",
        };

        let response = self
            .client
            .post(OPENAI_IMAGES_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ImageError::Synthesis(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Synthesis(format!(
                "image API returned {status}: {body}"
            )));
        }

        let parsed: ImagesGenerateResponse = response
            .json()
            .await
            .map_err(|err| ImageError::Synthesis(err.to_string()))?;

        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ImageError::Synthesis("no image data returned".to_string()))?;

        if let Some(b64) = first.b64_json {
            Ok(ImagePayload::Inline(b64))
        } else if let Some(url) = first.url {
            Ok(ImagePayload::Url(url))
        } else {
            Err(ImageError::Synthesis(
                "image response missing b64_json and url fields".to_string(),
            ))
        }
    }
}

/// Builds the photography-style prompt for a generated recipe.
pub fn food_photography_prompt(title: &str, cuisine_type: &str, description: &str) -> String {
    format!(
        "Professional food photography of {title}.\n\
         {cuisine_type} cuisine style dish.\n\
         High-quality, realistic, appetizing presentation on a clean white plate.\n\
         Natural lighting, restaurant quality, top-down view.\n\
         Sharp focus on the food with shallow depth of field.\n\
         Garnished beautifully with fresh ingredients.\n\
         Professional chef presentation, magazine quality photo.\n\
         {description}\n\
         No text, no watermarks, no people, just the delicious food."
    )
}

/// Resolves an image payload to raw bytes: downloads URLs, decodes inline
/// base64 (with or without a `data:image/...;base64,` wrapper).
pub async fn fetch_image_bytes(
    client: &reqwest::Client,
    payload: ImagePayload,
) -> Result<Vec<u8>, ImageError> {
    match payload {
        ImagePayload::Url(url) => {
            let response = client
                .get(&url)
                .send()
                .await
                .map_err(|err| ImageError::Download(err.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(ImageError::Download(format!(
                    "image download returned {status}"
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|err| ImageError::Download(err.to_string()))?;
            Ok(bytes.to_vec())
        }
        ImagePayload::Inline(encoded) => {
            let encoded = match encoded.split_once(',') {
                Some((header, rest)) if header.starts_with("data:image/") => rest,
                _ => encoded.as_str(),
            };
            general_purpose::STANDARD
                .decode(encoded)
                .map_err(|err| ImageError::Download(format!("base64 decode failed: {err}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inline_payload_decodes_with_and_without_data_url_wrapper() {
        let client = reqwest::Client::new();
        let raw = b"not really an image";
        let encoded = general_purpose::STANDARD.encode(raw);

        let plain = fetch_image_bytes(&client, ImagePayload::Inline(encoded.clone()))
            .await
            .expect("decode plain base64");
        assert_eq!(plain, raw);

        let wrapped = fetch_image_bytes(
            &client,
            ImagePayload::Inline(format!("data:image/png;base64,{encoded}")),
        )
        .await
        .expect("decode data URL");
        assert_eq!(wrapped, raw);
    }

    #[tokio::test]
    async fn garbage_inline_payload_is_a_download_error() {
        let client = reqwest::Client::new();
        let result = fetch_image_bytes(
            &client,
            ImagePayload::Inline("!!definitely not base64!!".to_string()),
        )
        .await;
        assert!(matches!(result, Err(ImageError::Download(_))));
    }

    #[test]
    fn photography_prompt_carries_recipe_details() {
        let prompt = food_photography_prompt("Lemon Chicken", "Italian", "Bright and simple.");
        assert!(prompt.contains("Professional food photography of Lemon Chicken."));
        assert!(prompt.contains("Italian cuisine style dish."));
        assert!(prompt.contains("Bright and simple."));
        assert!(prompt.contains("No text, no watermarks"));
    }
}
