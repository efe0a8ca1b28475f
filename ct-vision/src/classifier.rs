//! This module provides the [`Classifier`] trait and the [`GeminiClassifier`], which asks a hosted
//! multimodal model what the hand in a frame is doing.

use crate::{model_name, parse_hand_response, ApiKey, ClassifyError, HAND_PROMPT};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use ct_hand::HandSample;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, trace};

/// Something that can look at a JPEG frame and classify the hand in it.
///
/// Classifiers run on a single-threaded runtime, so their futures don't need to be `Send`.
#[async_trait(?Send)]
pub trait Classifier {
    /// Classify the hand in the JPEG-encoded frame.
    async fn classify(&self, jpeg: &[u8]) -> Result<HandSample, ClassifyError>;
}

/// Build the `generateContent` request body for the given frame.
pub fn request_body(jpeg: &[u8]) -> Value {
    json!({
        "contents": [{
            "parts": [
                {
                    "inline_data": {
                        "mime_type": "image/jpeg",
                        "data": STANDARD.encode(jpeg),
                    }
                },
                { "text": HAND_PROMPT },
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "status": { "type": "STRING", "enum": ["CHAOS", "FORMED"] },
                    "x": { "type": "NUMBER" },
                    "y": { "type": "NUMBER" },
                },
            },
        },
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extract the model's text from a `generateContent` response body.
pub fn response_text(body: &str) -> Result<String, ClassifyError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(ClassifyError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// A classifier backed by the Gemini `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: ApiKey,
    url: String,
}

impl GeminiClassifier {
    /// Create a classifier using the model from [`model_name`].
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_model(api_key, model_name())
    }

    /// Create a classifier using the given model.
    pub fn with_model(api_key: ApiKey, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            url: format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
            ),
        }
    }
}

#[async_trait(?Send)]
impl Classifier for GeminiClassifier {
    #[instrument(skip_all, fields(jpeg_len = jpeg.len()))]
    async fn classify(&self, jpeg: &[u8]) -> Result<HandSample, ClassifyError> {
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&request_body(jpeg))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(%status, "Classifier request failed");
            return Err(ClassifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response_text(&body)?;
        trace!(%text, "Classifier answered");
        parse_hand_response(&text)
    }
}
