//! Gemini API client for live recommendations.
//!
//! Non-streaming `generateContent` only. The service falls back to the
//! mock catalog on any upstream failure, so there is no retry policy
//! here; every error is surfaced as a typed `RecommendError` for the
//! handler to inspect.

use crate::models::{ReaderProfile, RecommendationLists};
use crate::services::extraction::{self, ExtractionError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upstream call timeout; a timeout falls back like any other failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("GEMINI_API_KEY is not set in environment")]
    MissingApiKey,

    #[error("Gemini API error: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode Gemini response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Result of a live call: normalized lists plus the raw model text kept
/// for diagnostics.
#[derive(Debug, Clone)]
pub struct LiveRecommendations {
    pub results: RecommendationLists,
    pub raw_text: String,
}

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            model,
            client,
        }
    }

    /// Ask Gemini for recommendations matching the profile.
    ///
    /// `exclude_titles` and `seed` are accepted for parity with the
    /// request schema but currently inert.
    pub async fn recommend(
        &self,
        profile: &ReaderProfile,
        max_per_category: usize,
        _exclude_titles: &[String],
        _seed: &str,
    ) -> Result<LiveRecommendations, RecommendError> {
        let api_key = self.api_key.as_deref().ok_or(RecommendError::MissingApiKey)?;

        let prompt = build_prompt(profile, max_per_category);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![ContentPart { text: Some(prompt) }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.7),
                max_output_tokens: Some(2048),
                top_p: Some(0.8),
                top_k: Some(40),
            }),
            safety_settings: Some(default_safety_settings()),
        };

        let url = format!(
            "{}/models/{}:generateContent",
            GEMINI_API_BASE, self.model
        );

        tracing::debug!(
            model = %self.model,
            max_per_category,
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RecommendError::Api { status, body });
        }

        let body = response.text().await?;
        let api_response: GenerateContentResponse = serde_json::from_str(&body)?;

        // The whole payload stands in when no text part came back, so
        // extraction still has something to work with.
        let raw_text = api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.clone())
            .unwrap_or(body);

        tracing::debug!(raw_len = raw_text.len(), "Received Gemini raw text");

        let value = extraction::extract_json_from_text(&raw_text)?;
        let results = extraction::normalize(value)?;

        Ok(LiveRecommendations { results, raw_text })
    }
}

fn build_prompt(profile: &ReaderProfile, max_per_category: usize) -> String {
    let entries = profile.truthy_entries();
    let profile_json =
        serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Suggest up to {max_per_category} fiction and nonfiction books for a kid with this profile:\n\
         {profile_json}\n\
         Return the results as a JSON object with 'fiction' and 'nonfiction' arrays. \
         Each book should have: title, author, year, isbn, cover_url, short_description, \
         age_range, why_recommended, tags, and content_warnings."
    )
}

fn default_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category: category.to_string(),
        threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
    })
    .collect()
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<SafetySetting>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
}
