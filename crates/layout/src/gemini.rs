//! Layout classifier backed by the Gemini `generateContent` REST API.

use std::time::Duration;

use allpi_core::Layout;
use async_trait::async_trait;
use serde::Deserialize;

use crate::error::LayoutError;
use crate::json::extract_json_object;
use crate::prompts::{build_batch_prompt, build_item_prompt};
use crate::request::{LayoutDecision, LayoutRequest};
use crate::resolver::LayoutClassifier;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Output budget for a single-item answer (`{layoutStrategy, reason}`).
const ITEM_OUTPUT_TOKENS: u32 = 256;
/// Fixed part of a batch answer's budget.
const BATCH_BASE_OUTPUT_TOKENS: u32 = 256;
/// Per-item part of a batch answer's budget. A `{"id": <40 hex>, "layout": ...}`
/// entry is about 18 tokens.
const BATCH_TOKENS_PER_ITEM: u32 = 40;
const FINISH_MAX_TOKENS: &str = "MAX_TOKENS";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Output-token budget for a batch of `items` decisions.
pub fn batch_output_budget(items: usize) -> u32 {
    let items = u32::try_from(items).unwrap_or(u32::MAX);
    BATCH_BASE_OUTPUT_TOKENS.saturating_add(BATCH_TOKENS_PER_ITEM.saturating_mul(items))
}

pub struct GeminiClassifier {
    client: reqwest::Client,
    url: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiClassifier {
    pub fn new(config: GeminiConfig) -> Result<Self, LayoutError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing client (e.g. the one the tree fetcher uses).
    /// `config.timeout` is applied per request.
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            config.endpoint.trim_end_matches('/'),
            config.model
        );
        Self {
            client,
            url,
            api_key: config.api_key,
            timeout: config.timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one prompt and return the text of the first candidate.
    async fn generate(
        &self,
        prompt: String,
        max_output_tokens: u32,
    ) -> Result<String, LayoutError> {
        let body = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "maxOutputTokens": max_output_tokens,
                "responseMimeType": "application/json"
            }
        });

        let resp = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LayoutError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = resp.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)?;
        parsed.into_text(max_output_tokens)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
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

impl GenerateResponse {
    /// Text of the first candidate. An answer cut off at the token limit is
    /// an error even if some text came back.
    fn into_text(self, max_output_tokens: u32) -> Result<String, LayoutError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(LayoutError::EmptyOutput("no candidates".to_string()));
        };
        if candidate.finish_reason.as_deref() == Some(FINISH_MAX_TOKENS) {
            return Err(LayoutError::OutputTruncated { max_output_tokens });
        }
        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err(LayoutError::EmptyOutput("no candidate text".to_string()));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct BatchOutput {
    #[serde(rename = "itemsWithLayout", alias = "items_with_layout")]
    items_with_layout: Vec<RawDecision>,
}

#[derive(Debug, Deserialize)]
struct RawDecision {
    id: String,
    layout: String,
}

#[derive(Debug, Deserialize)]
struct ItemOutput {
    #[serde(rename = "layoutStrategy", alias = "layout")]
    layout_strategy: String,
    #[serde(default)]
    reason: String,
}

fn parse_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, LayoutError> {
    let json = extract_json_object(text)
        .ok_or_else(|| LayoutError::EmptyOutput("no JSON object in model text".to_string()))?;
    Ok(serde_json::from_str(json)?)
}

/// Parse batch output. Entries with an unrecognised layout are dropped so
/// the caller treats them as undecided.
fn parse_batch(text: &str) -> Result<Vec<LayoutDecision>, LayoutError> {
    let output: BatchOutput = parse_json(text)?;
    Ok(output
        .items_with_layout
        .into_iter()
        .filter_map(|raw| match Layout::parse(&raw.layout) {
            Some(layout) => Some(LayoutDecision::new(raw.id, layout)),
            None => {
                tracing::debug!(item = %raw.id, layout = %raw.layout, "ignoring unknown layout");
                None
            }
        })
        .collect())
}

fn parse_item(item: &LayoutRequest, text: &str) -> Result<LayoutDecision, LayoutError> {
    let output: ItemOutput = parse_json(text)?;
    let layout =
        Layout::parse(&output.layout_strategy).ok_or_else(|| LayoutError::InvalidLayout {
            id: item.id.clone(),
            value: output.layout_strategy.clone(),
        })?;
    tracing::debug!(item = %item.id, %layout, reason = %output.reason, "item layout");
    Ok(LayoutDecision::new(item.id.clone(), layout))
}

#[async_trait]
impl LayoutClassifier for GeminiClassifier {
    async fn classify_batch(
        &self,
        items: &[LayoutRequest],
    ) -> Result<Vec<LayoutDecision>, LayoutError> {
        let budget = batch_output_budget(items.len());
        let text = self.generate(build_batch_prompt(items), budget).await?;
        parse_batch(&text)
    }

    async fn classify_item(&self, item: &LayoutRequest) -> Result<LayoutDecision, LayoutError> {
        let text = self
            .generate(build_item_prompt(item), ITEM_OUTPUT_TOKENS)
            .await?;
        parse_item(item, &text)
    }
}
