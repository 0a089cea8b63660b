//! Gemini API client
//!
//! Talks to the Generative Language REST API: `generateContent` for
//! schema-constrained JSON answers and `streamGenerateContent` (server-sent
//! events) for chat.

use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{Content, LanguageModel, Part, TextStream};
use crate::config::GeminiConfig;
use crate::error::{AppError, AppResult};

/// Client for the Gemini generative model
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

/// Request body shared by `generateContent` and `streamGenerateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

/// Response from `generateContent`, and each event of the streamed variant
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

/// Incremental decoder for `text/event-stream` bodies.
///
/// Bytes may arrive split anywhere, including inside a UTF-8 sequence, so
/// input is buffered as bytes until a full line is available.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    /// Feed a chunk, returning the `data` payload of every completed event
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);

            if line.is_empty() {
                if !self.data_lines.is_empty() {
                    events.push(self.data_lines.join("\n"));
                    self.data_lines.clear();
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data_lines
                    .push(data.strip_prefix(' ').unwrap_or(data).to_string());
            }
            // Comments, event names and ids carry nothing we use
        }

        events
    }

    /// End of body: an unterminated last line and an event missing its
    /// blank-line terminator are still delivered
    pub fn finish(&mut self) -> Vec<String> {
        let mut events = if self.buffer.is_empty() {
            Vec::new()
        } else {
            self.feed(b"\n")
        };
        if !self.data_lines.is_empty() {
            events.push(self.data_lines.join("\n"));
            self.data_lines.clear();
        }
        events
    }
}

/// Decode one streamed event into its text fragment
pub fn parse_stream_event(data: &str) -> AppResult<String> {
    let event: GenerateContentResponse = serde_json::from_str(data)
        .map_err(|e| AppError::ModelResponse(format!("Malformed stream event: {}", e)))?;
    if let Some(reason) = event.block_reason() {
        return Err(AppError::ModelService(format!("Prompt blocked: {}", reason)));
    }
    Ok(event.text())
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: &GeminiConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    fn ensure_api_key(&self) -> AppResult<()> {
        if self.api_key.is_empty() {
            return Err(AppError::Configuration(
                "Gemini API key not configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn post(&self, url: &str, body: &GenerateContentRequest<'_>) -> AppResult<reqwest::Response> {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ModelService(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ModelService(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate_json(&self, prompt: &str, schema: &Value) -> AppResult<String> {
        self.ensure_api_key()?;

        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "generateContent");
        let response = self.post(&self.endpoint("generateContent"), &request).await?;

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ModelResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(reason) = result.block_reason() {
            return Err(AppError::ModelService(format!("Prompt blocked: {}", reason)));
        }

        Ok(result.text())
    }

    async fn stream_chat(
        &self,
        system_instruction: &str,
        contents: Vec<Content>,
    ) -> AppResult<TextStream> {
        self.ensure_api_key()?;

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part::text(system_instruction)],
            }),
            generation_config: None,
        };

        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        tracing::debug!(model = %self.model, turns = request.contents.len(), "streamGenerateContent");
        let response = self.post(&url, &request).await?;

        // `None` marks the end of the body so the decoder can flush
        let fragments = response
            .bytes_stream()
            .map(Some)
            .chain(stream::once(future::ready(None)))
            .scan(SseDecoder::default(), |decoder, chunk| {
                let items: Vec<AppResult<String>> = match chunk {
                    Some(Ok(bytes)) => decoder
                        .feed(&bytes)
                        .iter()
                        .map(|data| parse_stream_event(data))
                        .collect(),
                    Some(Err(e)) => vec![Err(AppError::ModelService(format!(
                        "Stream interrupted: {}",
                        e
                    )))],
                    None => decoder
                        .finish()
                        .iter()
                        .map(|data| parse_stream_event(data))
                        .collect(),
                };
                future::ready(Some(stream::iter(items)))
            })
            .flatten()
            .filter(|item| future::ready(!matches!(item, Ok(text) if text.is_empty())));

        Ok(fragments.boxed())
    }
}
