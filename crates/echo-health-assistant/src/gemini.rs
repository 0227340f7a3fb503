//! Streaming client for the Gemini `streamGenerateContent` endpoint.

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{AssistantError, AssistantResult, ChatModel, TokenSink};
use crate::config::AssistantConfig;
use crate::message::{Message, Role};

pub struct GeminiClient {
    config: AssistantConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: AssistantConfig) -> AssistantResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn stream_chat(
        &self,
        history: &[Message],
        on_token: TokenSink<'_>,
    ) -> AssistantResult<String> {
        let key = self
            .config
            .credential()
            .ok_or(AssistantError::MissingCredential)?;
        let body = GenerateRequest::from_history(history, &self.config);

        debug!(model = %self.config.model, turns = body.contents.len(), "gemini request");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssistantError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            for payload in decoder.push(&chunk?) {
                if append_chunk(&payload, &mut text)? {
                    on_token(&text);
                }
            }
        }
        if let Some(payload) = decoder.finish() {
            if append_chunk(&payload, &mut text)? {
                on_token(&text);
            }
        }

        if text.trim().is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        Ok(text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl<'a> Content<'a> {
    fn new(role: Option<&'static str>, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

impl<'a> GenerateRequest<'a> {
    /// System messages become the system instruction; the conversation starts
    /// at the first user turn, so the seeded welcome message is not sent.
    fn from_history(history: &'a [Message], config: &AssistantConfig) -> Self {
        let system_instruction = history
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| Content::new(None, &m.content));

        let contents = history
            .iter()
            .skip_while(|m| m.role != Role::User)
            .filter_map(|m| match m.role {
                Role::User => Some(Content::new(Some("user"), &m.content)),
                Role::Assistant => Some(Content::new(Some("model"), &m.content)),
                Role::System => None,
            })
            .collect();

        Self {
            system_instruction,
            contents,
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        }
    }
}

#[derive(Deserialize, Default)]
struct GenerateChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ChunkContent>,
}

#[derive(Deserialize)]
struct ChunkContent {
    #[serde(default)]
    parts: Vec<ChunkPart>,
}

#[derive(Deserialize)]
struct ChunkPart {
    text: Option<String>,
}

/// Append the text carried by one streamed JSON chunk. Returns whether
/// anything was added.
fn append_chunk(payload: &str, text: &mut String) -> AssistantResult<bool> {
    let chunk: GenerateChunk = serde_json::from_str(payload)?;
    let before = text.len();
    for candidate in chunk.candidates.iter().take(1) {
        if let Some(content) = &candidate.content {
            for part in &content.parts {
                if let Some(delta) = &part.text {
                    text.push_str(delta);
                }
            }
        }
    }
    Ok(text.len() > before)
}

/// Splits a server-sent-events byte stream into `data:` payloads.
///
/// Bytes are buffered until a full line is available, so multi-byte
/// characters split across network chunks decode correctly.
#[derive(Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(payload) = data_payload(&line) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Payload of a trailing line with no newline, if any.
    fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.buffer);
        data_payload(&line)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let payload = line.trim_end_matches(['\r', '\n']).strip_prefix("data:")?.trim_start();
    if payload.is_empty() || payload == "[DONE]" {
        None
    } else {
        Some(payload.to_string())
    }
}
