//! LLM Client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the inference API directly.
//! All LLM interactions MUST go through this module.
//!
//! Model: llama-3.3-70b-versatile (hardcoded, sampling parameters are fixed too)

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use reqwest_eventsource::{retry::Never, RequestBuilderExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;
pub mod sse;

/// OpenAI-compatible base URL of the Groq API.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
/// The model used for every completion.
pub const MODEL: &str = "llama-3.3-70b-versatile";
const TEMPERATURE: f32 = 0.2;
const TOP_P: f32 = 1.0;
const MAX_COMPLETION_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication with the LLM API failed: {0}")]
    Unauthorized(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed stream chunk: {0}")]
    MalformedChunk(String),

    #[error("LLM API reported an error mid-stream: {0}")]
    Upstream(String),

    #[error("Request could not be prepared: {0}")]
    InvalidRequest(String),
}

/// One fragment of streamed completion text. The payload may be absent,
/// e.g. on the role-only first delta or the final finish-reason delta.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionChunk {
    pub content: Option<String>,
}

impl CompletionChunk {
    #[cfg(test)]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Returns the payload only when it is present and non-empty.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|text| !text.is_empty())
    }
}

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<CompletionChunk, LlmError>> + Send>>;

/// Source of streamed chat completions. Implemented by [`LlmClient`] and by
/// test doubles.
#[async_trait]
pub trait ChatStreamer: Send + Sync {
    /// Opens one streaming completion for a system persona and a user prompt.
    async fn stream_chat(&self, system: &str, prompt: &str) -> Result<ChunkStream, LlmError>;

    fn model(&self) -> &str {
        MODEL
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<&'a str>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Classifies a rejected status, preferring the API's `{"error":{"message"}}`
/// over the raw body.
pub(crate) fn api_error(status: StatusCode, body: String) -> LlmError {
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized(message),
        _ => LlmError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Streaming chat-completion client for the Groq API.
///
/// Built once at startup and shared read-only; `reqwest::Client` pools
/// connections internally.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            base_url: base_url.into(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatStreamer for LlmClient {
    async fn stream_chat(&self, system: &str, prompt: &str) -> Result<ChunkStream, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            stop: None,
            stream: true,
        };

        debug!(model = MODEL, prompt_len = prompt.len(), "Opening completion stream");

        let mut source = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .eventsource()
            .map_err(|e| LlmError::InvalidRequest(format!("{e:?}")))?;
        // One attempt per submission; failures go straight to the caller.
        source.set_retry_policy(Box::new(Never));

        sse::open_event_stream(source).await
    }
}

/// Drains a completion stream into one string.
///
/// Fragments are appended in arrival order; absent or empty payloads are
/// skipped. The first stream error is returned and any text gathered so far
/// is discarded.
pub async fn collect_completion<S>(mut stream: S) -> Result<String, LlmError>
where
    S: Stream<Item = Result<CompletionChunk, LlmError>> + Unpin,
{
    let mut text = String::new();
    let mut chunks = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        chunks += 1;
        if let Some(fragment) = chunk.content() {
            text.push_str(fragment);
        }
    }

    debug!(chunks, text_len = text.len(), "Completion stream drained");
    Ok(text)
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use futures_util::stream;
    use std::sync::Mutex;

    /// Replays a fixed sequence of stream items and records each request.
    pub struct StubStreamer {
        items: Mutex<Option<Vec<Result<CompletionChunk, LlmError>>>>,
        open_error: Mutex<Option<LlmError>>,
        pub requests: Mutex<Vec<(String, String)>>,
    }

    impl StubStreamer {
        pub fn with_fragments(fragments: &[Option<&str>]) -> Self {
            let items = fragments
                .iter()
                .map(|f| {
                    Ok(CompletionChunk {
                        content: f.map(str::to_string),
                    })
                })
                .collect();
            Self::with_items(items)
        }

        pub fn with_items(items: Vec<Result<CompletionChunk, LlmError>>) -> Self {
            Self {
                items: Mutex::new(Some(items)),
                open_error: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: LlmError) -> Self {
            Self {
                items: Mutex::new(None),
                open_error: Mutex::new(Some(error)),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatStreamer for StubStreamer {
        async fn stream_chat(&self, system: &str, prompt: &str) -> Result<ChunkStream, LlmError> {
            self.requests
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));

            if let Some(error) = self.open_error.lock().unwrap().take() {
                return Err(error);
            }

            let items = self.items.lock().unwrap().take().unwrap_or_default();
            Ok(Box::pin(stream::iter(items)))
        }
    }
}
