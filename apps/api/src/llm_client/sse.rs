//! Event-stream adaptation for the streaming chat-completion body.
//!
//! `reqwest-eventsource` does the SSE framing. This module turns its events
//! into completion chunks: `data: {json}` per delta, `data: [DONE]` at the end.

use futures_util::{stream, StreamExt};
use reqwest_eventsource::{Error as EventSourceError, Event, EventSource};
use serde::Deserialize;
use tracing::warn;

use super::{api_error, ChunkStream, CompletionChunk, LlmError};

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Deserialize)]
struct StreamPayload {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<StreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamErrorBody {
    message: String,
}

#[derive(Debug, PartialEq)]
enum Frame {
    Chunk(CompletionChunk),
    Done,
}

fn parse_payload(data: &str) -> Result<Frame, LlmError> {
    if data.trim() == DONE_SENTINEL {
        return Ok(Frame::Done);
    }

    let payload: StreamPayload = serde_json::from_str(data)
        .map_err(|e| LlmError::MalformedChunk(format!("{e}: {data}")))?;

    if let Some(error) = payload.error {
        return Err(LlmError::Upstream(error.message));
    }

    let content = payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content);

    Ok(Frame::Chunk(CompletionChunk { content }))
}

/// Maps an event-source failure onto `LlmError`. A rejected status reads the
/// response body for the API's own error message.
async fn map_event_error(error: EventSourceError) -> LlmError {
    match error {
        EventSourceError::InvalidStatusCode(status, response) => {
            let body = response.text().await.unwrap_or_default();
            let error = api_error(status, body);
            warn!("LLM API returned {}: {}", status, error);
            error
        }
        EventSourceError::Transport(e) => LlmError::Http(e),
        other => LlmError::MalformedChunk(other.to_string()),
    }
}

/// Waits for the connection to open, then returns the completion chunks.
///
/// Failures before the first event (bad credentials, bad status, unreachable
/// host) are returned directly. The chunk stream ends at `[DONE]` or when the
/// upstream closes; its first error ends it too.
pub async fn open_event_stream(mut source: EventSource) -> Result<ChunkStream, LlmError> {
    match source.next().await {
        Some(Ok(Event::Open)) => {}
        Some(Ok(Event::Message(message))) => {
            return match parse_payload(&message.data) {
                Ok(Frame::Chunk(chunk)) => Ok(Box::pin(
                    stream::iter(std::iter::once(Ok(chunk))).chain(chunks(source)),
                )),
                Ok(Frame::Done) => {
                    source.close();
                    Ok(Box::pin(stream::empty()))
                }
                Err(e) => {
                    source.close();
                    Err(e)
                }
            };
        }
        Some(Err(EventSourceError::StreamEnded)) | None => {
            source.close();
            return Ok(Box::pin(stream::empty()));
        }
        Some(Err(e)) => {
            source.close();
            return Err(map_event_error(e).await);
        }
    }

    Ok(chunks(source))
}

fn chunks(source: EventSource) -> ChunkStream {
    Box::pin(stream::unfold(Some(source), |state| async move {
        let mut source = state?;
        loop {
            match source.next().await {
                Some(Ok(Event::Open)) => continue,
                Some(Ok(Event::Message(message))) => match parse_payload(&message.data) {
                    Ok(Frame::Chunk(chunk)) => return Some((Ok(chunk), Some(source))),
                    Ok(Frame::Done) => {
                        source.close();
                        return None;
                    }
                    Err(e) => {
                        source.close();
                        return Some((Err(e), None));
                    }
                },
                Some(Err(EventSourceError::StreamEnded)) | None => {
                    source.close();
                    return None;
                }
                Some(Err(e)) => {
                    source.close();
                    return Some((Err(map_event_error(e).await), None));
                }
            }
        }
    }))
}
