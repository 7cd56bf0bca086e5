//! Axum route handlers for the Interview API.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::{stream, Stream, StreamExt};
use serde::Serialize;
use tracing::error;

use crate::errors::AppError;
use crate::interview::generator::{generate_questions, stream_questions};
use crate::interview::profile::ProfileInput;
use crate::llm_client::ChunkStream;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: String,
    pub model: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/prompt
///
/// Validates the profile and returns the prompt that would be sent, without
/// calling the LLM.
pub async fn handle_preview_prompt(
    Json(profile): Json<ProfileInput>,
) -> Result<Json<PromptResponse>, AppError> {
    let candidate = profile.validate()?;
    Ok(Json(PromptResponse {
        prompt: candidate.prompt(),
    }))
}

/// POST /api/v1/interview/questions
///
/// Validates the profile, builds the prompt, drains the completion stream and
/// returns the full text once the upstream closes.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(profile): Json<ProfileInput>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let candidate = profile.validate()?;
    let questions = generate_questions(state.llm.as_ref(), &candidate).await?;

    Ok(Json(QuestionsResponse {
        questions,
        model: state.llm.model().to_string(),
    }))
}

/// POST /api/v1/interview/questions/stream
///
/// Same as `/questions` but relays every non-empty fragment as an SSE `data`
/// event as it arrives, followed by a `done` event. A failure after the stream
/// opened is sent as a final `error` event.
///
/// Each `data` payload is the fragment as a JSON string, so line breaks
/// (`\r` included) round-trip exactly.
pub async fn handle_stream_questions(
    State(state): State<AppState>,
    Json(profile): Json<ProfileInput>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let candidate = profile.validate()?;
    let chunks = stream_questions(state.llm.as_ref(), &candidate).await?;

    Ok(Sse::new(fragment_events(chunks)).keep_alive(KeepAlive::default()))
}

fn fragment_events(chunks: ChunkStream) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold(Some(chunks), |state| async move {
        let mut chunks = state?;
        loop {
            match chunks.next().await {
                Some(Ok(chunk)) => {
                    if let Some(text) = chunk.content() {
                        return Some((Event::default().json_data(text), Some(chunks)));
                    }
                }
                Some(Err(e)) => {
                    error!("Completion stream failed: {e}");
                    let event = Event::default().event("error").json_data(e.to_string());
                    return Some((event, None));
                }
                None => {
                    return Some((Ok(Event::default().event("done").data("")), None));
                }
            }
        }
    })
}

