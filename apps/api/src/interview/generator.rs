//! Question generator: candidate → prompt → streamed completion → text.

use tracing::info;

use crate::interview::profile::Candidate;
use crate::llm_client::prompts::ASSISTANT_SYSTEM;
use crate::llm_client::{collect_completion, ChatStreamer, ChunkStream, LlmError};

/// Opens the completion stream for a candidate without draining it.
pub async fn stream_questions(
    llm: &dyn ChatStreamer,
    candidate: &Candidate,
) -> Result<ChunkStream, LlmError> {
    let prompt = candidate.prompt();
    info!(
        model = llm.model(),
        prompt_len = prompt.len(),
        "Requesting interview questions"
    );
    llm.stream_chat(ASSISTANT_SYSTEM, &prompt).await
}

/// Generates the interview questions for a candidate, blocking until the
/// upstream stream has been fully drained.
pub async fn generate_questions(
    llm: &dyn ChatStreamer,
    candidate: &Candidate,
) -> Result<String, LlmError> {
    let stream = stream_questions(llm, candidate).await?;
    let questions = collect_completion(stream).await?;
    info!(questions_len = questions.len(), "Interview questions generated");
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubStreamer;
    use crate::llm_client::CompletionChunk;

    fn jane() -> Candidate {
        Candidate {
            full_name: "Jane Doe".to_string(),
            years_of_experience: 3,
            desired_positions: "ML Engineer".to_string(),
            tech_stack: "Python, PyTorch".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_concatenates_fragments() {
        let llm = StubStreamer::with_fragments(&[Some("1. What is..."), Some("\n\n2. Explain...")]);
        let questions = generate_questions(&llm, &jane()).await.unwrap();
        assert_eq!(questions, "1. What is...\n\n2. Explain...");

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (system, prompt) = &requests[0];
        assert_eq!(system, "You are a helpful assistant.");
        assert!(prompt.contains("Experience: 3 year(s)"));
        assert!(prompt.contains("Name: Jane Doe"));
    }

    #[tokio::test]
    async fn test_generate_skips_absent_and_empty_fragments() {
        let llm = StubStreamer::with_fragments(&[Some("A"), Some(""), None, Some("BC"), Some("D")]);
        assert_eq!(generate_questions(&llm, &jane()).await.unwrap(), "ABCD");
    }

    #[tokio::test]
    async fn test_generate_empty_stream() {
        let llm = StubStreamer::with_fragments(&[]);
        assert_eq!(generate_questions(&llm, &jane()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_generate_propagates_open_failure() {
        let llm = StubStreamer::failing(LlmError::Unauthorized("Invalid API Key".to_string()));
        let err = generate_questions(&llm, &jane()).await.unwrap_err();
        assert!(matches!(err, LlmError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_generate_discards_partial_text_on_stream_error() {
        let llm = StubStreamer::with_items(vec![
            Ok(CompletionChunk::text("1. What")),
            Err(LlmError::Upstream("stream interrupted".to_string())),
        ]);
        let err = generate_questions(&llm, &jane()).await.unwrap_err();
        assert!(matches!(err, LlmError::Upstream(_)));
    }
}
