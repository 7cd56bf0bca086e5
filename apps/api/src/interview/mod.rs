// Interview question generation.
// Implements: profile validation, prompt building, streamed completion retrieval.
// All LLM calls go through llm_client, no direct HTTP calls here.

pub mod generator;
pub mod handlers;
pub mod profile;
pub mod prompts;
