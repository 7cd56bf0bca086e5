// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Assistant persona sent as the system message on every completion.
pub const ASSISTANT_SYSTEM: &str = "You are a helpful assistant.";
