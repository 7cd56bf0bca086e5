// All LLM prompt text for the interview module.
// The system persona is shared and lives in llm_client::prompts.

/// Fixed instruction block appended after the candidate details.
pub const QUESTION_INSTRUCTIONS: &str = "Generate 15 interview questions based on the overall \
    experience level and skill set, not skill-wise. Format the questions as follows:\n\
    1.\n\n\
    2.\n\n\
    3.\n\n\
    ...\n\
    15.";

/// Builds the interview-question prompt for one candidate.
///
/// Pure and deterministic: the same inputs always give the same bytes, and any
/// input (empty strings included) yields a well-formed prompt.
pub fn build_interview_prompt(
    full_name: &str,
    years_of_experience: u64,
    desired_positions: &str,
    tech_stack: &str,
) -> String {
    format!(
        "Generate an AI/ML interview prompt based on the following details:\n\
         Name: {full_name}\n\
         Experience: {years_of_experience} year(s)\n\
         Desired Positions: {desired_positions}\n\
         Tech Stack: {tech_stack}\n\n\
         {QUESTION_INSTRUCTIONS}"
    )
}
