//! Candidate profile submitted with the form, and its validation rules.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::interview::prompts::build_interview_prompt;

const PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill all fields before generating the questions.")]
    MissingFields,

    #[error("Phone number must be 10 digits")]
    InvalidPhone,

    #[error("Years of experience cannot be negative")]
    NegativeExperience,
}

/// Raw form submission. Every field is optional on the wire; absent or `null`
/// strings deserialize as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    pub years_of_experience: Option<i64>,
    #[serde(deserialize_with = "null_as_empty")]
    pub desired_positions: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub current_location: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub tech_stack: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The subset of a validated profile that drives prompt construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub full_name: String,
    pub years_of_experience: u64,
    pub desired_positions: String,
    pub tech_stack: String,
}

impl Candidate {
    pub fn prompt(&self) -> String {
        build_interview_prompt(
            &self.full_name,
            self.years_of_experience,
            &self.desired_positions,
            &self.tech_stack,
        )
    }
}

impl ProfileInput {
    /// Runs the form checks in order: phone format first, then required fields.
    pub fn validate(&self) -> Result<Candidate, ValidationError> {
        validate_phone(&self.phone)?;
        validate_required(self)
    }
}

/// An empty phone passes. Otherwise it must be exactly ten ASCII digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Ok(());
    }
    if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Name, desired positions, tech stack and experience must all be present.
/// Any non-empty string counts as present, whitespace included.
pub fn validate_required(profile: &ProfileInput) -> Result<Candidate, ValidationError> {
    if profile.full_name.is_empty()
        || profile.desired_positions.is_empty()
        || profile.tech_stack.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }
    let years = profile
        .years_of_experience
        .ok_or(ValidationError::MissingFields)?;

    let years_of_experience =
        u64::try_from(years).map_err(|_| ValidationError::NegativeExperience)?;

    Ok(Candidate {
        full_name: profile.full_name.clone(),
        years_of_experience,
        desired_positions: profile.desired_positions.clone(),
        tech_stack: profile.tech_stack.clone(),
    })
}
