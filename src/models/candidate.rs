use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub resume_url: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
}

fn validate_national_id(value: &str) -> Result<(), ValidationError> {
    if value.len() == 11 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("national_id"))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCandidateRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(custom = "validate_national_id")]
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub education: Option<String>,
    #[validate(length(max = 2000))]
    pub experience: Option<String>,
    #[validate(length(max = 1000))]
    pub skills: Option<String>,
    #[validate(length(max = 500))]
    pub resume_url: Option<String>,
}

// The national id and registration date are immutable after creation.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCandidateRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub education: Option<String>,
    #[validate(length(max = 2000))]
    pub experience: Option<String>,
    #[validate(length(max = 1000))]
    pub skills: Option<String>,
    #[validate(length(max = 500))]
    pub resume_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_id_must_be_eleven_digits() {
        assert!(validate_national_id("12345678901").is_ok());
        assert!(validate_national_id("1234567890").is_err());
        assert!(validate_national_id("123456789012").is_err());
        assert!(validate_national_id("1234567890a").is_err());
    }
}
