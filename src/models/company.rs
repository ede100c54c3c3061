use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub registry_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
}

fn validate_registry_number(value: &str) -> Result<(), ValidationError> {
    if value.len() == 14 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("registry_number"))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(custom = "validate_registry_number")]
    pub registry_number: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
}

// The registry number and registration date are immutable after creation.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_number_must_be_fourteen_digits() {
        assert!(validate_registry_number("12345678000199").is_ok());
        assert!(validate_registry_number("1234567800019").is_err());
        assert!(validate_registry_number("12345678/0001-99").is_err());
    }
}
