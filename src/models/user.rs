use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub company_id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(range(min = 1))]
    pub company_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(length(max = 50))]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,
    #[validate(length(max = 50))]
    pub role: Option<String>,
}

/// Response shape for user endpoints. The password column is never
/// serialized back to callers.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub company_id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            company_id: user.company_id,
            name: user.name,
            email: user.email,
            role: user.role,
            registered_at: user.registered_at,
            active: user.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn user_response_never_carries_the_password() {
        let user = User {
            id: 1,
            company_id: 1,
            name: "Recruiter".to_string(),
            email: "recruiter@example.com".to_string(),
            password: "plaintext-secret".to_string(),
            role: "recruiter".to_string(),
            registered_at: Utc::now(),
            active: true,
        };

        let value = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "recruiter@example.com");
    }
}
