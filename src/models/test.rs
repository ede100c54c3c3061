use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Test {
    pub id: i32,
    pub job_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTestRequest {
    #[validate(range(min = 1))]
    pub job_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0.1, max = 10.0))]
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0.1, max = 10.0))]
    pub weight: Option<f64>,
}
