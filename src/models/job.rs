use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i32,
    pub company_id: i32,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub benefits: Option<String>,
    pub salary: Option<f64>,
    pub location: String,
    pub work_mode: WorkMode,
    pub opened_at: DateTime<Utc>,
    pub closes_at: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Closed,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "work_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    OnSite,
    Remote,
    Hybrid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(range(min = 1))]
    pub company_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 3000))]
    pub requirements: String,
    #[validate(length(max = 2000))]
    pub benefits: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub work_mode: WorkMode,
    pub closes_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 3000))]
    pub requirements: Option<String>,
    #[validate(length(max = 2000))]
    pub benefits: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub closes_at: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}
