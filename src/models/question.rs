use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::answer::{validate_option_letter, AnswerOption};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub test_id: i32,
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: AnswerOption,
    pub points: f64,
    pub display_order: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(range(min = 1))]
    pub test_id: i32,
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,
    #[validate(length(min = 1, max = 500))]
    pub option_a: String,
    #[validate(length(min = 1, max = 500))]
    pub option_b: String,
    #[validate(length(min = 1, max = 500))]
    pub option_c: String,
    #[validate(length(min = 1, max = 500))]
    pub option_d: String,
    #[validate(custom = "validate_option_letter")]
    pub correct_option: String,
    #[validate(range(min = 1.0, max = 100.0))]
    pub points: Option<f64>,
    #[validate(range(min = 1, max = 1000))]
    pub display_order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub prompt: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_a: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_b: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_c: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_d: Option<String>,
    #[validate(custom = "validate_option_letter")]
    pub correct_option: Option<String>,
    #[validate(range(min = 1.0, max = 100.0))]
    pub points: Option<f64>,
    #[validate(range(min = 1, max = 1000))]
    pub display_order: Option<i32>,
}
