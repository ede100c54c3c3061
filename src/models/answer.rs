use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: i32,
    pub application_id: i32,
    pub test_id: i32,
    pub question_id: i32,
    pub chosen_option: AnswerOption,
    pub is_correct: bool,
    pub points_obtained: f64,
    pub answered_at: DateTime<Utc>,
}

/// One of the four choices of a multiple-choice question. Parsing is
/// case-insensitive; the stored value is always the uppercase letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "answer_option", rename_all = "UPPERCASE")]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOption::A => "A",
            AnswerOption::B => "B",
            AnswerOption::C => "C",
            AnswerOption::D => "D",
        }
    }
}

impl FromStr for AnswerOption {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AnswerOption::A),
            "B" => Ok(AnswerOption::B),
            "C" => Ok(AnswerOption::C),
            "D" => Ok(AnswerOption::D),
            _ => Err(()),
        }
    }
}

pub fn validate_option_letter(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<AnswerOption>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("option_letter"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordAnswerRequest {
    #[validate(range(min = 1))]
    pub application_id: i32,
    #[validate(range(min = 1))]
    pub test_id: i32,
    #[validate(range(min = 1))]
    pub question_id: i32,
    #[validate(custom = "validate_option_letter")]
    pub chosen_option: String,
}

/// Graded answer as returned to callers. Carries the question prompt for
/// display but never the question's correct option.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub id: i32,
    pub application_id: i32,
    pub test_id: i32,
    pub question_id: i32,
    pub question_prompt: Option<String>,
    pub chosen_option: AnswerOption,
    pub is_correct: bool,
    pub points_obtained: f64,
    pub answered_at: DateTime<Utc>,
}

impl AnswerResponse {
    pub fn from_answer(answer: Answer, question_prompt: Option<String>) -> Self {
        Self {
            id: answer.id,
            application_id: answer.application_id,
            test_id: answer.test_id,
            question_id: answer.question_id,
            question_prompt,
            chosen_option: answer.chosen_option,
            is_correct: answer.is_correct,
            points_obtained: answer.points_obtained,
            answered_at: answer.answered_at,
        }
    }
}

/// An answer row joined with its question prompt.
#[derive(Debug, FromRow)]
pub struct AnswerListRow {
    #[sqlx(flatten)]
    pub answer: Answer,
    pub question_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_parsing_is_case_insensitive() {
        assert_eq!("b".parse(), Ok(AnswerOption::B));
        assert_eq!("B".parse(), Ok(AnswerOption::B));
        assert_eq!(" d ".parse(), Ok(AnswerOption::D));
    }

    #[test]
    fn option_parsing_rejects_anything_outside_a_to_d() {
        assert!("E".parse::<AnswerOption>().is_err());
        assert!("AB".parse::<AnswerOption>().is_err());
        assert!("".parse::<AnswerOption>().is_err());
        assert!("1".parse::<AnswerOption>().is_err());
    }

    #[test]
    fn response_never_includes_a_correct_option_field() {
        let answer = Answer {
            id: 1,
            application_id: 2,
            test_id: 3,
            question_id: 4,
            chosen_option: AnswerOption::C,
            is_correct: true,
            points_obtained: 10.0,
            answered_at: chrono::Utc::now(),
        };
        let value =
            serde_json::to_value(AnswerResponse::from_answer(answer, Some("Q?".into()))).unwrap();
        assert!(value.get("correct_option").is_none());
        assert_eq!(value["chosen_option"], "C");
    }
}
