use sqlx::PgConnection;

use crate::models::{answer::AnswerOption, question::Question};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    pub is_correct: bool,
    pub points_obtained: f64,
}

/// Grades a single choice against the question's correct option. Letter
/// normalization happens when the choice is parsed into `AnswerOption`, so
/// grading itself is a plain comparison: full points when correct, zero
/// otherwise.
pub fn grade_answer(chosen: AnswerOption, question: &Question) -> Grade {
    let is_correct = chosen == question.correct_option;
    Grade {
        is_correct,
        points_obtained: if is_correct { question.points } else { 0.0 },
    }
}

/// Total score from the points of the surviving answer rows. An empty set
/// sums to zero, which is how a deletion can drop a score back to nothing.
pub fn total_points(points: &[f64]) -> f64 {
    points.iter().sum()
}

/// Re-aggregates an application's total score from its answer rows and
/// persists the result. Sole writer of `applications.total_score`; called
/// after every answer insert or delete.
pub async fn recompute_total(
    conn: &mut PgConnection,
    application_id: i32,
) -> Result<f64, sqlx::Error> {
    let points: Vec<f64> =
        sqlx::query_scalar("SELECT points_obtained FROM answers WHERE application_id = $1")
            .bind(application_id)
            .fetch_all(&mut *conn)
            .await?;
    let total = total_points(&points);

    sqlx::query("UPDATE applications SET total_score = $1 WHERE id = $2")
        .bind(total)
        .bind(application_id)
        .execute(&mut *conn)
        .await?;

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: AnswerOption, points: f64) -> Question {
        Question {
            id: 1,
            test_id: 1,
            prompt: "What does FK stand for?".to_string(),
            option_a: "Foreign key".to_string(),
            option_b: "Fast key".to_string(),
            option_c: "First key".to_string(),
            option_d: "Full key".to_string(),
            correct_option: correct,
            points,
            display_order: 1,
        }
    }

    #[test]
    fn correct_choice_earns_the_question_points() {
        let grade = grade_answer(AnswerOption::B, &question(AnswerOption::B, 10.0));
        assert!(grade.is_correct);
        assert_eq!(grade.points_obtained, 10.0);
    }

    #[test]
    fn wrong_choice_earns_zero() {
        let grade = grade_answer(AnswerOption::A, &question(AnswerOption::B, 10.0));
        assert!(!grade.is_correct);
        assert_eq!(grade.points_obtained, 0.0);
    }

    #[test]
    fn grading_is_case_insensitive_through_parsing() {
        let q = question(AnswerOption::B, 10.0);
        let lower: AnswerOption = "b".parse().unwrap();
        let upper: AnswerOption = "B".parse().unwrap();

        assert_eq!(grade_answer(lower, &q), grade_answer(upper, &q));
        assert!(grade_answer(lower, &q).is_correct);
        assert_eq!(grade_answer(lower, &q).points_obtained, 10.0);
    }

    #[test]
    fn removing_the_scoring_answer_drops_the_total_back() {
        // A 10-point correct answer and a zero-point wrong one.
        assert_eq!(total_points(&[10.0, 0.0]), 10.0);
        // After the 10-point answer is deleted only the wrong one remains.
        assert_eq!(total_points(&[0.0]), 0.0);
        assert_eq!(total_points(&[]), 0.0);
    }

    #[test]
    fn recomputing_unchanged_answers_yields_the_same_total() {
        let points = [7.5, 10.0, 0.0];
        let first = total_points(&points);
        let second = total_points(&points);
        assert_eq!(first, second);
        assert_eq!(first, 17.5);
    }
}
