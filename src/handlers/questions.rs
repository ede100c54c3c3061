use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::{
    models::{
        answer::AnswerOption,
        question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
        test::Test,
    },
    utils::errors::AppError,
    AppState,
};

fn parse_option(value: &str) -> Result<AnswerOption, AppError> {
    value.parse().map_err(|_| {
        AppError::BadRequest(
            "invalid-option",
            "Correct option must be A, B, C or D".to_string(),
        )
    })
}

pub async fn get_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Question>>, AppError> {
    let questions = sqlx::query_as::<_, Question>("SELECT * FROM questions ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(questions))
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Question>, AppError> {
    let question = sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

pub async fn get_questions_by_test(
    State(state): State<AppState>,
    Path(test_id): Path<i32>,
) -> Result<Json<Vec<Question>>, AppError> {
    let test_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tests WHERE id = $1)")
        .bind(test_id)
        .fetch_one(&state.db)
        .await?;
    if !test_exists {
        return Err(AppError::NotFound("Test not found".to_string()));
    }

    let questions = sqlx::query_as::<_, Question>(
        "SELECT * FROM questions WHERE test_id = $1 ORDER BY display_order",
    )
    .bind(test_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(questions))
}

pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    payload.validate()?;

    let test = sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE id = $1")
        .bind(payload.test_id)
        .fetch_optional(&state.db)
        .await?;
    match test {
        Some(test) if test.active => {}
        _ => {
            return Err(AppError::BadRequest(
                "test-invalid",
                "Test not found or inactive".to_string(),
            ))
        }
    }

    // Parsing normalizes the letter to uppercase before it is stored.
    let correct_option = parse_option(&payload.correct_option)?;

    let question = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (test_id, prompt, option_a, option_b, option_c, option_d,
                               correct_option, points, display_order)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(payload.test_id)
    .bind(&payload.prompt)
    .bind(&payload.option_a)
    .bind(&payload.option_b)
    .bind(&payload.option_c)
    .bind(&payload.option_d)
    .bind(correct_option)
    .bind(payload.points.unwrap_or(10.0))
    .bind(payload.display_order.unwrap_or(1))
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    payload.validate()?;

    let correct_option = match payload.correct_option.as_deref() {
        Some(value) => Some(parse_option(value)?),
        None => None,
    };

    let question = sqlx::query_as::<_, Question>(
        r#"
        UPDATE questions
        SET prompt = COALESCE($1, prompt),
            option_a = COALESCE($2, option_a),
            option_b = COALESCE($3, option_b),
            option_c = COALESCE($4, option_c),
            option_d = COALESCE($5, option_d),
            correct_option = COALESCE($6, correct_option),
            points = COALESCE($7, points),
            display_order = COALESCE($8, display_order)
        WHERE id = $9
        RETURNING *
        "#,
    )
    .bind(&payload.prompt)
    .bind(&payload.option_a)
    .bind(&payload.option_b)
    .bind(&payload.option_c)
    .bind(&payload.option_d)
    .bind(correct_option)
    .bind(payload.points)
    .bind(payload.display_order)
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Hard delete. Fails with a conflict if answers still reference the
/// question.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
