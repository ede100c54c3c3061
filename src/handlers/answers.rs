use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::{
    models::{
        answer::{Answer, AnswerListRow, AnswerOption, AnswerResponse, RecordAnswerRequest},
        application::{Application, ApplicationStatus},
        question::Question,
        test::Test,
    },
    services::scoring::{grade_answer, recompute_total},
    utils::errors::AppError,
    AppState,
};

fn ensure_active_test(test: Option<Test>) -> Result<Test, AppError> {
    match test {
        None => Err(AppError::NotFound("Test not found".to_string())),
        Some(test) if !test.active => Err(AppError::BadRequest(
            "test-inactive",
            "Test is inactive".to_string(),
        )),
        Some(test) => Ok(test),
    }
}

fn ensure_question_in_test(question: Option<Question>, test_id: i32) -> Result<Question, AppError> {
    match question {
        None => Err(AppError::NotFound("Question not found".to_string())),
        Some(question) if question.test_id != test_id => Err(AppError::BadRequest(
            "question-mismatch",
            "Question does not belong to this test".to_string(),
        )),
        Some(question) => Ok(question),
    }
}

fn ensure_unanswered(already_answered: bool) -> Result<(), AppError> {
    if already_answered {
        return Err(AppError::Conflict(
            "already-answered",
            "This question was already answered in this application".to_string(),
        ));
    }
    Ok(())
}

fn ensure_answer_deleted(rows_affected: u64) -> Result<(), AppError> {
    if rows_affected == 0 {
        // The row vanished between the lookup and the lock.
        return Err(AppError::NotFound("Answer not found".to_string()));
    }
    Ok(())
}

const LIST_QUERY: &str = r#"
    SELECT an.*, q.prompt AS question_prompt
    FROM answers an
    JOIN questions q ON q.id = an.question_id
"#;

fn to_response(row: AnswerListRow) -> AnswerResponse {
    AnswerResponse::from_answer(row.answer, Some(row.question_prompt))
}

pub async fn get_answers(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnswerResponse>>, AppError> {
    let rows = sqlx::query_as::<_, AnswerListRow>(&format!("{} ORDER BY an.id", LIST_QUERY))
        .fetch_all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(to_response).collect()))
}

pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AnswerResponse>, AppError> {
    let row = sqlx::query_as::<_, AnswerListRow>(&format!("{} WHERE an.id = $1", LIST_QUERY))
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Answer not found".to_string()))?;

    Ok(Json(to_response(row)))
}

/// A candidate's recorded answers across all tests of one application,
/// in the order they were given.
pub async fn get_answers_by_application(
    State(state): State<AppState>,
    Path(application_id): Path<i32>,
) -> Result<Json<Vec<AnswerResponse>>, AppError> {
    let application_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM applications WHERE id = $1)")
            .bind(application_id)
            .fetch_one(&state.db)
            .await?;
    if !application_exists {
        return Err(AppError::NotFound("Application not found".to_string()));
    }

    let rows = sqlx::query_as::<_, AnswerListRow>(&format!(
        "{} WHERE an.application_id = $1 ORDER BY an.answered_at",
        LIST_QUERY
    ))
    .bind(application_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(to_response).collect()))
}

pub async fn get_answers_by_test_and_application(
    State(state): State<AppState>,
    Path((test_id, application_id)): Path<(i32, i32)>,
) -> Result<Json<Vec<AnswerResponse>>, AppError> {
    let rows = sqlx::query_as::<_, AnswerListRow>(&format!(
        "{} WHERE an.test_id = $1 AND an.application_id = $2 ORDER BY an.question_id",
        LIST_QUERY
    ))
    .bind(test_id)
    .bind(application_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(to_response).collect()))
}

/// Records and grades one answer, then re-aggregates the application's
/// total score and moves it into evaluation. The whole sequence runs in a
/// single transaction holding a row lock on the application, so two
/// concurrent answers to the same question cannot both slip past the
/// duplicate check.
pub async fn record_answer(
    State(state): State<AppState>,
    Json(payload): Json<RecordAnswerRequest>,
) -> Result<(StatusCode, Json<AnswerResponse>), AppError> {
    payload.validate()?;

    let chosen: AnswerOption = payload.chosen_option.parse().map_err(|_| {
        AppError::BadRequest(
            "invalid-option",
            "Chosen option must be A, B, C or D".to_string(),
        )
    })?;

    let mut tx = state.db.begin().await?;

    let application = sqlx::query_as::<_, Application>(
        "SELECT * FROM applications WHERE id = $1 FOR UPDATE",
    )
    .bind(payload.application_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let test = sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE id = $1")
        .bind(payload.test_id)
        .fetch_optional(&mut *tx)
        .await?;
    let test = ensure_active_test(test)?;

    let question = sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = $1")
        .bind(payload.question_id)
        .fetch_optional(&mut *tx)
        .await?;
    let question = ensure_question_in_test(question, test.id)?;

    let already_answered: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM answers WHERE application_id = $1 AND question_id = $2)",
    )
    .bind(application.id)
    .bind(question.id)
    .fetch_one(&mut *tx)
    .await?;
    ensure_unanswered(already_answered)?;

    let grade = grade_answer(chosen, &question);

    let answer = sqlx::query_as::<_, Answer>(
        r#"
        INSERT INTO answers (application_id, test_id, question_id, chosen_option, is_correct, points_obtained)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(application.id)
    .bind(test.id)
    .bind(question.id)
    .bind(chosen)
    .bind(grade.is_correct)
    .bind(grade.points_obtained)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
            "already-answered",
            "This question was already answered in this application".to_string(),
        ),
        other => AppError::from(other),
    })?;

    let total_score = recompute_total(&mut tx, application.id).await?;

    // Any graded answer moves the application into evaluation.
    sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
        .bind(ApplicationStatus::UnderEvaluation)
        .bind(application.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        application_id = application.id,
        question_id = question.id,
        correct = grade.is_correct,
        total_score,
        "answer recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(AnswerResponse::from_answer(answer, Some(question.prompt))),
    ))
}

/// Removes an answer and re-aggregates the owning application's score,
/// even when that drops it back to zero. The status is left untouched.
pub async fn delete_answer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;

    let answer = sqlx::query_as::<_, Answer>("SELECT * FROM answers WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Answer not found".to_string()))?;

    // Lock the owning application before touching its aggregate.
    sqlx::query("SELECT id FROM applications WHERE id = $1 FOR UPDATE")
        .bind(answer.application_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM answers WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    ensure_answer_deleted(deleted.rows_affected())?;

    let total_score = recompute_total(&mut tx, answer.application_id).await?;

    tx.commit().await?;

    tracing::info!(
        answer_id = id,
        application_id = answer.application_id,
        total_score,
        "answer deleted, score recomputed"
    );

    Ok(StatusCode::NO_CONTENT)
}
