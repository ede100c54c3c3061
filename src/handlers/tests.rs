use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::{
    models::{
        job::Job,
        test::{CreateTestRequest, Test, UpdateTestRequest},
    },
    utils::errors::AppError,
    AppState,
};

pub async fn get_tests(State(state): State<AppState>) -> Result<Json<Vec<Test>>, AppError> {
    let tests = sqlx::query_as::<_, Test>("SELECT * FROM tests ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(tests))
}

pub async fn get_test(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Test>, AppError> {
    let test = sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Test not found".to_string()))?;

    Ok(Json(test))
}

pub async fn get_tests_by_job(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> Result<Json<Vec<Test>>, AppError> {
    let job_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
        .bind(job_id)
        .fetch_one(&state.db)
        .await?;
    if !job_exists {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let tests = sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE job_id = $1 ORDER BY id")
        .bind(job_id)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(tests))
}

pub async fn create_test(
    State(state): State<AppState>,
    Json(payload): Json<CreateTestRequest>,
) -> Result<(StatusCode, Json<Test>), AppError> {
    payload.validate()?;

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(payload.job_id)
        .fetch_optional(&state.db)
        .await?;
    match job {
        Some(job) if job.active => {}
        _ => {
            return Err(AppError::BadRequest(
                "job-invalid",
                "Job not found or inactive".to_string(),
            ))
        }
    }

    let test = sqlx::query_as::<_, Test>(
        r#"
        INSERT INTO tests (job_id, title, description, duration_minutes, weight)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(payload.job_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.duration_minutes.unwrap_or(60))
    .bind(payload.weight.unwrap_or(1.0))
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(test)))
}

pub async fn update_test(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTestRequest>,
) -> Result<Json<Test>, AppError> {
    payload.validate()?;

    let test = sqlx::query_as::<_, Test>(
        r#"
        UPDATE tests
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            duration_minutes = COALESCE($3, duration_minutes),
            weight = COALESCE($4, weight)
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.duration_minutes)
    .bind(payload.weight)
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Test not found".to_string()))?;

    Ok(Json(test))
}

pub async fn delete_test(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("UPDATE tests SET active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Test not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
