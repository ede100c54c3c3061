use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::{
    models::{
        company::Company,
        job::{CreateJobRequest, Job, UpdateJobRequest},
    },
    utils::errors::AppError,
    AppState,
};

pub async fn get_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    let jobs = sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY opened_at DESC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(jobs))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Job>, AppError> {
    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(Json(job))
}

pub async fn get_jobs_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<i32>,
) -> Result<Json<Vec<Job>>, AppError> {
    let company_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM companies WHERE id = $1)")
            .bind(company_id)
            .fetch_one(&state.db)
            .await?;
    if !company_exists {
        return Err(AppError::NotFound("Company not found".to_string()));
    }

    let jobs = sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs WHERE company_id = $1 ORDER BY opened_at DESC",
    )
    .bind(company_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(jobs))
}

pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    payload.validate()?;

    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(payload.company_id)
        .fetch_optional(&state.db)
        .await?;
    match company {
        Some(company) if company.active => {}
        _ => {
            return Err(AppError::BadRequest(
                "company-invalid",
                "Company not found or inactive".to_string(),
            ))
        }
    }

    let job = sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (company_id, title, description, requirements, benefits,
                          salary, location, work_mode, closes_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(payload.company_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.requirements)
    .bind(&payload.benefits)
    .bind(payload.salary)
    .bind(&payload.location)
    .bind(payload.work_mode)
    .bind(payload.closes_at)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<Json<Job>, AppError> {
    payload.validate()?;

    let job = sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            requirements = COALESCE($3, requirements),
            benefits = COALESCE($4, benefits),
            salary = COALESCE($5, salary),
            location = COALESCE($6, location),
            work_mode = COALESCE($7, work_mode),
            closes_at = COALESCE($8, closes_at),
            status = COALESCE($9, status)
        WHERE id = $10
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.requirements)
    .bind(&payload.benefits)
    .bind(payload.salary)
    .bind(&payload.location)
    .bind(payload.work_mode)
    .bind(payload.closes_at)
    .bind(payload.status)
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(Json(job))
}

pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("UPDATE jobs SET active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
