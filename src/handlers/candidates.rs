use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::{
    models::candidate::{Candidate, CreateCandidateRequest, UpdateCandidateRequest},
    utils::errors::AppError,
    AppState,
};

pub async fn get_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let candidates = sqlx::query_as::<_, Candidate>("SELECT * FROM candidates ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(candidates))
}

pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;

    Ok(Json(candidate))
}

pub async fn create_candidate(
    State(state): State<AppState>,
    Json(payload): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    payload.validate()?;

    let national_id_taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM candidates WHERE national_id = $1)",
    )
    .bind(&payload.national_id)
    .fetch_one(&state.db)
    .await?;
    if national_id_taken {
        return Err(AppError::Conflict(
            "duplicate-national-id",
            "National id already registered".to_string(),
        ));
    }

    let email_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM candidates WHERE email = $1)")
            .bind(&payload.email)
            .fetch_one(&state.db)
            .await?;
    if email_taken {
        return Err(AppError::Conflict(
            "duplicate-email",
            "E-mail already registered".to_string(),
        ));
    }

    let candidate = sqlx::query_as::<_, Candidate>(
        r#"
        INSERT INTO candidates (full_name, email, phone, national_id, birth_date, gender,
                                address, education, experience, skills, resume_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.national_id)
    .bind(payload.birth_date)
    .bind(&payload.gender)
    .bind(&payload.address)
    .bind(&payload.education)
    .bind(&payload.experience)
    .bind(&payload.skills)
    .bind(&payload.resume_url)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
            "duplicate-national-id",
            "National id or e-mail already registered".to_string(),
        ),
        other => AppError::from(other),
    })?;

    Ok((StatusCode::CREATED, Json(candidate)))
}

/// Profile edits never touch applications that already exist: the
/// anonymized resume snapshot on each application stays as generated at
/// submission time.
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCandidateRequest>,
) -> Result<Json<Candidate>, AppError> {
    payload.validate()?;

    if let Some(email) = &payload.email {
        let email_taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM candidates WHERE email = $1 AND id != $2)",
        )
        .bind(email)
        .bind(id)
        .fetch_one(&state.db)
        .await?;
        if email_taken {
            return Err(AppError::Conflict(
                "duplicate-email",
                "E-mail already registered by another candidate".to_string(),
            ));
        }
    }

    let candidate = sqlx::query_as::<_, Candidate>(
        r#"
        UPDATE candidates
        SET full_name = COALESCE($1, full_name),
            email = COALESCE($2, email),
            phone = COALESCE($3, phone),
            birth_date = COALESCE($4, birth_date),
            gender = COALESCE($5, gender),
            address = COALESCE($6, address),
            education = COALESCE($7, education),
            experience = COALESCE($8, experience),
            skills = COALESCE($9, skills),
            resume_url = COALESCE($10, resume_url)
        WHERE id = $11
        RETURNING *
        "#,
    )
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.birth_date)
    .bind(&payload.gender)
    .bind(&payload.address)
    .bind(&payload.education)
    .bind(&payload.experience)
    .bind(&payload.skills)
    .bind(&payload.resume_url)
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))?;

    Ok(Json(candidate))
}

pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("UPDATE candidates SET active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Candidate not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
