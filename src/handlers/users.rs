use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::{
    models::{
        company::Company,
        user::{CreateUserRequest, UpdateUserRequest, User, UserResponse},
    },
    utils::errors::AppError,
    AppState,
};

pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn get_users_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<i32>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let company_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM companies WHERE id = $1)")
            .bind(company_id)
            .fetch_one(&state.db)
            .await?;
    if !company_exists {
        return Err(AppError::NotFound("Company not found".to_string()));
    }

    let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE company_id = $1 ORDER BY id")
        .bind(company_id)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
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

    let email_taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&payload.email)
        .fetch_one(&state.db)
        .await?;
    if email_taken {
        return Err(AppError::Conflict(
            "duplicate-email",
            "E-mail already registered".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (company_id, name, email, password, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(payload.company_id)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.password)
    .bind(payload.role.as_deref().unwrap_or("recruiter"))
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
            "duplicate-email",
            "E-mail already registered".to_string(),
        ),
        other => AppError::from(other),
    })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    if let Some(email) = &payload.email {
        let email_taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id != $2)",
        )
        .bind(email)
        .bind(id)
        .fetch_one(&state.db)
        .await?;
        if email_taken {
            return Err(AppError::Conflict(
                "duplicate-email",
                "E-mail already registered by another user".to_string(),
            ));
        }
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($1, name),
            email = COALESCE($2, email),
            password = COALESCE($3, password),
            role = COALESCE($4, role)
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.password)
    .bind(&payload.role)
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("UPDATE users SET active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
