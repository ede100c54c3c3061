use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::{
    models::company::{Company, CreateCompanyRequest, UpdateCompanyRequest},
    utils::errors::AppError,
    AppState,
};

pub async fn get_companies(State(state): State<AppState>) -> Result<Json<Vec<Company>>, AppError> {
    let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(companies))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Company>, AppError> {
    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(Json(company))
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    payload.validate()?;

    let registry_taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM companies WHERE registry_number = $1)",
    )
    .bind(&payload.registry_number)
    .fetch_one(&state.db)
    .await?;
    if registry_taken {
        return Err(AppError::Conflict(
            "duplicate-registry-number",
            "Registry number already in use".to_string(),
        ));
    }

    let company = sqlx::query_as::<_, Company>(
        r#"
        INSERT INTO companies (name, registry_number, email, phone, address)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.registry_number)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.address)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
            "duplicate-registry-number",
            "Registry number already in use".to_string(),
        ),
        other => AppError::from(other),
    })?;

    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Result<Json<Company>, AppError> {
    payload.validate()?;

    let company = sqlx::query_as::<_, Company>(
        r#"
        UPDATE companies
        SET name = COALESCE($1, name),
            email = COALESCE($2, email),
            phone = COALESCE($3, phone),
            address = COALESCE($4, address)
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.address)
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(Json(company))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("UPDATE companies SET active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Company not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
