use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::{
    models::{
        application::{
            next_identity_revealed, Application, ApplicationListRow, ApplicationStatus,
            SubmitApplicationRequest, UpdateApplicationStatusRequest,
        },
        candidate::Candidate,
        job::{Job, JobStatus},
    },
    services::{
        anonymizer::anonymize_resume,
        redaction::{visible_fields, ApplicationView, FullApplicationView, PublicApplicationView},
    },
    utils::errors::AppError,
    AppState,
};

fn ensure_open_job(job: Option<Job>) -> Result<Job, AppError> {
    match job {
        Some(job) if job.active && job.status == JobStatus::Open => Ok(job),
        _ => Err(AppError::BadRequest(
            "job-invalid",
            "Job not found, inactive or not open".to_string(),
        )),
    }
}

fn ensure_active_candidate(candidate: Option<Candidate>) -> Result<Candidate, AppError> {
    match candidate {
        Some(candidate) if candidate.active => Ok(candidate),
        _ => Err(AppError::BadRequest(
            "candidate-invalid",
            "Candidate not found or inactive".to_string(),
        )),
    }
}

fn ensure_new_application(already_applied: bool) -> Result<(), AppError> {
    if already_applied {
        return Err(AppError::Conflict(
            "duplicate-application",
            "Candidate already applied to this job".to_string(),
        ));
    }
    Ok(())
}

const LIST_QUERY: &str = r#"
    SELECT a.*, j.title AS job_title, c.full_name AS candidate_name
    FROM applications a
    JOIN jobs j ON j.id = a.job_id
    JOIN candidates c ON c.id = a.candidate_id
"#;

pub async fn get_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicApplicationView>>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationListRow>(
        &format!("{} ORDER BY a.submitted_at DESC", LIST_QUERY),
    )
    .fetch_all(&state.db)
    .await?;

    let views = rows
        .iter()
        .map(|row| {
            PublicApplicationView::redact(
                &row.application,
                Some(row.job_title.clone()),
                Some(&row.candidate_name),
            )
        })
        .collect();

    Ok(Json(views))
}

pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PublicApplicationView>, AppError> {
    let row = sqlx::query_as::<_, ApplicationListRow>(&format!("{} WHERE a.id = $1", LIST_QUERY))
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    Ok(Json(PublicApplicationView::redact(
        &row.application,
        Some(row.job_title),
        Some(&row.candidate_name),
    )))
}

/// Applications of one job, best score first.
pub async fn get_applications_by_job(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
) -> Result<Json<Vec<PublicApplicationView>>, AppError> {
    let job_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)")
        .bind(job_id)
        .fetch_one(&state.db)
        .await?;
    if !job_exists {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let rows = sqlx::query_as::<_, ApplicationListRow>(&format!(
        "{} WHERE a.job_id = $1 ORDER BY a.total_score DESC",
        LIST_QUERY
    ))
    .bind(job_id)
    .fetch_all(&state.db)
    .await?;

    let views = rows
        .iter()
        .map(|row| {
            PublicApplicationView::redact(
                &row.application,
                Some(row.job_title.clone()),
                Some(&row.candidate_name),
            )
        })
        .collect();

    Ok(Json(views))
}

/// Full, identity-bearing view. Answers 403 until the identity gate has
/// been opened by a technical approval or an explicit reveal.
pub async fn get_full_application(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FullApplicationView>, AppError> {
    let application =
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let candidate = sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE id = $1")
        .bind(application.candidate_id)
        .fetch_one(&state.db)
        .await?;

    let job_title: Option<String> = sqlx::query_scalar("SELECT title FROM jobs WHERE id = $1")
        .bind(application.job_id)
        .fetch_optional(&state.db)
        .await?;

    match visible_fields(&application, job_title, &candidate) {
        ApplicationView::Full(view) => Ok(Json(view)),
        ApplicationView::Public(_) => Err(AppError::Forbidden(
            "Identity not revealed yet. Approve the technical stage first.".to_string(),
        )),
    }
}

/// Submits a candidate to a job. The anonymized resume is generated here,
/// once, and stored on the application; later profile edits do not touch it.
pub async fn submit_application(
    State(state): State<AppState>,
    Json(payload): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<PublicApplicationView>), AppError> {
    payload.validate()?;

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(payload.job_id)
        .fetch_optional(&state.db)
        .await?;
    let job = ensure_open_job(job)?;

    let candidate = sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE id = $1")
        .bind(payload.candidate_id)
        .fetch_optional(&state.db)
        .await?;
    let candidate = ensure_active_candidate(candidate)?;

    let already_applied: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM applications WHERE job_id = $1 AND candidate_id = $2)",
    )
    .bind(payload.job_id)
    .bind(payload.candidate_id)
    .fetch_one(&state.db)
    .await?;
    ensure_new_application(already_applied)?;

    let anonymized_resume = anonymize_resume(&candidate);

    // The unique index on (job_id, candidate_id) is the final arbiter when
    // two submissions race past the check above.
    let application = sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO applications (job_id, candidate_id, anonymized_resume)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(payload.job_id)
    .bind(payload.candidate_id)
    .bind(&anonymized_resume)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
            "duplicate-application",
            "Candidate already applied to this job".to_string(),
        ),
        other => AppError::from(other),
    })?;

    tracing::info!(
        application_id = application.id,
        job_id = application.job_id,
        "application submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(PublicApplicationView::redact(
            &application,
            Some(job.title),
            None,
        )),
    ))
}

pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateApplicationStatusRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    let new_status: ApplicationStatus = payload.status.parse().map_err(|_| {
        AppError::BadRequest(
            "invalid-status",
            format!(
                "Unknown status '{}'. Use: submitted, under_evaluation, technically_approved, rejected, hired",
                payload.status
            ),
        )
    })?;

    let mut tx = state.db.begin().await?;

    let application = sqlx::query_as::<_, Application>(
        "SELECT * FROM applications WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    if !application.status.can_transition_to(new_status) {
        return Err(AppError::BadRequest(
            "invalid-transition",
            format!(
                "Cannot move from '{}' to '{}'",
                application.status.as_str(),
                new_status.as_str()
            ),
        ));
    }

    let identity_revealed = next_identity_revealed(application.identity_revealed, new_status);

    sqlx::query(
        "UPDATE applications SET status = $1, feedback = $2, identity_revealed = $3 WHERE id = $4",
    )
    .bind(new_status)
    .bind(&payload.feedback)
    .bind(identity_revealed)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        application_id = id,
        status = new_status.as_str(),
        identity_revealed,
        "application status updated"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Opens the identity gate directly, forcing the technical-approval status.
pub async fn reveal_identity(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;

    let exists: Option<i32> =
        sqlx::query_scalar("SELECT id FROM applications WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Application not found".to_string()));
    }

    sqlx::query("UPDATE applications SET identity_revealed = TRUE, status = $1 WHERE id = $2")
        .bind(ApplicationStatus::TechnicallyApproved)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(application_id = id, "candidate identity revealed");

    Ok(StatusCode::NO_CONTENT)
}

/// Physical removal. Answers are deleted explicitly in the same transaction
/// rather than trusting the schema's cascade.
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;

    let exists: Option<i32> =
        sqlx::query_scalar("SELECT id FROM applications WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Application not found".to_string()));
    }

    sqlx::query("DELETE FROM answers WHERE application_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(application_id = id, "application deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::WorkMode;
    use chrono::Utc;

    fn job(active: bool, status: JobStatus) -> Job {
        Job {
            id: 1,
            company_id: 1,
            title: "Backend Engineer".to_string(),
            description: "Build services".to_string(),
            requirements: "Rust".to_string(),
            benefits: None,
            salary: None,
            location: "Remote".to_string(),
            work_mode: WorkMode::Remote,
            opened_at: Utc::now(),
            closes_at: None,
            status,
            active,
        }
    }

    fn candidate(active: bool) -> Candidate {
        Candidate {
            id: 1,
            full_name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            national_id: "12345678901".to_string(),
            birth_date: None,
            gender: None,
            address: None,
            education: None,
            experience: None,
            skills: None,
            resume_url: None,
            registered_at: Utc::now(),
            active,
        }
    }

    #[test]
    fn submission_requires_an_open_active_job() {
        assert!(ensure_open_job(Some(job(true, JobStatus::Open))).is_ok());

        for bad in [
            None,
            Some(job(false, JobStatus::Open)),
            Some(job(true, JobStatus::Closed)),
            Some(job(true, JobStatus::Paused)),
        ] {
            match ensure_open_job(bad) {
                Err(AppError::BadRequest(code, _)) => assert_eq!(code, "job-invalid"),
                other => panic!("expected job-invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn repeat_submission_for_same_job_and_candidate_conflicts() {
        match ensure_new_application(true) {
            Err(AppError::Conflict(code, _)) => assert_eq!(code, "duplicate-application"),
            other => panic!("expected duplicate-application, got {other:?}"),
        }
        assert!(ensure_new_application(false).is_ok());
    }

    #[test]
    fn submission_requires_an_active_candidate() {
        assert!(ensure_active_candidate(Some(candidate(true))).is_ok());

        for bad in [None, Some(candidate(false))] {
            match ensure_active_candidate(bad) {
                Err(AppError::BadRequest(code, _)) => assert_eq!(code, "candidate-invalid"),
                other => panic!("expected candidate-invalid, got {other:?}"),
            }
        }
    }
}
