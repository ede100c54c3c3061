mod handlers;
mod models;
mod services;
mod utils;

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::env;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    handlers::{answers, applications, candidates, companies, jobs, questions, tests, users},
    utils::database::create_pool,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(companies::get_companies))
        .route("/companies", post(companies::create_company))
        .route("/companies/:id", get(companies::get_company))
        .route("/companies/:id", put(companies::update_company))
        .route("/companies/:id", delete(companies::delete_company))
        .route("/companies/:id/users", get(users::get_users_by_company))
        .route("/companies/:id/jobs", get(jobs::get_jobs_by_company))
        .route("/users", get(users::get_users))
        .route("/users", post(users::create_user))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id", put(users::update_user))
        .route("/users/:id", delete(users::delete_user))
        .route("/jobs", get(jobs::get_jobs))
        .route("/jobs", post(jobs::create_job))
        .route("/jobs/:id", get(jobs::get_job))
        .route("/jobs/:id", put(jobs::update_job))
        .route("/jobs/:id", delete(jobs::delete_job))
        .route("/jobs/:id/tests", get(tests::get_tests_by_job))
        .route(
            "/jobs/:id/applications",
            get(applications::get_applications_by_job),
        )
        .route("/candidates", get(candidates::get_candidates))
        .route("/candidates", post(candidates::create_candidate))
        .route("/candidates/:id", get(candidates::get_candidate))
        .route("/candidates/:id", put(candidates::update_candidate))
        .route("/candidates/:id", delete(candidates::delete_candidate))
        .route("/tests", get(tests::get_tests))
        .route("/tests", post(tests::create_test))
        .route("/tests/:id", get(tests::get_test))
        .route("/tests/:id", put(tests::update_test))
        .route("/tests/:id", delete(tests::delete_test))
        .route("/tests/:id/questions", get(questions::get_questions_by_test))
        .route(
            "/tests/:id/applications/:application_id/answers",
            get(answers::get_answers_by_test_and_application),
        )
        .route("/questions", get(questions::get_questions))
        .route("/questions", post(questions::create_question))
        .route("/questions/:id", get(questions::get_question))
        .route("/questions/:id", put(questions::update_question))
        .route("/questions/:id", delete(questions::delete_question))
        .route("/applications", get(applications::get_applications))
        .route("/applications", post(applications::submit_application))
        .route("/applications/:id", get(applications::get_application))
        .route(
            "/applications/:id",
            delete(applications::delete_application),
        )
        .route(
            "/applications/:id/full",
            get(applications::get_full_application),
        )
        .route(
            "/applications/:id/status",
            put(applications::update_application_status),
        )
        .route(
            "/applications/:id/reveal-identity",
            put(applications::reveal_identity),
        )
        .route(
            "/applications/:id/answers",
            get(answers::get_answers_by_application),
        )
        .route("/answers", get(answers::get_answers))
        .route("/answers", post(answers::record_answer))
        .route("/answers/:id", get(answers::get_answer))
        .route("/answers/:id", delete(answers::delete_answer))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fair_hiring_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let db = create_pool(&database_url).await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    let state = AppState { db };

    let cors_origin =
        env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let cors = if cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(HeaderValue::from_static("*"))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
            .allow_origin(cors_origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    };

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", api_routes())
        .layer(cors)
        .with_state(state);

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
