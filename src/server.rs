use axum::extract::State;
use axum::routing::get;
use axum::{middleware, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config;
use crate::database::Database;
use crate::handlers;
use crate::middleware::{require_admin, verify_token};

/// Shared router state. The store handle is constructed once at startup and
/// injected here rather than reached through a module-wide singleton, so
/// tests can swap in a scratch database.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Run the API server until shutdown
pub async fn run() -> anyhow::Result<()> {
    let config = config::config();
    tracing::info!("starting gradebook API in {:?} mode", config.environment);

    let db = Database::connect(config)?;
    let app = app(AppState { db });

    // Allow tests or deployments to override port via env
    let port = std::env::var("GRADEBOOK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5001);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("gradebook API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Token-gated student reads
        .merge(student_routes())
        // Token- and role-gated admin routes
        .merge(admin_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn student_routes() -> Router<AppState> {
    use handlers::student;

    Router::new()
        .route("/student/:id", get(student::by_id))
        .route("/student/name/:name", get(student::by_name))
        .route("/student/email/:email", get(student::by_email))
        .route_layer(middleware::from_fn(verify_token))
}

fn admin_routes() -> Router<AppState> {
    use axum::routing::put;
    use handlers::admin::{grades, students};

    Router::new()
        .route("/admin/students", get(students::list))
        .route("/admin/students/:person_nr", put(students::update))
        .route("/admin/grades", get(grades::list))
        .route("/admin/grades/:course/:year", get(grades::list_course_year))
        // PUT edits the grade addressed by id; POST registers a grade for
        // the student addressed by person number
        .route(
            "/admin/grades/:key",
            put(grades::update).post(grades::create),
        )
        // verify_token runs first, then the role gate
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(verify_token))
}

fn cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Gradebook API",
        "version": version,
        "description": "School grade record service",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "student": "/student/:id, /student/name/:name, /student/email/:email (token)",
            "admin_students": "/admin/students[/:personNr] (admin token)",
            "admin_grades": "/admin/grades[/:course/:year | /:gradeId | /:personNr] (admin token)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
