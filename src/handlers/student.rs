//! Student-facing read routes: resolve a student and return the joined
//! grade listing.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::server::AppState;
use crate::services::report::{self, GradeReport};
use crate::validation;

/// GET /student/:id - grade report by student id. The id is validated as a
/// positive integer before any store access.
pub async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GradeReport>, ApiError> {
    let id = validation::parse_student_id(&id)?;
    let student = report::find_student_by_id(&state.db, id).await?;
    let body = report::grade_report(&state.db, student).await?;
    Ok(Json(body))
}

/// GET /student/name/:name - grade report by display name. A name shared by
/// more than one student is a 409; use id or email instead.
pub async fn by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GradeReport>, ApiError> {
    let student = report::find_student_by_name(&state.db, &name).await?;
    let body = report::grade_report(&state.db, student).await?;
    Ok(Json(body))
}

/// GET /student/email/:email - grade report by login email
pub async fn by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<GradeReport>, ApiError> {
    let student = report::find_student_by_email(&state.db, &email).await?;
    let body = report::grade_report(&state.db, student).await?;
    Ok(Json(body))
}
