//! Admin grade routes: the editing grid listing plus single-grade update
//! and creation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::database::models::GradeRow;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::admin::{self, GradePatch, GradeUpdated, NewGrade};
use crate::validation;

/// GET /admin/grades - all grade rows joined with student and subject
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<GradeRow>>, ApiError> {
    let rows = state.db.grade_rows(None).await?;
    Ok(Json(rows))
}

/// GET /admin/grades/:course/:year - grid rows for one course and year
pub async fn list_course_year(
    State(state): State<AppState>,
    Path((course, year)): Path<(String, String)>,
) -> Result<Json<Vec<GradeRow>>, ApiError> {
    let year = validation::parse_school_year(&year)?;
    let rows = state.db.grade_rows(Some((&course, year))).await?;
    Ok(Json(rows))
}

/// PUT /admin/grades/:grade_id - partial update of one grade
pub async fn update(
    State(state): State<AppState>,
    Path(grade_id): Path<String>,
    Json(patch): Json<GradePatch>,
) -> Result<Json<GradeUpdated>, ApiError> {
    let grade_id = validation::parse_grade_id(&grade_id)?;
    let body = admin::update_grade(&state.db, grade_id, patch).await?;
    Ok(Json(body))
}

/// POST /admin/grades/:person_nr - register a new grade for a student. The
/// subject must resolve by (name, level) before anything is written.
pub async fn create(
    State(state): State<AppState>,
    Path(person_nr): Path<String>,
    Json(body): Json<NewGrade>,
) -> Result<(StatusCode, Json<GradeUpdated>), ApiError> {
    let body = admin::add_grade(&state.db, &person_nr, body).await?;
    Ok((StatusCode::CREATED, Json(body)))
}
