//! Admin student routes: the account listing and the partial-update
//! endpoint behind the account editing view.

use axum::extract::{Path, State};
use axum::Json;

use crate::database::models::Student;
use crate::error::ApiError;
use crate::server::AppState;
use crate::services::admin::{self, StudentPatch, StudentUpdated};

/// GET /admin/students - every student account, as a bare array
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state.db.list_students().await?;
    Ok(Json(students))
}

/// PUT /admin/students/:person_nr - partial update; absent fields keep
/// their stored values
pub async fn update(
    State(state): State<AppState>,
    Path(person_nr): Path<String>,
    Json(patch): Json<StudentPatch>,
) -> Result<Json<StudentUpdated>, ApiError> {
    let body = admin::update_student(&state.db, &person_nr, patch).await?;
    Ok(Json(body))
}
