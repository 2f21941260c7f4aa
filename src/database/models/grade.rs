use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Letter outcome for a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "grade_value", rename_all = "UPPERCASE")]
pub enum GradeValue {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl GradeValue {
    pub const ALL: [GradeValue; 6] = [
        GradeValue::A,
        GradeValue::B,
        GradeValue::C,
        GradeValue::D,
        GradeValue::E,
        GradeValue::F,
    ];
}

/// A grade record linking a student to a subject for a school year.
/// One row per (student, subject, year); the schema enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i32,
    pub student_id: i32,
    pub subject_id: i32,
    pub grade: GradeValue,
    /// The school year in which the subject was taken
    pub year: i32,
}

/// Denormalized grade row for the admin editing grid: grade joined with its
/// student and subject in one query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GradeRow {
    pub grade_id: i32,
    pub person_nr: String,
    pub first_name: String,
    pub last_name: String,
    pub subject: String,
    pub level: super::SubjectLevel,
    pub grade: GradeValue,
    pub year: i32,
}
