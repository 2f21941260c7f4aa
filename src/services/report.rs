//! Grade report assembly: resolve a student, fetch their grades, and join
//! each grade with its subject into the flat listing both the student view
//! and the admin view render.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{Grade, GradeValue, Student, Subject, SubjectLevel};
use crate::database::Database;
use crate::error::ApiError;
use crate::validation;

/// One line of the per-student grade listing. Subject fields are `None`
/// when the referenced subject row no longer exists; the entry itself is
/// always kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeEntry {
    pub grade: GradeValue,
    pub year: i32,
    pub subject: Option<String>,
    pub level: Option<SubjectLevel>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response body of the student routes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub student: Student,
    pub grades: Vec<GradeEntry>,
}

/// Resolve a student by unique id, 404 on no match
pub async fn find_student_by_id(db: &Database, id: i32) -> Result<Student, ApiError> {
    db.student_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))
}

/// Resolve a student by unique email, 404 on no match
pub async fn find_student_by_email(db: &Database, email: &str) -> Result<Student, ApiError> {
    db.student_by_email(email)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))
}

/// Resolve a student by display name (first OR last). Name is a convenience
/// key only: a name shared by two students is a 409 rather than a silent
/// first-match, so callers fall back to id or email.
pub async fn find_student_by_name(db: &Database, name: &str) -> Result<Student, ApiError> {
    let mut matches = db.students_by_name(name).await?;
    match matches.len() {
        0 => Err(ApiError::not_found("Student not found")),
        1 => Ok(matches.remove(0)),
        _ => Err(ApiError::conflict(format!(
            "Multiple students match name '{}'; use id or email instead",
            name
        ))),
    }
}

/// Assemble the grade report for an already-resolved student
pub async fn grade_report(db: &Database, student: Student) -> Result<GradeReport, ApiError> {
    // Defensive shape check on the stored row before it is echoed back
    if let Err(field_errors) = validation::validate_student(&student) {
        tracing::error!(
            student_id = student.id,
            ?field_errors,
            "stored student row failed shape validation"
        );
        return Err(ApiError::internal_server_error("Invalid response from server."));
    }

    let grades = db.grades_for_student(student.id).await?;
    for grade in &grades {
        if let Err(field_errors) = validation::validate_grade(grade) {
            tracing::error!(
                grade_id = grade.id,
                ?field_errors,
                "stored grade row failed shape validation"
            );
            return Err(ApiError::internal_server_error("Invalid response from server."));
        }
    }

    let subjects = db.subjects_by_ids(&distinct_subject_ids(&grades)).await?;

    let entries = join_grades(&grades, &subjects);
    Ok(GradeReport {
        student,
        grades: entries,
    })
}

/// Distinct subject ids referenced by a grade set, first-seen order. Keeps
/// the subject fetch at one query for O(distinct subjects) cost.
fn distinct_subject_ids(grades: &[Grade]) -> Vec<i32> {
    let mut seen = HashSet::new();
    grades
        .iter()
        .map(|g| g.subject_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Merge grade rows with their subjects. Emits one entry per grade in the
/// input order; a grade whose subject is missing keeps its row with the
/// subject fields unset.
pub fn join_grades(grades: &[Grade], subjects: &[Subject]) -> Vec<GradeEntry> {
    let by_id: HashMap<i32, &Subject> = subjects.iter().map(|s| (s.id, s)).collect();

    grades
        .iter()
        .map(|g| {
            let subject = by_id.get(&g.subject_id);
            GradeEntry {
                grade: g.grade,
                year: g.year,
                subject: subject.map(|s| s.name.clone()),
                level: subject.map(|s| s.level),
                timestamp: subject.map(|s| s.updated_at),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn subject(id: i32, name: &str, level: SubjectLevel) -> Subject {
        Subject {
            id,
            name: name.to_string(),
            level,
            updated_at: Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
        }
    }

    fn grade(id: i32, subject_id: i32, value: GradeValue, year: i32) -> Grade {
        Grade {
            id,
            student_id: 6,
            subject_id,
            grade: value,
            year,
        }
    }

    #[test]
    fn empty_grades_join_to_empty_listing() {
        assert!(join_grades(&[], &[]).is_empty());
    }

    #[test]
    fn joins_grade_with_its_subject() {
        let subjects = vec![subject(3, "Matematik 1b", SubjectLevel::A)];
        let grades = vec![grade(1, 3, GradeValue::A, 1)];

        let entries = join_grades(&grades, &subjects);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].grade, GradeValue::A);
        assert_eq!(entries[0].year, 1);
        assert_eq!(entries[0].subject.as_deref(), Some("Matematik 1b"));
        assert_eq!(entries[0].level, Some(SubjectLevel::A));
        assert_eq!(entries[0].timestamp, Some(subjects[0].updated_at));
    }

    #[test]
    fn missing_subject_degrades_to_unset_fields() {
        // Grade 2 points at subject 99 which does not exist
        let subjects = vec![subject(3, "Matematik 1b", SubjectLevel::A)];
        let grades = vec![
            grade(1, 3, GradeValue::B, 1),
            grade(2, 99, GradeValue::C, 2),
        ];

        let entries = join_grades(&grades, &subjects);
        assert_eq!(entries.len(), grades.len());
        assert_eq!(entries[1].grade, GradeValue::C);
        assert_eq!(entries[1].subject, None);
        assert_eq!(entries[1].level, None);
        assert_eq!(entries[1].timestamp, None);
    }

    #[test]
    fn listing_preserves_grade_fetch_order() {
        let subjects = vec![
            subject(1, "Svenska 1", SubjectLevel::A),
            subject(2, "Engelska 5", SubjectLevel::A),
        ];
        let grades = vec![
            grade(10, 2, GradeValue::D, 1),
            grade(11, 1, GradeValue::A, 1),
            grade(12, 2, GradeValue::B, 1),
        ];

        let names: Vec<_> = join_grades(&grades, &subjects)
            .into_iter()
            .map(|e| e.subject)
            .collect();
        assert_eq!(
            names,
            vec![
                Some("Engelska 5".to_string()),
                Some("Svenska 1".to_string()),
                Some("Engelska 5".to_string()),
            ]
        );
    }

    #[test]
    fn distinct_ids_are_deduplicated_in_first_seen_order() {
        let grades = vec![
            grade(1, 5, GradeValue::A, 1),
            grade(2, 3, GradeValue::B, 1),
            grade(3, 5, GradeValue::C, 2),
        ];
        assert_eq!(distinct_subject_ids(&grades), vec![5, 3]);
    }

    #[test]
    fn serializes_to_the_frontend_shape() {
        let subjects = vec![subject(3, "Matematik 1b", SubjectLevel::A)];
        let grades = vec![grade(1, 3, GradeValue::A, 1)];

        let entries = join_grades(&grades, &subjects);
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["grade"], "A");
        assert_eq!(json["year"], 1);
        assert_eq!(json["subject"], "Matematik 1b");
        assert_eq!(json["level"], "A");
        assert!(json["timestamp"].is_string());
    }
}
