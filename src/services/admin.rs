//! Admin mutations: partial updates to students and grades, and the
//! grade-creation flow with its subject-resolution precondition.

use serde::{Deserialize, Serialize};

use crate::database::models::{Grade, GradeValue, Student, SubjectLevel};
use crate::database::Database;
use crate::error::ApiError;
use crate::validation;

/// Partial update for a student, keyed by person number. Absent fields
/// keep their stored values; the person number itself is not editable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub year: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl StudentPatch {
    /// Apply the patch to a stored row. Pure and idempotent: applying the
    /// same patch twice yields the same result.
    pub fn apply(&self, mut student: Student) -> Student {
        if let Some(first_name) = &self.first_name {
            student.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            student.last_name = last_name.clone();
        }
        if let Some(year) = self.year {
            student.year = year;
        }
        if let Some(phone) = &self.phone {
            student.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            student.email = email.clone();
        }
        if let Some(address) = &self.address {
            student.address = address.clone();
        }
        student
    }
}

/// Partial update for a grade, keyed by grade id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GradePatch {
    pub grade: Option<GradeValue>,
    pub year: Option<i32>,
}

impl GradePatch {
    pub fn apply(&self, mut grade: Grade) -> Grade {
        if let Some(value) = self.grade {
            grade.grade = value;
        }
        if let Some(year) = self.year {
            grade.year = year;
        }
        grade
    }
}

/// Grade-creation request: the subject is addressed by (name, level) and
/// must resolve before any row is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewGrade {
    pub subject: String,
    pub level: SubjectLevel,
    pub grade: GradeValue,
    pub year: i32,
}

/// Confirmation body for a student update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdated {
    pub message: String,
    pub updated_student: Student,
}

/// Confirmation body for a grade update or creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeUpdated {
    pub message: String,
    pub updated_grade: Grade,
}

/// Apply a partial update to the student keyed by person number
pub async fn update_student(
    db: &Database,
    person_nr: &str,
    patch: StudentPatch,
) -> Result<StudentUpdated, ApiError> {
    validation::validate_student_patch(&patch)?;

    let current = db
        .student_by_person_nr(person_nr)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let updated = db.update_student(&patch.apply(current)).await?;
    Ok(StudentUpdated {
        message: "Student updated successfully".to_string(),
        updated_student: updated,
    })
}

/// Apply a partial update to the grade keyed by id
pub async fn update_grade(
    db: &Database,
    grade_id: i32,
    patch: GradePatch,
) -> Result<GradeUpdated, ApiError> {
    validation::validate_grade_patch(&patch)?;

    let current = db
        .grade_by_id(grade_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Grade not found"))?;

    let updated = db.update_grade(&patch.apply(current)).await?;
    Ok(GradeUpdated {
        message: "Grade updated successfully".to_string(),
        updated_grade: updated,
    })
}

/// Create a grade for the student keyed by person number. Subject
/// resolution happens first so a missing subject can never leave a
/// dangling foreign key; a duplicate (student, subject, year) is a 409.
pub async fn add_grade(
    db: &Database,
    person_nr: &str,
    body: NewGrade,
) -> Result<GradeUpdated, ApiError> {
    validation::validate_new_grade(&body)?;

    let student = db
        .student_by_person_nr(person_nr)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let subject = db
        .subject_by_name_and_level(&body.subject, body.level)
        .await?
        .ok_or_else(|| ApiError::not_found("Subject not found"))?;

    if db.grade_exists(student.id, subject.id, body.year).await? {
        return Err(ApiError::conflict(format!(
            "Grade already registered for {} in year {}",
            subject.name, body.year
        )));
    }

    let created = db
        .insert_grade(student.id, subject.id, body.grade, body.year)
        .await?;
    Ok(GradeUpdated {
        message: "Grade added successfully".to_string(),
        updated_grade: created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_student() -> Student {
        Student {
            id: 6,
            first_name: "Tina".to_string(),
            last_name: "Nilsson".to_string(),
            person_nr: "060314-7771".to_string(),
            year: 1,
            phone: "0799999999".to_string(),
            email: "tina.nilsson2@school.com".to_string(),
            address: "New Address 123, Stockholm".to_string(),
        }
    }

    #[test]
    fn patch_changes_only_present_fields() {
        let patch = StudentPatch {
            phone: Some("0700000000".to_string()),
            ..Default::default()
        };

        let before = stored_student();
        let after = patch.apply(before.clone());

        assert_eq!(after.phone, "0700000000");
        assert_eq!(after.first_name, before.first_name);
        assert_eq!(after.last_name, before.last_name);
        assert_eq!(after.person_nr, before.person_nr);
        assert_eq!(after.year, before.year);
        assert_eq!(after.email, before.email);
        assert_eq!(after.address, before.address);
    }

    #[test]
    fn patch_application_is_idempotent() {
        let patch = StudentPatch {
            phone: Some("0700000000".to_string()),
            year: Some(2),
            ..Default::default()
        };

        let once = patch.apply(stored_student());
        let twice = patch.apply(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let patch = StudentPatch::default();
        let before = stored_student();
        assert_eq!(patch.apply(before.clone()), before);
    }

    #[test]
    fn grade_patch_keeps_linkage_fields() {
        let patch = GradePatch {
            grade: Some(GradeValue::B),
            year: None,
        };
        let before = Grade {
            id: 12,
            student_id: 6,
            subject_id: 3,
            grade: GradeValue::D,
            year: 1,
        };

        let after = patch.apply(before.clone());
        assert_eq!(after.grade, GradeValue::B);
        assert_eq!(after.year, before.year);
        assert_eq!(after.student_id, before.student_id);
        assert_eq!(after.subject_id, before.subject_id);
        assert_eq!(after.id, before.id);
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        // personNr is the key, not an editable field
        let raw = r#"{"personNr": "111111-1111"}"#;
        assert!(serde_json::from_str::<StudentPatch>(raw).is_err());
    }

    #[test]
    fn new_grade_deserializes_from_admin_form_shape() {
        let raw = r#"{"subject": "Matematik 1b", "level": "A", "grade": "A", "year": 1}"#;
        let body: NewGrade = serde_json::from_str(raw).unwrap();
        assert_eq!(body.level, SubjectLevel::A);
        assert_eq!(body.grade, GradeValue::A);
    }
}
