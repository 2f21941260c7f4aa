//! Boundary validation: untyped path/body input is checked here once, and
//! rows read back from the store are re-checked before they are echoed to
//! the caller. Checks are total - every violated constraint is reported,
//! not just the first.

use std::collections::HashMap;

use crate::database::models::{Grade, Student};
use crate::error::ApiError;
use crate::services::admin::{NewGrade, StudentPatch};

/// Field name to violation message
pub type FieldErrors = HashMap<String, String>;

pub const MIN_SCHOOL_YEAR: i32 = 1;
pub const MAX_SCHOOL_YEAR: i32 = 3;

/// Parse a path parameter as a positive-integer student id. Fails 422
/// before any store access.
pub fn parse_student_id(raw: &str) -> Result<i32, ApiError> {
    parse_positive_int(raw, "id")
}

/// Parse a path parameter as a positive-integer grade id
pub fn parse_grade_id(raw: &str) -> Result<i32, ApiError> {
    parse_positive_int(raw, "gradeId")
}

/// Parse a school-year path parameter (1-3)
pub fn parse_school_year(raw: &str) -> Result<i32, ApiError> {
    let year = parse_positive_int(raw, "year")?;
    if !school_year_in_range(year) {
        let mut errors = FieldErrors::new();
        errors.insert(
            "year".to_string(),
            format!("must be between {} and {}", MIN_SCHOOL_YEAR, MAX_SCHOOL_YEAR),
        );
        return Err(ApiError::unprocessable_entity(
            "Invalid request parameter",
            errors,
        ));
    }
    Ok(year)
}

fn parse_positive_int(raw: &str, field: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => {
            let mut errors = FieldErrors::new();
            errors.insert(field.to_string(), "must be a positive integer".to_string());
            Err(ApiError::unprocessable_entity(
                "Invalid request parameter",
                errors,
            ))
        }
        Err(_) => {
            let mut errors = FieldErrors::new();
            errors.insert(field.to_string(), format!("not a valid integer: {}", raw));
            Err(ApiError::unprocessable_entity(
                "Invalid request parameter",
                errors,
            ))
        }
    }
}

pub fn school_year_in_range(year: i32) -> bool {
    (MIN_SCHOOL_YEAR..=MAX_SCHOOL_YEAR).contains(&year)
}

/// Swedish personnummer short form: six digits, a dash, four digits
fn is_person_nr(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 11
        && bytes[6] == b'-'
        && bytes[..6].iter().all(u8::is_ascii_digit)
        && bytes[7..].iter().all(u8::is_ascii_digit)
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// Shape check for a stored student row. Run on rows read back from the
/// store before they cross the trust boundary outward; a failure there is
/// schema drift and surfaces as a 500.
pub fn validate_student(student: &Student) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if student.first_name.trim().is_empty() {
        errors.insert("firstName".to_string(), "must not be empty".to_string());
    }
    if student.last_name.trim().is_empty() {
        errors.insert("lastName".to_string(), "must not be empty".to_string());
    }
    if !is_person_nr(&student.person_nr) {
        errors.insert(
            "personNr".to_string(),
            "must match the format NNNNNN-NNNN".to_string(),
        );
    }
    if !school_year_in_range(student.year) {
        errors.insert(
            "year".to_string(),
            format!("must be between {} and {}", MIN_SCHOOL_YEAR, MAX_SCHOOL_YEAR),
        );
    }
    if !looks_like_email(&student.email) {
        errors.insert("email".to_string(), "must be a valid email address".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Shape check for a stored grade row
pub fn validate_grade(grade: &Grade) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if grade.student_id <= 0 {
        errors.insert("studentId".to_string(), "must be a positive integer".to_string());
    }
    if grade.subject_id <= 0 {
        errors.insert("subjectId".to_string(), "must be a positive integer".to_string());
    }
    if !school_year_in_range(grade.year) {
        errors.insert(
            "year".to_string(),
            format!("must be between {} and {}", MIN_SCHOOL_YEAR, MAX_SCHOOL_YEAR),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an admin partial update before it touches the store
pub fn validate_student_patch(patch: &StudentPatch) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    if let Some(first_name) = &patch.first_name {
        if first_name.trim().is_empty() {
            errors.insert("firstName".to_string(), "must not be empty".to_string());
        }
    }
    if let Some(last_name) = &patch.last_name {
        if last_name.trim().is_empty() {
            errors.insert("lastName".to_string(), "must not be empty".to_string());
        }
    }
    if let Some(year) = patch.year {
        if !school_year_in_range(year) {
            errors.insert(
                "year".to_string(),
                format!("must be between {} and {}", MIN_SCHOOL_YEAR, MAX_SCHOOL_YEAR),
            );
        }
    }
    if let Some(email) = &patch.email {
        if !looks_like_email(email) {
            errors.insert("email".to_string(), "must be a valid email address".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity("Invalid update payload", errors))
    }
}

/// Validate a grade-creation request body
pub fn validate_new_grade(body: &NewGrade) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    if body.subject.trim().is_empty() {
        errors.insert("subject".to_string(), "must not be empty".to_string());
    }
    if !school_year_in_range(body.year) {
        errors.insert(
            "year".to_string(),
            format!("must be between {} and {}", MIN_SCHOOL_YEAR, MAX_SCHOOL_YEAR),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity("Invalid grade payload", errors))
    }
}

/// Validate a partial grade update
pub fn validate_grade_patch(patch: &crate::services::admin::GradePatch) -> Result<(), ApiError> {
    if let Some(year) = patch.year {
        if !school_year_in_range(year) {
            let mut errors = FieldErrors::new();
            errors.insert(
                "year".to_string(),
                format!("must be between {} and {}", MIN_SCHOOL_YEAR, MAX_SCHOOL_YEAR),
            );
            return Err(ApiError::unprocessable_entity("Invalid update payload", errors));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::GradeValue;

    fn sample_student() -> Student {
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
    fn parses_positive_ids() {
        assert_eq!(parse_student_id("6").unwrap(), 6);
        assert_eq!(parse_student_id("1").unwrap(), 1);
    }

    #[test]
    fn rejects_negative_zero_and_garbage_ids() {
        assert_eq!(parse_student_id("-1").unwrap_err().status_code(), 422);
        assert_eq!(parse_student_id("0").unwrap_err().status_code(), 422);
        assert_eq!(parse_student_id("abc").unwrap_err().status_code(), 422);
        assert_eq!(parse_student_id("1.5").unwrap_err().status_code(), 422);
    }

    #[test]
    fn school_year_bounds() {
        assert!(parse_school_year("1").is_ok());
        assert!(parse_school_year("3").is_ok());
        assert_eq!(parse_school_year("4").unwrap_err().status_code(), 422);
    }

    #[test]
    fn accepts_well_formed_student() {
        assert!(validate_student(&sample_student()).is_ok());
    }

    #[test]
    fn reports_every_violation_not_just_the_first() {
        let mut student = sample_student();
        student.first_name = String::new();
        student.person_nr = "garbage".to_string();
        student.year = 9;
        student.email = "not-an-email".to_string();

        let errors = validate_student(&student).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains_key("firstName"));
        assert!(errors.contains_key("personNr"));
        assert!(errors.contains_key("year"));
        assert!(errors.contains_key("email"));
    }

    #[test]
    fn person_nr_shape() {
        assert!(is_person_nr("060314-7771"));
        assert!(!is_person_nr("0603147771"));
        assert!(!is_person_nr("060314-777"));
        assert!(!is_person_nr("06031x-7771"));
    }

    #[test]
    fn grade_shape_check_is_total() {
        let grade = Grade {
            id: 1,
            student_id: 0,
            subject_id: -2,
            grade: GradeValue::A,
            year: 7,
        };
        let errors = validate_grade(&grade).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn patch_validation_skips_absent_fields() {
        let patch = StudentPatch {
            phone: Some("0701112233".to_string()),
            ..Default::default()
        };
        assert!(validate_student_patch(&patch).is_ok());
    }

    #[test]
    fn patch_validation_catches_present_bad_fields() {
        let patch = StudentPatch {
            year: Some(0),
            email: Some("nope".to_string()),
            ..Default::default()
        };
        let err = validate_student_patch(&patch).unwrap_err();
        assert_eq!(err.status_code(), 422);
        match err {
            ApiError::UnprocessableEntity { field_errors, .. } => {
                assert_eq!(field_errors.len(), 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
