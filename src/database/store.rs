use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::database::models::{Grade, GradeRow, GradeValue, Student, Subject, SubjectLevel};

/// Errors surfaced by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Handle to the record store. Explicitly constructed at startup and passed
/// down through router state so tests can point it at a scratch database.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Build a lazily-connecting pool from `DATABASE_URL`. No connection is
    /// attempted until the first query, so the server can boot and report a
    /// degraded `/health` while the database is down.
    pub fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| sqlx::Error::Configuration("DATABASE_URL is not set".into()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
            .connect_lazy(&url)?;

        info!("database pool configured");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (CLI commands that build their own)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the store to ensure connectivity
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ---- students ----

    pub async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>("SELECT * FROM students ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    pub async fn student_by_id(&self, id: i32) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    pub async fn student_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    pub async fn student_by_person_nr(
        &self,
        person_nr: &str,
    ) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE person_nr = $1")
            .bind(person_nr)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    /// Display-name lookup, matching on first OR last name. Two rows are
    /// enough to tell "unique" from "ambiguous"; the caller decides what an
    /// ambiguous match means.
    pub async fn students_by_name(&self, name: &str) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE first_name = $1 OR last_name = $1 ORDER BY id LIMIT 2",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    /// Write a full student row back, keyed by person number. Returns the
    /// stored row so callers echo exactly what the store holds.
    pub async fn update_student(&self, student: &Student) -> Result<Student, StoreError> {
        let updated = sqlx::query_as::<_, Student>(
            "UPDATE students \
             SET first_name = $1, last_name = $2, year = $3, phone = $4, email = $5, address = $6 \
             WHERE person_nr = $7 \
             RETURNING *",
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(student.year)
        .bind(&student.phone)
        .bind(&student.email)
        .bind(&student.address)
        .bind(&student.person_nr)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Student not found".to_string()))?;
        Ok(updated)
    }

    pub async fn insert_student(
        &self,
        first_name: &str,
        last_name: &str,
        person_nr: &str,
        year: i32,
        phone: &str,
        email: &str,
        address: &str,
    ) -> Result<Student, StoreError> {
        let student = sqlx::query_as::<_, Student>(
            "INSERT INTO students (first_name, last_name, person_nr, year, phone, email, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (person_nr) DO UPDATE SET person_nr = EXCLUDED.person_nr \
             RETURNING *",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(person_nr)
        .bind(year)
        .bind(phone)
        .bind(email)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;
        Ok(student)
    }

    // ---- subjects ----

    pub async fn list_subjects(&self) -> Result<Vec<Subject>, StoreError> {
        let subjects = sqlx::query_as::<_, Subject>("SELECT * FROM subjects ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(subjects)
    }

    /// Batched subject lookup for the join: one query regardless of how many
    /// grades reference the subjects.
    pub async fn subjects_by_ids(&self, ids: &[i32]) -> Result<Vec<Subject>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let subjects =
            sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(subjects)
    }

    pub async fn subject_by_name_and_level(
        &self,
        name: &str,
        level: SubjectLevel,
    ) -> Result<Option<Subject>, StoreError> {
        let subject =
            sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE name = $1 AND level = $2")
                .bind(name)
                .bind(level)
                .fetch_optional(&self.pool)
                .await?;
        Ok(subject)
    }

    pub async fn insert_subject(
        &self,
        name: &str,
        level: SubjectLevel,
    ) -> Result<Subject, StoreError> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name, level, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (name, level) DO UPDATE SET name = EXCLUDED.name \
             RETURNING *",
        )
        .bind(name)
        .bind(level)
        .fetch_one(&self.pool)
        .await?;
        Ok(subject)
    }

    // ---- grades ----

    /// Grade rows for one student, in insertion order. The joined listing
    /// preserves this ordering.
    pub async fn grades_for_student(&self, student_id: i32) -> Result<Vec<Grade>, StoreError> {
        let grades =
            sqlx::query_as::<_, Grade>("SELECT * FROM grades WHERE student_id = $1 ORDER BY id")
                .bind(student_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(grades)
    }

    pub async fn grade_by_id(&self, id: i32) -> Result<Option<Grade>, StoreError> {
        let grade = sqlx::query_as::<_, Grade>("SELECT * FROM grades WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(grade)
    }

    pub async fn update_grade(&self, grade: &Grade) -> Result<Grade, StoreError> {
        let updated = sqlx::query_as::<_, Grade>(
            "UPDATE grades SET grade = $1, year = $2 WHERE id = $3 RETURNING *",
        )
        .bind(grade.grade)
        .bind(grade.year)
        .bind(grade.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("Grade not found".to_string()))?;
        Ok(updated)
    }

    pub async fn grade_exists(
        &self,
        student_id: i32,
        subject_id: i32,
        year: i32,
    ) -> Result<bool, StoreError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM grades WHERE student_id = $1 AND subject_id = $2 AND year = $3",
        )
        .bind(student_id)
        .bind(subject_id)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    pub async fn insert_grade(
        &self,
        student_id: i32,
        subject_id: i32,
        grade: GradeValue,
        year: i32,
    ) -> Result<Grade, StoreError> {
        let grade = sqlx::query_as::<_, Grade>(
            "INSERT INTO grades (student_id, subject_id, grade, year) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(student_id)
        .bind(subject_id)
        .bind(grade)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;
        Ok(grade)
    }

    /// Denormalized rows for the admin editing grid, optionally filtered by
    /// subject name and school year.
    pub async fn grade_rows(
        &self,
        course_year: Option<(&str, i32)>,
    ) -> Result<Vec<GradeRow>, StoreError> {
        const BASE: &str = "SELECT g.id AS grade_id, st.person_nr, st.first_name, st.last_name, \
             su.name AS subject, su.level, g.grade, g.year \
             FROM grades g \
             JOIN students st ON st.id = g.student_id \
             JOIN subjects su ON su.id = g.subject_id";

        let rows = match course_year {
            Some((course, year)) => {
                let sql = format!("{} WHERE su.name = $1 AND g.year = $2 ORDER BY g.id", BASE);
                sqlx::query_as::<_, GradeRow>(&sql)
                    .bind(course)
                    .bind(year)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{} ORDER BY g.id", BASE);
                sqlx::query_as::<_, GradeRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }
}
