//! Demo dataset: a small subject catalog, a handful of student accounts and
//! a full grade history per student. Re-running is safe; existing rows are
//! kept and duplicate grades are skipped.

use crate::database::models::{GradeValue, SubjectLevel};
use crate::database::Database;

const SUBJECTS: &[(&str, SubjectLevel)] = &[
    ("Svenska 1", SubjectLevel::A),
    ("Engelska 5", SubjectLevel::A),
    ("Matematik 1b", SubjectLevel::A),
    ("Svenska 2", SubjectLevel::B),
    ("Engelska 6", SubjectLevel::B),
    ("Matematik 2b", SubjectLevel::B),
    ("Svenska 3", SubjectLevel::C),
    ("Matematik 3b", SubjectLevel::C),
];

// (first, last, personNr, year, phone, email, address)
const STUDENTS: &[(&str, &str, &str, i32, &str, &str, &str)] = &[
    ("Diana", "Lind", "101201-9343", 1, "0778620626", "diana.lind0@school.com", "Storgatan 62, Stockholm"),
    ("Erik", "Berg", "080522-1188", 2, "0731234567", "erik.berg1@school.com", "Kungsgatan 4, Stockholm"),
    ("Sara", "Holm", "090913-2244", 3, "0709876543", "sara.holm0@school.com", "Vasagatan 17, Stockholm"),
    ("Jonas", "Ek", "071130-5566", 2, "0765554433", "jonas.ek3@school.com", "Odengatan 80, Stockholm"),
    ("Mira", "Sand", "100215-7788", 1, "0722221111", "mira.sand1@school.com", "Birkagatan 9, Stockholm"),
    ("Tina", "Nilsson", "060314-7771", 1, "0799999999", "tina.nilsson2@school.com", "New Address 123, Stockholm"),
];

pub async fn handle() -> anyhow::Result<()> {
    let db = Database::from_pool(super::connect_pool().await?);

    for (name, level) in SUBJECTS {
        db.insert_subject(name, *level).await?;
    }

    for (first, last, person_nr, year, phone, email, address) in STUDENTS {
        db.insert_student(first, last, person_nr, *year, phone, email, address)
            .await?;
    }

    let students = db.list_students().await?;
    let subjects = db.list_subjects().await?;

    let mut created = 0usize;
    for student in &students {
        // Every year up to the student's current one gets grades for that
        // year's curriculum level
        for year in 1..=student.year {
            let Some(level) = SubjectLevel::for_year(year) else {
                continue;
            };

            for subject in subjects.iter().filter(|s| s.level == level) {
                if db.grade_exists(student.id, subject.id, year).await? {
                    continue;
                }
                let value = pick_grade(student.id, subject.id, year);
                db.insert_grade(student.id, subject.id, value, year).await?;
                created += 1;
            }
        }
    }

    println!(
        "Seeded {} subjects, {} students, {} new grades",
        subjects.len(),
        students.len(),
        created
    );
    Ok(())
}

/// Deterministic spread of grades so re-seeding a scratch database always
/// produces the same dataset
fn pick_grade(student_id: i32, subject_id: i32, year: i32) -> GradeValue {
    let idx = (student_id + subject_id * 3 + year) as usize % GradeValue::ALL.len();
    GradeValue::ALL[idx]
}
