use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Curriculum difficulty tier. Levels map onto school years: year 1 takes
/// A-level subjects, year 2 B-level, year 3 C-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subject_level", rename_all = "UPPERCASE")]
pub enum SubjectLevel {
    A,
    B,
    C,
}

impl SubjectLevel {
    /// Level of the curriculum taken in a given school year, if the year is
    /// in range.
    pub fn for_year(year: i32) -> Option<Self> {
        match year {
            1 => Some(SubjectLevel::A),
            2 => Some(SubjectLevel::B),
            3 => Some(SubjectLevel::C),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubjectLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectLevel::A => write!(f, "A"),
            SubjectLevel::B => write!(f, "B"),
            SubjectLevel::C => write!(f, "C"),
        }
    }
}

/// A curriculum unit. Static reference data; `updated_at` is surfaced as the
/// `timestamp` field of the joined grade listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i32,
    pub name: String,
    pub level: SubjectLevel,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_track_school_years() {
        assert_eq!(SubjectLevel::for_year(1), Some(SubjectLevel::A));
        assert_eq!(SubjectLevel::for_year(2), Some(SubjectLevel::B));
        assert_eq!(SubjectLevel::for_year(3), Some(SubjectLevel::C));
        assert_eq!(SubjectLevel::for_year(0), None);
        assert_eq!(SubjectLevel::for_year(4), None);
    }
}
