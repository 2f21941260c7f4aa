pub mod grades;
pub mod students;
