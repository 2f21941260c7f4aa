pub mod admin;
pub mod student;
