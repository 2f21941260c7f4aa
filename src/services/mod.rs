pub mod admin;
pub mod report;
