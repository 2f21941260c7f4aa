pub mod grade;
pub mod student;
pub mod subject;

pub use grade::{Grade, GradeRow, GradeValue};
pub use student::Student;
pub use subject::{Subject, SubjectLevel};
