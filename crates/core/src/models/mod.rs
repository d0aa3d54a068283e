pub mod competition;
pub mod dashboard;
pub mod lesson;
pub mod profile;
pub mod student;
