pub mod competition;
pub mod lesson;
pub mod profile;
pub mod session;
pub mod student;
