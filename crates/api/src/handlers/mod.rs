pub mod auth;
pub mod calendar;
pub mod competition;
pub mod dashboard;
pub mod lesson;
pub mod student;
