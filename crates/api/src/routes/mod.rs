pub mod auth;
pub mod calendar;
pub mod competition;
pub mod dashboard;
pub mod health;
pub mod lesson;
pub mod student;
