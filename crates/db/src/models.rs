use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub level: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbHorse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub level: String,
    pub discipline: String,
    pub created_at: DateTime<Utc>,
}

/// Flat student-with-horse row produced by the list/detail joins.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudentWithHorse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub level: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub horse_id: Uuid,
    pub horse_name: String,
    pub horse_breed: String,
    pub horse_age: i32,
    pub horse_level: String,
    pub horse_discipline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLesson {
    pub id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration: i32,
    pub focus: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lesson row joined with the minimal student projection the calendar needs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLessonWithStudent {
    pub id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration: i32,
    pub focus: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub student_name: String,
    pub student_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLessonRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTrainingGoal {
    pub id: Uuid,
    pub student_id: Uuid,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCompetitionEntry {
    pub id: Uuid,
    pub student_id: Uuid,
    pub competition_name: String,
    pub date: NaiveDate,
    pub location: String,
    pub level: String,
    pub status: String,
    pub result: Option<String>,
    pub placement: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub role: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
