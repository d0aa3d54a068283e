use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ManegeError;

use super::competition::CompetitionEntryResponse;

/// Dutch dressage proficiency levels, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RidingLevel {
    B,
    L1,
    L2,
    M1,
    M2,
    Z1,
    Z2,
}

impl RidingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RidingLevel::B => "B",
            RidingLevel::L1 => "L1",
            RidingLevel::L2 => "L2",
            RidingLevel::M1 => "M1",
            RidingLevel::M2 => "M2",
            RidingLevel::Z1 => "Z1",
            RidingLevel::Z2 => "Z2",
        }
    }
}

impl fmt::Display for RidingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RidingLevel {
    type Err = ManegeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(RidingLevel::B),
            "L1" => Ok(RidingLevel::L1),
            "L2" => Ok(RidingLevel::L2),
            "M1" => Ok(RidingLevel::M1),
            "M2" => Ok(RidingLevel::M2),
            "Z1" => Ok(RidingLevel::Z1),
            "Z2" => Ok(RidingLevel::Z2),
            other => Err(ManegeError::Validation(format!(
                "Unknown riding level: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub level: RidingLevel,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Horse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub level: String,
    pub discipline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingGoal {
    pub id: Uuid,
    pub student_id: Uuid,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHorseRequest {
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub level: String,
    pub discipline: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub level: RidingLevel,
    pub horse: CreateHorseRequest,
}

/// Sparse patch for a horse row; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHorsePatch {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub level: Option<String>,
    pub discipline: Option<String>,
}

/// Sparse patch for a student row; absent fields are left untouched.
/// A `horse` sub-patch updates the linked horse in the same transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub level: Option<RidingLevel>,
    pub horse: Option<UpdateHorsePatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub level: RidingLevel,
    pub horse: Horse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetStudentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub level: RidingLevel,
    pub horse: Horse,
    pub competitions: Vec<CompetitionEntryResponse>,
    pub training_goals: Vec<TrainingGoal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrainingGoalRequest {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTrainingGoalRequest {
    pub completed: bool,
}
