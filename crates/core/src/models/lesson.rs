use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ManegeError;

use super::student::RidingLevel;

/// Allowed lesson lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum LessonDuration {
    HalfHour,
    ThreeQuarters,
    Hour,
    NinetyMinutes,
}

impl LessonDuration {
    pub fn minutes(&self) -> u16 {
        match self {
            LessonDuration::HalfHour => 30,
            LessonDuration::ThreeQuarters => 45,
            LessonDuration::Hour => 60,
            LessonDuration::NinetyMinutes => 90,
        }
    }
}

impl TryFrom<u16> for LessonDuration {
    type Error = ManegeError;

    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        match minutes {
            30 => Ok(LessonDuration::HalfHour),
            45 => Ok(LessonDuration::ThreeQuarters),
            60 => Ok(LessonDuration::Hour),
            90 => Ok(LessonDuration::NinetyMinutes),
            other => Err(ManegeError::Validation(format!(
                "Invalid lesson duration: {other} minutes"
            ))),
        }
    }
}

impl From<LessonDuration> for u16 {
    fn from(duration: LessonDuration) -> u16 {
        duration.minutes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration: LessonDuration,
    pub focus: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal student projection carried alongside each lesson row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub level: RidingLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration: LessonDuration,
    pub focus: String,
    pub notes: Option<String>,
    pub student: StudentSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration: LessonDuration,
    pub focus: String,
    pub notes: Option<String>,
}

/// Sparse patch for a lesson row; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLessonRequest {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration: Option<LessonDuration>,
    pub focus: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ManegeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(ManegeError::Validation(format!(
                "Unknown request status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub notes: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonRequestRequest {
    pub student_id: Uuid,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLessonRequestRequest {
    pub status: RequestStatus,
}
