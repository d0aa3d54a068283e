use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ManegeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    Registered,
    Completed,
}

impl CompetitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionStatus::Registered => "registered",
            CompetitionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitionStatus {
    type Err = ManegeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(CompetitionStatus::Registered),
            "completed" => Ok(CompetitionStatus::Completed),
            other => Err(ManegeError::Validation(format!(
                "Unknown competition status: {other}"
            ))),
        }
    }
}

/// Competition entries are read-only in this service; rows are seeded
/// externally and surfaced on student detail and dashboard views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionEntryResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub competition_name: String,
    pub date: NaiveDate,
    pub location: String,
    pub level: String,
    pub status: CompetitionStatus,
    pub result: Option<String>,
    pub placement: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
