use serde::{Deserialize, Serialize};

use super::competition::CompetitionEntryResponse;
use super::lesson::{LessonRequest, LessonResponse};
use super::student::StudentResponse;

/// Everything the student landing page shows in one round trip: the linked
/// student record, upcoming lessons, pending lesson requests, and upcoming
/// competition entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub student: StudentResponse,
    pub upcoming_lessons: Vec<LessonResponse>,
    pub pending_requests: Vec<LessonRequest>,
    pub upcoming_competitions: Vec<CompetitionEntryResponse>,
}
