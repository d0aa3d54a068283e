use axum::{extract::State, Extension, Json};
use chrono::Utc;
use std::sync::Arc;

use manege_core::{
    errors::ManegeError,
    models::{dashboard::DashboardResponse, lesson::RequestStatus, profile::AuthContext},
};

use crate::{
    handlers::competition::competition_response,
    handlers::lesson::lesson_response,
    handlers::student::student_response,
    middleware::error_handling::AppError,
    ApiState,
};

/// The student landing page: own record plus upcoming lessons, pending
/// lesson requests, and upcoming competition entries.
#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<DashboardResponse>, AppError> {
    let student =
        manege_db::repositories::student::get_student_by_user_id(&state.db_pool, ctx.user_id)
            .await
            .map_err(ManegeError::Database)?
            .ok_or_else(|| {
                ManegeError::NotFound("No student record linked to this account".to_string())
            })?;

    let student_row =
        manege_db::repositories::student::get_student_with_horse(&state.db_pool, student.id)
            .await
            .map_err(ManegeError::Database)?
            .ok_or_else(|| {
                ManegeError::NotFound(format!("Student with ID {} not found", student.id))
            })?;

    let today = Utc::now().date_naive();

    let lessons = manege_db::repositories::lesson::upcoming_lessons_for_student(
        &state.db_pool,
        student.id,
        today,
    )
    .await
    .map_err(ManegeError::Database)?;

    let requests = manege_db::repositories::lesson::list_lesson_requests(
        &state.db_pool,
        Some(student.id),
        Some(RequestStatus::Pending.as_str()),
    )
    .await
    .map_err(ManegeError::Database)?;

    let competitions = manege_db::repositories::competition::upcoming_competitions(
        &state.db_pool,
        student.id,
        today,
    )
    .await
    .map_err(ManegeError::Database)?;

    let response = DashboardResponse {
        student: student_response(student_row)?,
        upcoming_lessons: lessons
            .into_iter()
            .map(lesson_response)
            .collect::<Result<Vec<_>, _>>()?,
        pending_requests: requests
            .into_iter()
            .map(crate::handlers::lesson::lesson_request_response)
            .collect::<Result<Vec<_>, _>>()?,
        upcoming_competitions: competitions
            .into_iter()
            .map(competition_response)
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(Json(response))
}
