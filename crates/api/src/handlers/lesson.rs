use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

use manege_core::{
    errors::ManegeError,
    models::lesson::{
        CreateLessonRequest, CreateLessonRequestRequest, LessonRequest, LessonResponse,
        RequestStatus, StudentSummary, UpdateLessonRequest, UpdateLessonRequestRequest,
    },
    models::profile::{AuthContext, Role},
};
use manege_db::models::{DbLessonRequest, DbLessonWithStudent};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

pub(crate) fn lesson_response(row: DbLessonWithStudent) -> Result<LessonResponse, ManegeError> {
    Ok(LessonResponse {
        id: row.id,
        date: row.date,
        time: row.time,
        duration: u16::try_from(row.duration)
            .map_err(|_| ManegeError::Validation(format!("Invalid lesson duration: {}", row.duration)))?
            .try_into()?,
        focus: row.focus,
        notes: row.notes,
        student: StudentSummary {
            id: row.student_id,
            name: row.student_name,
            level: row.student_level.parse()?,
        },
    })
}

pub(crate) fn lesson_request_response(row: DbLessonRequest) -> Result<LessonRequest, ManegeError> {
    Ok(LessonRequest {
        id: row.id,
        student_id: row.student_id,
        preferred_date: row.preferred_date,
        preferred_time: row.preferred_time,
        notes: row.notes,
        status: row.status.parse()?,
        created_at: row.created_at,
    })
}

/// Optional inclusive date range; both bounds or neither.
#[derive(Debug, Deserialize)]
pub struct LessonRangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[axum::debug_handler]
pub async fn list_lessons(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LessonRangeQuery>,
) -> Result<Json<Vec<LessonResponse>>, AppError> {
    let range = match (query.start, query.end) {
        (Some(start), Some(end)) => Some((start, end)),
        (None, None) => None,
        _ => {
            return Err(AppError(ManegeError::Validation(
                "Both start and end must be supplied for a range query".to_string(),
            )))
        }
    };

    let rows = manege_db::repositories::lesson::list_lessons(&state.db_pool, range)
        .await
        .map_err(ManegeError::Database)?;

    let mut lessons = rows
        .into_iter()
        .map(lesson_response)
        .collect::<Result<Vec<_>, _>>()?;

    // Clients and the calendar projections assume (date, time) order.
    manege_core::calendar::sort_by_slot(&mut lessons);

    Ok(Json(lessons))
}

#[axum::debug_handler]
pub async fn create_lesson(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<Json<LessonResponse>, AppError> {
    manege_db::repositories::student::get_student_by_id(&state.db_pool, payload.student_id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| {
            ManegeError::NotFound(format!("Student with ID {} not found", payload.student_id))
        })?;

    // Deliberately no overlap check: double-booking a slot is accepted.
    let lesson = manege_db::repositories::lesson::create_lesson(&state.db_pool, &payload)
        .await
        .map_err(ManegeError::Database)?;

    let row = manege_db::repositories::lesson::get_lesson_with_student(&state.db_pool, lesson.id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound(format!("Lesson with ID {} not found", lesson.id)))?;

    Ok(Json(lesson_response(row)?))
}

#[axum::debug_handler]
pub async fn update_lesson(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLessonRequest>,
) -> Result<Json<LessonResponse>, AppError> {
    manege_db::repositories::lesson::get_lesson_by_id(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound(format!("Lesson with ID {} not found", id)))?;

    manege_db::repositories::lesson::update_lesson(&state.db_pool, id, &payload)
        .await
        .map_err(ManegeError::Database)?;

    let row = manege_db::repositories::lesson::get_lesson_with_student(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound(format!("Lesson with ID {} not found", id)))?;

    Ok(Json(lesson_response(row)?))
}

#[axum::debug_handler]
pub async fn delete_lesson(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    manege_db::repositories::lesson::get_lesson_by_id(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound(format!("Lesson with ID {} not found", id)))?;

    manege_db::repositories::lesson::delete_lesson(&state.db_pool, id)
        .await
        .map_err(ManegeError::Database)?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// Validates that a requested date lies strictly in the future.
///
/// Runs before any store call: a request dated today or earlier never
/// reaches the database.
pub fn validate_preferred_date(
    preferred_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ManegeError> {
    if preferred_date <= today {
        return Err(ManegeError::Validation(
            "Preferred date must be in the future".to_string(),
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn create_lesson_request(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<CreateLessonRequestRequest>,
) -> Result<Json<LessonRequest>, AppError> {
    validate_preferred_date(payload.preferred_date, Utc::now().date_naive())?;

    // A student may only file requests against their own record.
    if ctx.role == Role::Student {
        let own = manege_db::repositories::student::get_student_by_user_id(
            &state.db_pool,
            ctx.user_id,
        )
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| {
            ManegeError::NotFound("No student record linked to this account".to_string())
        })?;

        if own.id != payload.student_id {
            return Err(AppError(ManegeError::Authorization(
                "Cannot request lessons for another student".to_string(),
            )));
        }
    }

    let request = manege_db::repositories::lesson::create_lesson_request(
        &state.db_pool,
        payload.student_id,
        payload.preferred_date,
        payload.preferred_time,
        payload.notes.as_deref(),
    )
    .await
    .map_err(ManegeError::Database)?;

    Ok(Json(lesson_request_response(request)?))
}

#[derive(Debug, Deserialize)]
pub struct LessonRequestQuery {
    pub status: Option<RequestStatus>,
}

#[axum::debug_handler]
pub async fn list_lesson_requests(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<LessonRequestQuery>,
) -> Result<Json<Vec<LessonRequest>>, AppError> {
    // Students see only their own requests; admins see everything.
    let student_id = match ctx.role {
        Role::Admin => None,
        Role::Student => {
            let own = manege_db::repositories::student::get_student_by_user_id(
                &state.db_pool,
                ctx.user_id,
            )
            .await
            .map_err(ManegeError::Database)?
            .ok_or_else(|| {
                ManegeError::NotFound("No student record linked to this account".to_string())
            })?;
            Some(own.id)
        }
    };

    let rows = manege_db::repositories::lesson::list_lesson_requests(
        &state.db_pool,
        student_id,
        query.status.map(|s| s.as_str()),
    )
    .await
    .map_err(ManegeError::Database)?;

    let requests = rows
        .into_iter()
        .map(lesson_request_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(requests))
}

#[axum::debug_handler]
pub async fn update_lesson_request(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLessonRequestRequest>,
) -> Result<Json<LessonRequest>, AppError> {
    // Approval and rejection are instructor decisions.
    if ctx.role != Role::Admin {
        return Err(AppError(ManegeError::Authorization(
            "Only an instructor can change a request status".to_string(),
        )));
    }

    let request = manege_db::repositories::lesson::set_lesson_request_status(
        &state.db_pool,
        id,
        payload.status.as_str(),
    )
    .await
    .map_err(ManegeError::Database)?;

    Ok(Json(lesson_request_response(request)?))
}
