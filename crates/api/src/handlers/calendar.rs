use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

use manege_core::{
    calendar::{self, WeekViewResponse},
    errors::ManegeError,
};

use crate::{handlers::lesson::lesson_response, middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Cursor date; any day of the wanted week. Defaults to today.
    pub date: Option<NaiveDate>,
}

/// Serves the Monday-anchored weekly grid around the cursor date.
///
/// Always a full week: 7 buckets, empty or not, so the client can flip
/// between daily and weekly display without another fetch.
#[axum::debug_handler]
pub async fn get_week(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekViewResponse>, AppError> {
    let cursor = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let window = calendar::week_window(cursor);

    let rows = manege_db::repositories::lesson::list_lessons(
        &state.db_pool,
        Some((window.start, window.end)),
    )
    .await
    .map_err(ManegeError::Database)?;

    let mut lessons = rows
        .into_iter()
        .map(lesson_response)
        .collect::<Result<Vec<_>, _>>()?;

    // The projections assume (date, time) order.
    calendar::sort_by_slot(&mut lessons);

    let response = WeekViewResponse {
        window,
        days: calendar::weekly_projection(&lessons, cursor),
    };

    Ok(Json(response))
}
