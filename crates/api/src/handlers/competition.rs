use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use manege_core::{errors::ManegeError, models::competition::CompetitionEntryResponse};
use manege_db::models::DbCompetitionEntry;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

pub(crate) fn competition_response(
    row: DbCompetitionEntry,
) -> Result<CompetitionEntryResponse, ManegeError> {
    Ok(CompetitionEntryResponse {
        id: row.id,
        student_id: row.student_id,
        competition_name: row.competition_name,
        date: row.date,
        location: row.location,
        level: row.level,
        status: row.status.parse()?,
        result: row.result,
        placement: row.placement,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[derive(Debug, Deserialize)]
pub struct CompetitionQuery {
    pub student_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn list_competitions(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<CompetitionQuery>,
) -> Result<Json<Vec<CompetitionEntryResponse>>, AppError> {
    let rows = manege_db::repositories::competition::list_competition_entries(
        &state.db_pool,
        query.student_id,
    )
    .await
    .map_err(ManegeError::Database)?;

    let entries = rows
        .into_iter()
        .map(competition_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(entries))
}
