use crate::models::DbCompetitionEntry;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Competition entries are read-only in this service: rows are maintained
// outside the API, so the repository only exposes queries.

pub async fn list_competition_entries(
    pool: &Pool<Postgres>,
    student_id: Option<Uuid>,
) -> Result<Vec<DbCompetitionEntry>> {
    let entries = sqlx::query_as::<_, DbCompetitionEntry>(
        r#"
        SELECT id, student_id, competition_name, date, location, level, status,
               result, placement, created_at, updated_at
        FROM competition_entries
        WHERE ($1::uuid IS NULL OR student_id = $1)
        ORDER BY date DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn upcoming_competitions(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    from: NaiveDate,
) -> Result<Vec<DbCompetitionEntry>> {
    let entries = sqlx::query_as::<_, DbCompetitionEntry>(
        r#"
        SELECT id, student_id, competition_name, date, location, level, status,
               result, placement, created_at, updated_at
        FROM competition_entries
        WHERE student_id = $1 AND date >= $2
        ORDER BY date ASC
        "#,
    )
    .bind(student_id)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
