use crate::models::DbSession;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_session(pool: &Pool<Postgres>, user_id: Uuid) -> Result<DbSession> {
    let token = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Opening session for user: {}", user_id);

    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token, user_id, created_at)
        VALUES ($1, $2, $3)
        RETURNING token, user_id, created_at
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

pub async fn get_session(pool: &Pool<Postgres>, token: Uuid) -> Result<Option<DbSession>> {
    let session = sqlx::query_as::<_, DbSession>(
        r#"
        SELECT token, user_id, created_at
        FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

pub async fn delete_session(pool: &Pool<Postgres>, token: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}
