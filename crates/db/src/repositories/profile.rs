use crate::models::DbProfile;
use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use eyre::{eyre, Result};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_profile(
    pool: &Pool<Postgres>,
    id: Uuid,
    role: &str,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<DbProfile> {
    let now = Utc::now();

    tracing::debug!("Creating profile: id={}, role={}", id, role);

    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        INSERT INTO profiles (id, role, name, email, password_hash, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, role, name, email, password_hash, created_at
        "#,
    )
    .bind(id)
    .bind(role)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

pub async fn get_profile_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProfile>> {
    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        SELECT id, role, name, email, password_hash, created_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Removes a profile row. Used to back out a registration whose student
/// link could not be taken.
pub async fn delete_profile(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    tracing::debug!("Deleting profile: {}", id);

    sqlx::query(
        r#"
        DELETE FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_profile_by_email(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<DbProfile>> {
    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        SELECT id, role, name, email, password_hash, created_at
        FROM profiles
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Verifies a login against the stored argon2 hash. Returns the profile on
/// success, None when the email is unknown or the password does not match.
pub async fn verify_credentials(
    pool: &Pool<Postgres>,
    email: &str,
    password: &str,
) -> Result<Option<DbProfile>> {
    let profile = match get_profile_by_email(pool, email).await? {
        Some(profile) => profile,
        None => return Ok(None),
    };

    let parsed_hash = argon2::PasswordHash::new(&profile.password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(is_valid.then_some(profile))
}
