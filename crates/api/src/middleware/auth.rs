//! # Authentication Module
//!
//! Password hashing and session-token plumbing for the Manege API.
//!
//! Passwords are hashed with Argon2 (random salt, PHC string format) before
//! they reach the `profiles` table. Sessions are opaque UUID tokens carried
//! in the `Authorization: Bearer` header.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use axum::http::{header, HeaderMap};
use eyre::Result;
use uuid::Uuid;

/// Hashes a password using the Argon2 algorithm.
///
/// Generates a fresh random salt per password and returns the PHC string
/// (algorithm, version, parameters, salt, and hash) for storage.
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Extracts the session token from an `Authorization: Bearer <uuid>` header.
///
/// Returns `None` when the header is missing or not a UUID; the route guard
/// treats both the same as an anonymous request.
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}
