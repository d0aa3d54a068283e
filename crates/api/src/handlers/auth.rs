use axum::{extract::State, http::HeaderMap, Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

use manege_core::{
    errors::ManegeError,
    models::profile::{AuthContext, AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, Role},
};

use crate::{middleware::auth, middleware::error_handling::AppError, ApiState};

/// Self-service student registration against an admin-provisioned student
/// record: the student id must exist and must not be linked to a user yet.
#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let student =
        manege_db::repositories::student::get_student_by_id(&state.db_pool, payload.student_id)
            .await
            .map_err(ManegeError::Database)?
            .ok_or_else(|| {
                ManegeError::Validation(
                    "Invalid student ID. Please check with your instructor.".to_string(),
                )
            })?;

    if student.user_id.is_some() {
        return Err(AppError(ManegeError::Validation(
            "This student account is already linked to a user".to_string(),
        )));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user_id = Uuid::new_v4();

    let profile = manege_db::repositories::profile::create_profile(
        &state.db_pool,
        user_id,
        Role::Student.as_str(),
        &payload.name,
        &payload.email,
        &password_hash,
    )
    .await
    .map_err(ManegeError::Database)?;

    // Conditional update; loses the race against a concurrent registration
    // for the same student id.
    let linked = manege_db::repositories::student::link_student_user(
        &state.db_pool,
        payload.student_id,
        user_id,
    )
    .await
    .map_err(ManegeError::Database)?;

    if !linked {
        // Lost the race: back the profile out so the email stays free and
        // no unlinked account can sign in.
        manege_db::repositories::profile::delete_profile(&state.db_pool, profile.id)
            .await
            .map_err(ManegeError::Database)?;

        return Err(AppError(ManegeError::Validation(
            "This student account is already linked to a user".to_string(),
        )));
    }

    let session = manege_db::repositories::session::create_session(&state.db_pool, profile.id)
        .await
        .map_err(ManegeError::Database)?;

    Ok(Json(AuthResponse {
        token: session.token,
        user_id: profile.id,
        role: Role::Student,
    }))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let profile = manege_db::repositories::profile::verify_credentials(
        &state.db_pool,
        &payload.email,
        &payload.password,
    )
    .await
    .map_err(ManegeError::Database)?
    .ok_or_else(|| ManegeError::Authentication("Invalid email or password".to_string()))?;

    let role: Role = profile.role.parse()?;

    let session = manege_db::repositories::session::create_session(&state.db_pool, profile.id)
        .await
        .map_err(ManegeError::Database)?;

    Ok(Json(AuthResponse {
        token: session.token,
        user_id: profile.id,
        role,
    }))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(token) = auth::bearer_token(&headers) {
        manege_db::repositories::session::delete_session(&state.db_pool, token)
            .await
            .map_err(ManegeError::Database)?;
    }

    Ok(Json(serde_json::json!({ "signed_out": true })))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<Arc<ApiState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = manege_db::repositories::profile::get_profile_by_id(&state.db_pool, ctx.user_id)
        .await
        .map_err(ManegeError::Database)?
        .ok_or_else(|| ManegeError::NotFound("Profile not found".to_string()))?;

    Ok(Json(ProfileResponse {
        id: profile.id,
        role: profile.role.parse()?,
        name: profile.name,
        email: profile.email,
    }))
}
