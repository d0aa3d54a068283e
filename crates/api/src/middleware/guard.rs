//! # Route Guard
//!
//! The single authorization point of the API. Every request is classified
//! by path, the session token (if any) is resolved to a profile, and a pure
//! decision table determines whether the request proceeds, is redirected,
//! or forces a sign-out.
//!
//! The decision logic is deliberately separated from the axum middleware so
//! it can be tested as a plain function against the full table.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use manege_core::{
    errors::ManegeError,
    models::profile::{AuthContext, Role},
};
use uuid::Uuid;

use crate::{middleware::auth, middleware::error_handling::AppError, ApiState};

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_HOME: &str = "/students";
pub const STUDENT_HOME: &str = "/dashboard";
/// Login redirect carrying the error marker for a session whose profile
/// row is missing.
pub const MISSING_PROFILE_PATH: &str = "/login?error=missing_profile";

/// Authorization class of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Login and registration; reachable anonymously.
    Public,
    /// Student administration; admins only.
    AdminOnly,
    /// Lessons, competitions, calendar; any authenticated user.
    Shared,
    /// The personal dashboard of a linked student account.
    StudentOnly,
}

/// What the session token resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token, or a token no session row matches.
    Anonymous,
    /// A live session whose user has no profile row; an error state that
    /// forces a sign-out.
    MissingProfile,
    Authenticated(AuthContext),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
    /// Delete the session, then redirect.
    SignOutRedirect(&'static str),
}

/// Maps a request path to its authorization class.
///
/// Unknown paths fall into `Shared`: they still require a session, and the
/// handler behind them will 404 on its own.
pub fn classify_path(path: &str) -> PathClass {
    if matches!(
        path,
        "/login" | "/register" | "/api/auth/login" | "/api/auth/register"
    ) {
        PathClass::Public
    } else if path == "/students"
        || path.starts_with("/students/")
        || path == "/api/students"
        || path.starts_with("/api/students/")
        || path == "/api/goals"
        || path.starts_with("/api/goals/")
    {
        PathClass::AdminOnly
    } else if path == "/dashboard" || path == "/api/dashboard" {
        PathClass::StudentOnly
    } else {
        PathClass::Shared
    }
}

/// The authorization decision table.
pub fn decide(class: PathClass, session: SessionState) -> GuardDecision {
    match (session, class) {
        (SessionState::Anonymous, PathClass::Public) => GuardDecision::Allow,
        (SessionState::Anonymous, _) => GuardDecision::Redirect(LOGIN_PATH),

        // A profile-less session may still reach the public pages to
        // re-authenticate; anywhere else it is signed out.
        (SessionState::MissingProfile, PathClass::Public) => GuardDecision::Allow,
        (SessionState::MissingProfile, _) => {
            GuardDecision::SignOutRedirect(MISSING_PROFILE_PATH)
        }

        (SessionState::Authenticated(ctx), class) => match (ctx.role, class) {
            (Role::Admin, PathClass::Public) => GuardDecision::Redirect(ADMIN_HOME),
            (Role::Admin, _) => GuardDecision::Allow,
            (Role::Student, PathClass::Public) => GuardDecision::Redirect(STUDENT_HOME),
            (Role::Student, PathClass::AdminOnly) => GuardDecision::Redirect(STUDENT_HOME),
            (Role::Student, _) => GuardDecision::Allow,
        },
    }
}

/// Resolves the bearer token to a [`SessionState`] against the store.
async fn resolve_session(
    state: &ApiState,
    token: Option<Uuid>,
) -> Result<SessionState, AppError> {
    let token = match token {
        Some(token) => token,
        None => return Ok(SessionState::Anonymous),
    };

    let session = manege_db::repositories::session::get_session(&state.db_pool, token)
        .await
        .map_err(ManegeError::Database)?;
    let session = match session {
        Some(session) => session,
        None => return Ok(SessionState::Anonymous),
    };

    let profile =
        manege_db::repositories::profile::get_profile_by_id(&state.db_pool, session.user_id)
            .await
            .map_err(ManegeError::Database)?;

    match profile {
        None => Ok(SessionState::MissingProfile),
        Some(profile) => {
            let role: Role = profile.role.parse()?;
            Ok(SessionState::Authenticated(AuthContext {
                user_id: profile.id,
                role,
            }))
        }
    }
}

/// Axum middleware enforcing the decision table.
///
/// On `Allow` the resolved [`AuthContext`] (if any) is injected as a
/// request extension for handlers. Redirects are `303 See Other`.
pub async fn route_guard(
    State(state): State<Arc<ApiState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let class = classify_path(req.uri().path());
    let token = auth::bearer_token(req.headers());

    let session = match resolve_session(&state, token).await {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    match decide(class, session) {
        GuardDecision::Allow => {
            if let SessionState::Authenticated(ctx) = session {
                req.extensions_mut().insert(ctx);
            }
            next.run(req).await
        }
        GuardDecision::Redirect(target) => Redirect::to(target).into_response(),
        GuardDecision::SignOutRedirect(target) => {
            if let Some(token) = token {
                if let Err(err) =
                    manege_db::repositories::session::delete_session(&state.db_pool, token).await
                {
                    tracing::warn!("Failed to delete orphaned session: {}", err);
                }
            }
            Redirect::to(target).into_response()
        }
    }
}
