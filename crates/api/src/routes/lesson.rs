use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/lessons", get(handlers::lesson::list_lessons))
        .route("/api/lessons", post(handlers::lesson::create_lesson))
        .route("/api/lessons/:id", put(handlers::lesson::update_lesson))
        .route("/api/lessons/:id", delete(handlers::lesson::delete_lesson))
        .route(
            "/api/lesson-requests",
            post(handlers::lesson::create_lesson_request),
        )
        .route(
            "/api/lesson-requests",
            get(handlers::lesson::list_lesson_requests),
        )
        .route(
            "/api/lesson-requests/:id",
            put(handlers::lesson::update_lesson_request),
        )
}
