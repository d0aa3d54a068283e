use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/students", get(handlers::student::list_students))
        .route("/api/students", post(handlers::student::create_student))
        .route("/api/students/:id", get(handlers::student::get_student))
        .route("/api/students/:id", put(handlers::student::update_student))
        .route("/api/students/:id", delete(handlers::student::delete_student))
        .route(
            "/api/students/:id/goals",
            post(handlers::student::add_training_goal),
        )
        .route(
            "/api/goals/:id",
            put(handlers::student::update_training_goal),
        )
        .route(
            "/api/goals/:id",
            delete(handlers::student::delete_training_goal),
        )
}
