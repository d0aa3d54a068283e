//! # Manege API
//!
//! Web server for the Manege riding-school management service: student and
//! horse records, lesson scheduling, lesson requests, training goals, and
//! competition tracking.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Route guard, authentication helpers, error mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database access.
//! Authorization is enforced in one place: the route guard middleware wraps
//! every non-public route and injects an [`AuthContext`] for handlers.
//!
//! [`AuthContext`]: manege_core::models::profile::AuthContext

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for the route guard, authentication, and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
}

/// Starts the API server with the provided configuration and database
/// connection: initializes logging, assembles the router, wraps protected
/// routes in the route guard, and serves HTTP.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState { db_pool });

    // Everything behind the route guard: the guard is the single
    // authorization point for the whole surface.
    let protected = Router::new()
        .merge(routes::student::routes())
        .merge(routes::lesson::routes())
        .merge(routes::competition::routes())
        .merge(routes::calendar::routes())
        .merge(routes::dashboard::routes())
        .merge(routes::auth::session_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::guard::route_guard,
        ));

    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Login and registration (public, still observed by the guard so
        // that signed-in users get bounced to their landing page)
        .merge(routes::auth::public_routes().layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::guard::route_guard,
        )))
        .merge(protected)
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .filter_map(|origin| origin.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(config.request_timeout),
    ));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
