//! HTTP router assembly.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::AppState};

/// Build the application router.
///
/// # Routes
///
/// - `GET /health`
/// - `POST /api/calculate`
/// - `POST /api/data`, `GET /api/data`
/// - `PUT /api/data/{id}`, `DELETE /api/data/{id}`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/calculate", post(handlers::calculate::calculate))
        .route(
            "/api/data",
            post(handlers::reservations::create_reservation)
                .get(handlers::reservations::list_reservations),
        )
        .route(
            "/api/data/{id}",
            put(handlers::reservations::update_reservation)
                .delete(handlers::reservations::delete_reservation),
        )
        // The reservation form is served from a different origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
