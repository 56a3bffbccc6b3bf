//! Reservation record HTTP handlers.
//!
//! This module implements the record endpoints:
//! - POST /api/data - Create a reservation
//! - GET /api/data - List all reservations
//! - PUT /api/data/{id} - Overwrite a reservation
//! - DELETE /api/data/{id} - Delete a reservation

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    extract::AppJson,
    models::reservation::{ReservationRequest, ReservationResponse},
    services::reservation_service,
    state::AppState,
};

/// Create a new reservation.
///
/// # Response
///
/// - **Success (201 Created)**: the stored reservation, including its `id` and `parkingArea`
/// - **Error (400)**: validation failed
/// - **Error (500)**: the store rejected the write
pub async fn create_reservation(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reservation =
        reservation_service::create_reservation(state.store.as_ref(), &state.converter, request)
            .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// List all reservations in the store's default order.
pub async fn list_reservations(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let reservations = reservation_service::list_reservations(state.store.as_ref()).await?;

    Ok(Json(reservations))
}

/// Overwrite a reservation.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: no reservation with this id
/// - **Error (500)**: the store rejected the write
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<ReservationRequest>,
) -> Result<StatusCode, AppError> {
    reservation_service::update_reservation(state.store.as_ref(), &state.converter, &id, request)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a reservation.
///
/// Returns 204 No Content on success and 404 when the id is unknown.
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    reservation_service::delete_reservation(state.store.as_ref(), &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
