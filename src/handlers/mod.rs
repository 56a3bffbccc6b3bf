//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params)
//! 2. Delegates to a service
//! 3. Returns HTTP response (JSON, status code)

/// Fee quote endpoint
pub mod calculate;
/// Service health endpoint
pub mod health;
/// Reservation record endpoints
pub mod reservations;
