//! Data models for stored documents and API payloads.

/// Form timestamps
pub mod parking_time;
/// Parking reservation model
pub mod reservation;
