//! Parking reservation data models and API request/response types.
//!
//! This module defines:
//! - `Reservation`: the document persisted in the store
//! - `ReservationRequest`: request body for creating and updating reservations
//! - `ReservationResponse`: the projection returned by `GET /api/data`
//!
//! All JSON uses camelCase field names, matching the browser form.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::parking_time::ParkingTime;

/// Base currency in which fees are computed before conversion.
pub const BASE_CURRENCY: &str = "USD";

/// A reservation as stored in the document store.
///
/// The document id is kept outside the body, see [`crate::store::Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub car_model: String,
    pub license_plate: String,
    pub start_date_time: ParkingTime,
    pub end_date_time: ParkingTime,

    /// Percentage in [0, 100]
    #[serde(default)]
    pub discount_percentage: f64,

    /// One uppercase letter followed by two digits, fixed at creation
    pub parking_area: String,

    /// Fee in `currency`
    pub total_cost: f64,

    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Request body for `POST /api/data` and `PUT /api/data/{id}`.
///
/// # JSON Example
///
/// ```json
/// {
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "phone": "+44 20 7946 0000",
///   "carModel": "Model T",
///   "licensePlate": "AB 123 CD",
///   "startDateTime": "2024-06-03T08:00",
///   "endDateTime": "2024-06-03T11:00",
///   "discountPercentage": "10",
///   "totalCost": 3.105,
///   "currency": "USD"
/// }
/// ```
///
/// # Optional fields
///
/// - `discountPercentage`: number or numeric string, empty string counts as absent
/// - `parkingArea`: honoured on create only; generated when absent
/// - `totalCost`: computed by the server when absent
/// - `currency`: defaults to "USD" on create
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub car_model: String,
    pub license_plate: String,
    pub start_date_time: ParkingTime,
    pub end_date_time: ParkingTime,

    #[serde(default, deserialize_with = "deserialize_percentage")]
    pub discount_percentage: Option<f64>,

    #[serde(default)]
    pub parking_area: Option<String>,

    #[serde(default)]
    pub total_cost: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub currency: Option<String>,
}

/// Reservation as listed by `GET /api/data`.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "5d0b3c5e-2a4f-4f2b-9a51-0c6c2f8f6b1d",
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "phone": "+44 20 7946 0000",
///   "carModel": "Model T",
///   "licensePlate": "AB 123 CD",
///   "startDateTime": "2024-06-03T08:00",
///   "endDateTime": "2024-06-03T11:00",
///   "parkingArea": "K42",
///   "discountPercentage": 10.0,
///   "totalCost": 3.105,
///   "currency": "USD"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub car_model: String,
    pub license_plate: String,
    pub start_date_time: ParkingTime,
    pub end_date_time: ParkingTime,
    pub parking_area: String,
    pub discount_percentage: f64,
    pub total_cost: f64,
    pub currency: String,
}

impl ReservationResponse {
    pub fn from_document(id: String, reservation: Reservation) -> Self {
        Self {
            id,
            first_name: reservation.first_name,
            last_name: reservation.last_name,
            phone: reservation.phone,
            car_model: reservation.car_model,
            license_plate: reservation.license_plate,
            start_date_time: reservation.start_date_time,
            end_date_time: reservation.end_date_time,
            parking_area: reservation.parking_area,
            discount_percentage: reservation.discount_percentage,
            total_cost: reservation.total_cost,
            currency: reservation.currency,
        }
    }
}

fn default_currency() -> String {
    BASE_CURRENCY.to_string()
}

/// Accepts `10`, `10.5`, `"10"`, `""` and `null`.
pub fn deserialize_percentage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text.trim().parse().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("invalid discount percentage '{text}'"))
        }),
    }
}

/// Treats an empty or whitespace-only string like a missing value.
pub fn deserialize_blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}
