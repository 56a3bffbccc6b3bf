//! Reservation service - create, list, update and delete parking reservations.
//!
//! Every operation opens its own session on the document store. A session is
//! released when the function returns, whichever path it returns by, and any
//! unsaved changes die with it.
//!
//! # Update policy
//!
//! Updates overwrite every client-editable field. The parking area code is
//! assigned once at creation and never changed. `discountPercentage` and
//! `currency` are replaced when supplied and kept when omitted.

use crate::{
    error::AppError,
    models::reservation::{BASE_CURRENCY, Reservation, ReservationRequest, ReservationResponse},
    services::{
        currency_converter::CurrencyConverter,
        parking_code::{generate_parking_code, is_valid_parking_code},
        pricing,
    },
    store::{DocumentStore, StoreError},
};

/// Persist a new reservation.
///
/// # Process
///
/// 1. Validate the request
/// 2. Keep the supplied parking area code or generate one
/// 3. Compute the total when the client did not send one
/// 4. Store the document and save
///
/// # Errors
///
/// - `InvalidRequest`: validation failed
/// - `InvalidInterval` / `UnknownCurrency`: the total had to be computed and could not be
/// - `Store`: the document could not be saved
pub async fn create_reservation(
    store: &dyn DocumentStore,
    converter: &CurrencyConverter,
    request: ReservationRequest,
) -> Result<ReservationResponse, AppError> {
    validate(&request)?;

    let parking_area = match request.parking_area.clone() {
        Some(code) => code,
        None => generate_parking_code(&mut rand::rng()),
    };
    let discount_percentage = request.discount_percentage.unwrap_or(0.0);
    let currency = request
        .currency
        .clone()
        .unwrap_or_else(|| BASE_CURRENCY.to_string());
    let total_cost = resolve_total(converter, &request, discount_percentage, &currency)?;

    let reservation = Reservation {
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        car_model: request.car_model,
        license_plate: request.license_plate,
        start_date_time: request.start_date_time,
        end_date_time: request.end_date_time,
        discount_percentage,
        parking_area,
        total_cost,
        currency,
    };

    let body = serde_json::to_value(&reservation)
        .map_err(StoreError::from)
        .map_err(AppError::store("saving data"))?;

    let mut session = store.open_session();
    let id = session.store(None, body);
    session
        .save_changes()
        .await
        .map_err(AppError::store("saving data"))?;

    tracing::info!(
        "Saved reservation {} in parking area {}",
        id,
        reservation.parking_area
    );

    Ok(ReservationResponse::from_document(id, reservation))
}

/// List every reservation in the store's default order.
///
/// # Errors
///
/// - `Store`: the query failed or a document could not be decoded
pub async fn list_reservations(
    store: &dyn DocumentStore,
) -> Result<Vec<ReservationResponse>, AppError> {
    let mut session = store.open_session();
    let documents = session
        .query_all()
        .await
        .map_err(AppError::store("retrieving data"))?;

    documents
        .into_iter()
        .map(|doc| {
            let reservation: Reservation = serde_json::from_value(doc.body)
                .map_err(StoreError::from)
                .map_err(AppError::store("retrieving data"))?;
            Ok(ReservationResponse::from_document(doc.id, reservation))
        })
        .collect()
}

/// Overwrite an existing reservation, see the module docs for which fields change.
///
/// # Errors
///
/// - `NotFound`: no reservation with this id
/// - `InvalidRequest`: validation failed
/// - `InvalidInterval` / `UnknownCurrency`: the total had to be computed and could not be
/// - `Store`: loading or saving failed
pub async fn update_reservation(
    store: &dyn DocumentStore,
    converter: &CurrencyConverter,
    id: &str,
    request: ReservationRequest,
) -> Result<(), AppError> {
    let mut session = store.open_session();
    let document = session
        .load(id)
        .await
        .map_err(AppError::store("updating data"))?
        .ok_or(AppError::NotFound)?;

    let existing: Reservation = serde_json::from_value(document.body)
        .map_err(StoreError::from)
        .map_err(AppError::store("updating data"))?;

    validate(&request)?;

    let discount_percentage = request
        .discount_percentage
        .unwrap_or(existing.discount_percentage);
    let currency = request.currency.clone().unwrap_or(existing.currency);
    let total_cost = resolve_total(converter, &request, discount_percentage, &currency)?;

    let updated = Reservation {
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        car_model: request.car_model,
        license_plate: request.license_plate,
        start_date_time: request.start_date_time,
        end_date_time: request.end_date_time,
        discount_percentage,
        parking_area: existing.parking_area,
        total_cost,
        currency,
    };

    let body = serde_json::to_value(&updated)
        .map_err(StoreError::from)
        .map_err(AppError::store("updating data"))?;

    session.store(Some(document.id), body);
    session
        .save_changes()
        .await
        .map_err(AppError::store("updating data"))?;

    tracing::info!("Updated reservation {}", id);

    Ok(())
}

/// Delete a reservation by id.
///
/// # Errors
///
/// - `NotFound`: no reservation with this id
/// - `Store`: loading or deleting failed
pub async fn delete_reservation(store: &dyn DocumentStore, id: &str) -> Result<(), AppError> {
    let mut session = store.open_session();
    let document = session
        .load(id)
        .await
        .map_err(AppError::store("deleting data"))?
        .ok_or(AppError::NotFound)?;

    session.delete(&document.id);
    session
        .save_changes()
        .await
        .map_err(AppError::store("deleting data"))?;

    tracing::info!("Deleted reservation {}", id);

    Ok(())
}

/// Use the client's total when given, otherwise quote the stay.
fn resolve_total(
    converter: &CurrencyConverter,
    request: &ReservationRequest,
    discount_percentage: f64,
    currency: &str,
) -> Result<f64, AppError> {
    if let Some(total) = request.total_cost {
        return Ok(total);
    }

    let quote = pricing::quote(
        converter,
        request.start_date_time.naive(),
        request.end_date_time.naive(),
        Some(discount_percentage),
        Some(currency),
    )?;
    Ok(quote.total_cost)
}

/// Check the record invariants before anything touches the store.
fn validate(request: &ReservationRequest) -> Result<(), AppError> {
    let required = [
        ("firstName", &request.first_name),
        ("lastName", &request.last_name),
        ("phone", &request.phone),
        ("carModel", &request.car_model),
        ("licensePlate", &request.license_plate),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(AppError::InvalidRequest(format!("{field} is required")));
    }

    if request.end_date_time <= request.start_date_time {
        return Err(AppError::InvalidInterval);
    }

    pricing::validate_discount(request.discount_percentage)?;

    if let Some(total) = request.total_cost {
        if !total.is_finite() || total < 0.0 {
            return Err(AppError::InvalidRequest(
                "totalCost must not be negative".to_string(),
            ));
        }
    }

    if let Some(code) = &request.parking_area {
        if !is_valid_parking_code(code) {
            return Err(AppError::InvalidRequest(format!(
                "parkingArea '{code}' must be one uppercase letter followed by two digits"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parking_time::ParkingTime;
    use crate::store::memory::MemoryDocumentStore;
    use std::collections::HashMap;

    fn request(start: &str, end: &str) -> ReservationRequest {
        ReservationRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: "555-0100".to_string(),
            car_model: "Model T".to_string(),
            license_plate: "AB123".to_string(),
            start_date_time: start.parse::<ParkingTime>().unwrap(),
            end_date_time: end.parse::<ParkingTime>().unwrap(),
            discount_percentage: None,
            parking_area: None,
            total_cost: None,
            currency: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_code_and_computes_total() {
        let store = MemoryDocumentStore::new();
        let converter = CurrencyConverter::new();
        let mut req = request("2024-06-03T08:00", "2024-06-03T11:00");
        req.discount_percentage = Some(10.0);

        let created = create_reservation(&store, &converter, req).await.unwrap();

        assert!(is_valid_parking_code(&created.parking_area));
        assert!((created.total_cost - 3.105).abs() < 1e-9);
        assert_eq!(created.currency, "USD");

        let listed = list_reservations(&store).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn create_keeps_client_code_and_total() {
        let store = MemoryDocumentStore::new();
        let converter = CurrencyConverter::new();
        let mut req = request("2024-06-03T08:00", "2024-06-03T11:00");
        req.parking_area = Some("Q07".to_string());
        req.total_cost = Some(12.5);
        req.currency = Some("EUR".to_string());

        let created = create_reservation(&store, &converter, req).await.unwrap();

        assert_eq!(created.parking_area, "Q07");
        assert_eq!(created.total_cost, 12.5);
        assert_eq!(created.currency, "EUR");
    }

    #[tokio::test]
    async fn create_converts_computed_total() {
        let store = MemoryDocumentStore::new();
        let converter = CurrencyConverter::with_rates(HashMap::from([("PLN".to_string(), 4.0)]));
        let mut req = request("2024-06-04T10:00", "2024-06-04T11:00");
        req.currency = Some("PLN".to_string());

        let created = create_reservation(&store, &converter, req).await.unwrap();
        assert!((created.total_cost - 4.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn create_rejects_invalid_records() {
        let store = MemoryDocumentStore::new();
        let converter = CurrencyConverter::new();

        let mut blank = request("2024-06-03T08:00", "2024-06-03T11:00");
        blank.license_plate = "  ".to_string();
        assert!(matches!(
            create_reservation(&store, &converter, blank).await,
            Err(AppError::InvalidRequest(msg)) if msg == "licensePlate is required"
        ));

        let backwards = request("2024-06-03T11:00", "2024-06-03T08:00");
        assert!(matches!(
            create_reservation(&store, &converter, backwards).await,
            Err(AppError::InvalidInterval)
        ));

        let mut discount = request("2024-06-03T08:00", "2024-06-03T11:00");
        discount.discount_percentage = Some(120.0);
        assert!(matches!(
            create_reservation(&store, &converter, discount).await,
            Err(AppError::InvalidRequest(_))
        ));

        let mut code = request("2024-06-03T08:00", "2024-06-03T11:00");
        code.parking_area = Some("12A".to_string());
        assert!(matches!(
            create_reservation(&store, &converter, code).await,
            Err(AppError::InvalidRequest(_))
        ));

        let mut currency = request("2024-06-03T08:00", "2024-06-03T11:00");
        currency.currency = Some("ZZZ".to_string());
        assert!(matches!(
            create_reservation(&store, &converter, currency).await,
            Err(AppError::UnknownCurrency(code)) if code == "ZZZ"
        ));

        assert!(list_reservations(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_parking_area() {
        let store = MemoryDocumentStore::new();
        let converter = CurrencyConverter::new();
        let mut req = request("2024-06-03T08:00", "2024-06-03T11:00");
        req.discount_percentage = Some(10.0);
        req.currency = Some("EUR".to_string());
        req.total_cost = Some(3.0);
        let created = create_reservation(&store, &converter, req).await.unwrap();

        let mut change = request("2024-06-08T10:00", "2024-06-08T12:00");
        change.first_name = "Grace".to_string();
        change.parking_area = Some("Z99".to_string());
        change.total_cost = Some(2.99);
        update_reservation(&store, &converter, &created.id, change)
            .await
            .unwrap();

        let listed = list_reservations(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        let updated = &listed[0];
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.first_name, "Grace");
        assert_eq!(updated.parking_area, created.parking_area);
        assert_eq!(updated.start_date_time.to_string(), "2024-06-08T10:00");
        assert_eq!(updated.total_cost, 2.99);
        // Omitted optional fields are preserved
        assert_eq!(updated.discount_percentage, 10.0);
        assert_eq!(updated.currency, "EUR");
    }

    #[tokio::test]
    async fn update_and_delete_missing_id_fail_with_not_found() {
        let store = MemoryDocumentStore::new();
        let converter = CurrencyConverter::new();

        let result = update_reservation(
            &store,
            &converter,
            "missing",
            request("2024-06-03T08:00", "2024-06-03T11:00"),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound)));

        assert!(matches!(
            delete_reservation(&store, "missing").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_removes_reservation() {
        let store = MemoryDocumentStore::new();
        let converter = CurrencyConverter::new();
        let first = create_reservation(
            &store,
            &converter,
            request("2024-06-03T08:00", "2024-06-03T11:00"),
        )
        .await
        .unwrap();
        let second = create_reservation(
            &store,
            &converter,
            request("2024-06-04T08:00", "2024-06-04T09:00"),
        )
        .await
        .unwrap();

        delete_reservation(&store, &first.id).await.unwrap();

        let listed = list_reservations(&store).await.unwrap();
        assert_eq!(listed, vec![second]);
        assert!(matches!(
            delete_reservation(&store, &first.id).await,
            Err(AppError::NotFound)
        ));
    }
}
