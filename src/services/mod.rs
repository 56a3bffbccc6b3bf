//! Business logic services.
//!
//! Services contain the fee rules, currency conversion and record handling,
//! kept apart from the HTTP handlers.

pub mod currency_converter;
pub mod exchange_rates;
pub mod fee_calculator;
pub mod parking_code;
pub mod pricing;
pub mod reservation_service;
