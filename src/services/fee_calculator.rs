//! Hourly parking fee calculation.
//!
//! The interval is split into whole hours counted from the start. Each hour is
//! charged at the weekend rate when its starting instant falls on a Saturday or
//! Sunday, otherwise at the weekday rate. A trailing partial hour is not charged.
//!
//! Any 168 consecutive hourly instants hit every hour of the week exactly once,
//! so whole weeks are charged in one step and only the remainder is walked.

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};

/// Hourly rate Monday to Friday, in the base currency.
pub const WEEKDAY_RATE: f64 = 1.15;

/// Hourly rate on Saturday and Sunday.
pub const WEEKEND_RATE: f64 = WEEKDAY_RATE * WEEKEND_MULTIPLIER;

const WEEKEND_MULTIPLIER: f64 = 1.3;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

const HOURS_PER_WEEK: i64 = 7 * 24;

/// Cost of 168 consecutive hours: five weekdays and two weekend days.
const WEEK_COST: f64 = 120.0 * WEEKDAY_RATE + 48.0 * WEEKEND_RATE;

/// Reasons a fee cannot be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FeeError {
    /// The end instant is not strictly after the start instant.
    #[error("End time must be after start time.")]
    InvalidInterval,
}

/// Compute the parking fee for `[start, end)` in the base currency.
///
/// # Arguments
///
/// * `start` - First instant of the stay
/// * `end` - Instant the stay ends, must be after `start`
/// * `discount_percent` - Optional percentage subtracted from the summed cost
///
/// # Returns
///
/// The unrounded cost. The discount is not bounded here, so a percentage above
/// 100 yields a negative amount.
///
/// # Errors
///
/// - `InvalidInterval`: `end <= start`
pub fn compute_fee(
    start: NaiveDateTime,
    end: NaiveDateTime,
    discount_percent: Option<f64>,
) -> Result<f64, FeeError> {
    if end <= start {
        return Err(FeeError::InvalidInterval);
    }

    // Whole hours only; the remainder of a partial final hour is dropped
    let whole_hours = (end - start).num_milliseconds() / MILLIS_PER_HOUR;

    let full_weeks = whole_hours / HOURS_PER_WEEK;
    let remainder_start = start + Duration::hours(full_weeks * HOURS_PER_WEEK);

    let remainder: f64 = (0..whole_hours % HOURS_PER_WEEK)
        .map(|hour| hourly_rate(remainder_start + Duration::hours(hour)))
        .sum();
    let cost = full_weeks as f64 * WEEK_COST + remainder;

    let discount = discount_percent.map_or(0.0, |percent| cost * (percent / 100.0));

    Ok(cost - discount)
}

/// Rate charged for the hour beginning at `instant`.
pub fn hourly_rate(instant: NaiveDateTime) -> f64 {
    match instant.weekday() {
        Weekday::Sat | Weekday::Sun => WEEKEND_RATE,
        _ => WEEKDAY_RATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn weekend_rate_is_derived_from_weekday_rate() {
        assert_close(WEEKEND_RATE, 1.495);
    }

    #[test]
    fn one_hour_on_tuesday() {
        let fee = compute_fee(at("2024-06-04T10:00"), at("2024-06-04T11:00"), None).unwrap();
        assert_close(fee, 1.15);
    }

    #[test]
    fn one_hour_on_saturday() {
        let fee = compute_fee(at("2024-06-08T10:00"), at("2024-06-08T11:00"), None).unwrap();
        assert_close(fee, 1.495);
    }

    #[test]
    fn monday_morning_with_discount() {
        let fee = compute_fee(at("2024-06-03T08:00"), at("2024-06-03T11:00"), Some(10.0)).unwrap();
        assert_close(fee, 3.105);
    }

    #[test]
    fn rate_follows_each_hour_across_midnight() {
        // Friday 23:00 is a weekday hour, Saturday 00:00 a weekend hour
        let fee = compute_fee(at("2024-06-07T23:00"), at("2024-06-08T01:00"), None).unwrap();
        assert_close(fee, WEEKDAY_RATE + WEEKEND_RATE);

        // Sunday 23:00 is a weekend hour, Monday 00:00 a weekday hour
        let fee = compute_fee(at("2024-06-09T23:00"), at("2024-06-10T01:00"), None).unwrap();
        assert_close(fee, WEEKEND_RATE + WEEKDAY_RATE);
    }

    #[test]
    fn full_week_charges_five_weekdays_and_two_weekend_days() {
        let fee = compute_fee(at("2024-06-03T00:00"), at("2024-06-10T00:00"), None).unwrap();
        assert_close(fee, 24.0 * (5.0 * WEEKDAY_RATE + 2.0 * WEEKEND_RATE));
    }

    /// Charge hour by hour, for comparison with the weekly shortcut.
    fn hour_by_hour(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        let whole_hours = (end - start).num_milliseconds() / MILLIS_PER_HOUR;
        (0..whole_hours)
            .map(|hour| hourly_rate(start + Duration::hours(hour)))
            .sum()
    }

    #[test]
    fn weekly_shortcut_matches_hourly_walk() {
        let starts = ["2024-06-03T00:00", "2024-06-07T17:45", "2024-06-09T23:10"];
        for start in starts.map(at) {
            for hours in [1, 167, 168, 169, 300, 1000, 2017] {
                let end = start + Duration::hours(hours) + Duration::minutes(20);
                let fee = compute_fee(start, end, None).unwrap();
                let expected = hour_by_hour(start, end);
                assert!(
                    (fee - expected).abs() < 1e-6,
                    "{start} + {hours}h: expected {expected}, got {fee}"
                );
            }
        }
    }

    #[test]
    fn multi_century_interval_is_charged_per_week() {
        // 400 Gregorian years are exactly 20871 weeks
        let started = std::time::Instant::now();
        let fee = compute_fee(at("2000-01-01T00:00"), at("2400-01-01T00:00"), None).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        let expected = 20871.0 * WEEK_COST;
        assert!((fee - expected).abs() / expected < 1e-12);

        let widest = compute_fee(at("0001-01-01T00:00"), at("9999-12-31T00:00"), None).unwrap();
        let hours = (at("9999-12-31T00:00") - at("0001-01-01T00:00")).num_hours() as f64;
        assert!(widest >= WEEKDAY_RATE * hours && widest <= WEEKEND_RATE * hours);
    }

    #[test]
    fn partial_final_hour_is_not_charged() {
        let fee = compute_fee(at("2024-06-04T10:00"), at("2024-06-04T12:59"), None).unwrap();
        assert_close(fee, 2.0 * WEEKDAY_RATE);

        let fee = compute_fee(at("2024-06-04T10:00"), at("2024-06-04T10:30"), None).unwrap();
        assert_close(fee, 0.0);
    }

    #[test]
    fn end_not_after_start_is_rejected() {
        let start = at("2024-06-04T10:00");
        assert_eq!(compute_fee(start, start, None), Err(FeeError::InvalidInterval));
        assert_eq!(
            compute_fee(start, at("2024-06-04T09:00"), Some(10.0)),
            Err(FeeError::InvalidInterval)
        );
    }

    #[test]
    fn discount_above_hundred_is_not_clamped() {
        let fee = compute_fee(at("2024-06-04T10:00"), at("2024-06-04T12:00"), Some(150.0)).unwrap();
        assert_close(fee, -1.15);
    }

    #[test]
    fn zero_discount_matches_no_discount() {
        let start = at("2024-06-06T18:00");
        let end = at("2024-06-08T06:00");
        assert_close(
            compute_fee(start, end, Some(0.0)).unwrap(),
            compute_fee(start, end, None).unwrap(),
        );
    }

    #[test]
    fn fee_grows_with_interval_and_covers_weekday_floor() {
        let start = at("2024-06-05T13:00");
        let mut previous = 0.0;

        for minutes in (1..=(10 * 24 * 60)).step_by(37) {
            let end = start + Duration::minutes(minutes);
            let fee = compute_fee(start, end, None).unwrap();
            let whole_hours = (minutes / 60) as f64;

            assert!(fee >= previous - 1e-9, "fee decreased at {minutes} minutes");
            assert!(fee >= WEEKDAY_RATE * whole_hours - 1e-9);
            previous = fee;
        }
    }
}
