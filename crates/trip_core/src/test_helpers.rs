//! Test helpers for building trip CSV fixtures.
//!
//! Shared by unit tests, integration tests and benchmarks so every fixture
//! uses the same column layout.

use std::fmt::Write;

/// Header row for the trip CSV layout (no line terminator).
pub const TRIP_CSV_HEADER: &str =
    "trip_id,pickup_zone_id,dropoff_zone_id,pickup_datetime,distance_km,fare_amount";

/// Dropoff zone used by [`trip_line`]; never counted.
pub const TEST_DROPOFF_ZONE: &str = "Dropoff";

/// One well-formed data row with fixed distance and fare columns.
///
/// `pickup_datetime` is written verbatim, so callers can pass quoted or
/// deliberately malformed values.
pub fn trip_line(trip_id: &str, pickup_zone: &str, pickup_datetime: &str) -> String {
    format!("{trip_id},{pickup_zone},{TEST_DROPOFF_ZONE},{pickup_datetime},3.2,12.0")
}

/// Header plus `lines`, each terminated by `\n`.
pub fn trip_csv<S: AsRef<str>>(lines: &[S]) -> String {
    let mut csv = String::with_capacity(TRIP_CSV_HEADER.len() + 1 + lines.len() * 48);
    csv.push_str(TRIP_CSV_HEADER);
    csv.push('\n');
    for line in lines {
        csv.push_str(line.as_ref());
        csv.push('\n');
    }
    csv
}

/// Pickup datetime on 2024-01-01 at `hour:minute`.
///
/// # Panics
///
/// Panics if `hour` or `minute` is out of range; fixtures should say so explicitly
/// with a raw string instead.
pub fn pickup_at(hour: u8, minute: u8) -> String {
    assert!(hour < 24 && minute < 60, "pickup_at({hour}, {minute}) out of range");
    format!("2024-01-01 {hour:02}:{minute:02}")
}

/// Deterministic synthetic trip CSV: `trips` rows spread over `zones` zones.
///
/// Zone `i` is named `Z{i:04}`; zone popularity and hours follow simple
/// modular patterns so results are reproducible without an RNG.
pub fn synthetic_trip_csv(trips: usize, zones: usize) -> String {
    let zones = zones.max(1);
    let mut csv = String::with_capacity(TRIP_CSV_HEADER.len() + 1 + trips * 48);
    csv.push_str(TRIP_CSV_HEADER);
    csv.push('\n');
    for i in 0..trips {
        let zone = (i * i + i / 3) % zones;
        let hour = (i / 7 + zone) % 24;
        writeln!(
            csv,
            "T{i},Z{zone:04},{TEST_DROPOFF_ZONE},2024-01-01 {hour:02}:{:02},3.2,12.0",
            i % 60
        )
        .expect("writing to a String cannot fail");
    }
    csv
}
