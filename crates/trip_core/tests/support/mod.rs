#![allow(dead_code)]

use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use tempfile::NamedTempFile;
use trip_core::test_helpers::TRIP_CSV_HEADER;
use trip_core::TripAggregator;

/// One trip row as the fixture writer emits it.
#[derive(Clone, Debug)]
pub struct TripRow {
    pub trip_id: String,
    pub pickup_zone: String,
    pub dropoff_zone: String,
    pub pickup_datetime: String,
    pub distance_km: f64,
    pub fare_amount: f64,
}

impl TripRow {
    pub fn new(trip_id: &str, pickup_zone: &str, pickup_datetime: &str) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            pickup_zone: pickup_zone.to_string(),
            dropoff_zone: "Dropoff".to_string(),
            pickup_datetime: pickup_datetime.to_string(),
            distance_km: 3.2,
            fare_amount: 12.0,
        }
    }

    pub fn dropoff(mut self, zone: &str) -> Self {
        self.dropoff_zone = zone.to_string();
        self
    }

    fn record(&self) -> [String; 6] {
        [
            self.trip_id.clone(),
            self.pickup_zone.clone(),
            self.dropoff_zone.clone(),
            self.pickup_datetime.clone(),
            self.distance_km.to_string(),
            self.fare_amount.to_string(),
        ]
    }
}

/// Write `rows` under the standard header to a temp file using the csv writer.
pub fn write_trip_file(rows: &[TripRow]) -> NamedTempFile {
    write_trip_file_with_quotes(rows, QuoteStyle::Necessary)
}

/// Same as [`write_trip_file`] with an explicit quoting style for data rows.
///
/// The header is always written unquoted.
pub fn write_trip_file_with_quotes(rows: &[TripRow], quote_style: QuoteStyle) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file should be created");
    writeln!(file, "{TRIP_CSV_HEADER}").expect("header should be written");
    {
        let mut wtr = WriterBuilder::new()
            .flexible(true)
            .quote_style(quote_style)
            .from_writer(file.as_file_mut());
        for row in rows {
            wtr.write_record(row.record()).expect("row should be written");
        }
        wtr.flush().expect("rows should flush");
    }
    file
}

/// Write raw text lines (no quoting applied) under the standard header.
pub fn write_raw_trip_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file should be created");
    writeln!(file, "{TRIP_CSV_HEADER}").expect("header should be written");
    for line in lines {
        writeln!(file, "{line}").expect("line should be written");
    }
    file.flush().expect("temp file should flush");
    file
}

/// Ingest a fixture file into a fresh aggregator.
pub fn ingest_file(file: &NamedTempFile) -> TripAggregator {
    let mut aggregator = TripAggregator::new();
    aggregator.ingest(file.path());
    aggregator
}

/// `(zone, count)` pairs for compact assertions.
pub fn zone_pairs(aggregator: &TripAggregator, k: usize) -> Vec<(String, u64)> {
    aggregator
        .top_zones(k)
        .into_iter()
        .map(|entry| (entry.zone, entry.count))
        .collect()
}

/// `(zone, hour, count)` triples for compact assertions.
pub fn slot_triples(aggregator: &TripAggregator, k: usize) -> Vec<(String, u8, u64)> {
    aggregator
        .top_busy_slots(k)
        .into_iter()
        .map(|slot| (slot.zone, slot.hour, slot.count))
        .collect()
}
