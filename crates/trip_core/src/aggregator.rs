//! The trip aggregator: one streaming pass over a trip CSV, then ranked queries.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::config::AggregatorConfig;
use crate::parse::{parse_trip_line, trim_line_terminator};
use crate::ranking::{self, SlotCount, ZoneCount};
use crate::registry::ZoneRegistry;

/// Number of hour-of-day buckets per zone.
pub const HOURS_PER_DAY: usize = 24;

/// Trip counts for one zone, indexed by pickup hour.
pub type HourHistogram = [u64; HOURS_PER_DAY];

/// Counts trips per pickup zone and per (zone, hour) slot.
///
/// All state belongs to the last [`ingest`](Self::ingest) or
/// [`ingest_reader`](Self::ingest_reader) call and is replaced wholesale by the
/// next one. Sources that cannot be opened or read, and lines that fail
/// validation, are never reported as errors; they only show up in `tracing`
/// output and in the (possibly empty) counters.
#[derive(Debug, Default)]
pub struct TripAggregator {
    config: AggregatorConfig,
    registry: ZoneRegistry,
    /// Total trips per zone, parallel to the registry index space.
    zone_totals: Vec<u64>,
    /// Per-hour trips per zone, parallel to the registry index space.
    zone_hours: Vec<HourHistogram>,
}

impl TripAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AggregatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace all counters with the trips read from the CSV file at `path`.
    ///
    /// The first line is a header and is skipped. If the file cannot be
    /// opened the aggregator is left empty.
    pub fn ingest(&mut self, path: impl AsRef<Path>) {
        self.clear();

        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "trip source unavailable, aggregator left empty"
                );
                return;
            }
        };

        let reader = self.buffered(file);
        self.accumulate(reader);
    }

    /// Replace all counters with the trips read from an already open source.
    ///
    /// Same contract as [`ingest`](Self::ingest). A read error part way
    /// through ends the pass and keeps the trips counted before it.
    pub fn ingest_reader(&mut self, reader: impl Read) {
        self.clear();
        let reader = self.buffered(reader);
        self.accumulate(reader);
    }

    /// Up to `k` zones ranked by trip count (descending), ties by zone name.
    pub fn top_zones(&self, k: usize) -> Vec<ZoneCount> {
        let candidates = self
            .registry
            .names()
            .zip(self.zone_totals.iter().copied());
        ranking::top_zones(candidates, k)
    }

    /// Up to `k` non-empty (zone, hour) slots ranked by trip count
    /// (descending), ties by zone name then hour.
    pub fn top_busy_slots(&self, k: usize) -> Vec<SlotCount> {
        let candidates = self
            .registry
            .names()
            .zip(self.zone_hours.iter())
            .flat_map(|(zone, hours)| {
                hours
                    .iter()
                    .enumerate()
                    .filter(|&(_, &count)| count > 0)
                    .map(move |(hour, &count)| (zone, hour as u8, count))
            });
        ranking::top_slots(candidates, k)
    }

    /// Number of distinct pickup zones seen.
    pub fn distinct_zones(&self) -> usize {
        self.registry.len()
    }

    /// Number of accepted trip lines.
    pub fn total_trips(&self) -> u64 {
        self.zone_totals.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Total trips picked up in `zone`, or `None` if the zone was never seen.
    ///
    /// Zones are matched on their raw bytes, so both `"ZoneA"` and a key
    /// taken from [`zone_names`](Self::zone_names) work.
    pub fn zone_total(&self, zone: impl AsRef<[u8]>) -> Option<u64> {
        self.registry
            .get(zone.as_ref())
            .map(|idx| self.zone_totals[idx])
    }

    /// Per-hour trips picked up in `zone`, or `None` if the zone was never seen.
    pub fn zone_hours(&self, zone: impl AsRef<[u8]>) -> Option<&HourHistogram> {
        self.registry
            .get(zone.as_ref())
            .map(|idx| &self.zone_hours[idx])
    }

    /// Raw zone keys in first-seen order.
    pub fn zone_names(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.registry.names()
    }

    fn clear(&mut self) {
        self.registry.clear();
        self.zone_totals.clear();
        self.zone_hours.clear();
    }

    /// Buffer at least one byte: a zero-capacity `BufReader` reports end of
    /// input on its first read.
    fn buffered<R: Read>(&self, reader: R) -> BufReader<R> {
        BufReader::with_capacity(self.config.read_buffer_bytes.max(1), reader)
    }

    fn accumulate<R: BufRead>(&mut self, mut reader: R) {
        let mut line = Vec::new();

        match reader.read_until(b'\n', &mut line) {
            Ok(0) => return,
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "failed to read trip header, aggregator left empty");
                return;
            }
        }

        let capacity = self.config.initial_zone_capacity;
        self.registry.reserve(capacity);
        self.zone_totals.reserve(capacity);
        self.zone_hours.reserve(capacity);

        let mut line_number: u64 = 1;
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => line_number += 1,
                Err(err) => {
                    warn!(
                        line = line_number + 1,
                        error = %err,
                        "trip source read failed, keeping trips counted so far"
                    );
                    break;
                }
            }

            let record = trim_line_terminator(&line);
            if record.is_empty() {
                continue;
            }

            match parse_trip_line(record) {
                Ok(fields) => self.record_trip(fields.pickup_zone, fields.pickup_hour),
                Err(reason) => trace!(line = line_number, %reason, "skipping trip line"),
            }
        }

        debug!(
            zones = self.distinct_zones(),
            trips = self.total_trips(),
            "trip ingest complete"
        );
    }

    fn record_trip(&mut self, zone: &[u8], hour: u8) {
        let (idx, inserted) = self.registry.get_or_insert(zone);
        if inserted {
            self.zone_totals.push(0);
            self.zone_hours.push([0; HOURS_PER_DAY]);
        }

        self.zone_totals[idx] += 1;
        self.zone_hours[idx][usize::from(hour)] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{trip_csv, trip_line, TRIP_CSV_HEADER};

    fn aggregate(csv: &str) -> TripAggregator {
        let mut aggregator = TripAggregator::new();
        aggregator.ingest_reader(csv.as_bytes());
        aggregator
    }

    #[test]
    fn test_empty_source() {
        let aggregator = aggregate("");
        assert!(aggregator.is_empty());
        assert!(aggregator.top_zones(5).is_empty());
        assert!(aggregator.top_busy_slots(5).is_empty());
    }

    #[test]
    fn test_header_only_source() {
        let aggregator = aggregate(&format!("{TRIP_CSV_HEADER}\n"));
        assert!(aggregator.is_empty());

        // A header without a newline is still just a header.
        let aggregator = aggregate(TRIP_CSV_HEADER);
        assert!(aggregator.is_empty());
    }

    #[test]
    fn test_header_is_never_counted() {
        let csv = format!(
            "{}\n{}\n",
            trip_line("T0", "Header", "2024-01-01 01:00"),
            trip_line("T1", "ZoneA", "2024-01-01 02:00"),
        );
        let aggregator = aggregate(&csv);
        assert_eq!(aggregator.zone_total("Header"), None);
        assert_eq!(aggregator.zone_total("ZoneA"), Some(1));
    }

    #[test]
    fn test_record_trip_updates_both_counters() {
        let aggregator = aggregate(&trip_csv(&[
            trip_line("T1", "ZoneA", "2024-01-01 08:15"),
            trip_line("T2", "ZoneA", "2024-01-01 08:50"),
            trip_line("T3", "ZoneA", "2024-01-01 21:00"),
        ]));

        assert_eq!(aggregator.zone_total("ZoneA"), Some(3));
        let hours = aggregator.zone_hours("ZoneA").unwrap();
        assert_eq!(hours[8], 2);
        assert_eq!(hours[21], 1);
        assert_eq!(hours.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_zone_names_in_first_seen_order() {
        let aggregator = aggregate(&trip_csv(&[
            trip_line("T1", "Zulu", "2024-01-01 08:15"),
            trip_line("T2", "Alpha", "2024-01-01 08:50"),
            trip_line("T3", "Zulu", "2024-01-01 09:05"),
        ]));
        let names: Vec<&[u8]> = aggregator.zone_names().collect();
        assert_eq!(names, vec![&b"Zulu"[..], &b"Alpha"[..]]);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let csv = format!(
            "{TRIP_CSV_HEADER}\r\n\r\n{}\r\n\n{}\r\n",
            trip_line("T1", "ZoneA", "2024-01-01 08:15"),
            trip_line("T2", "ZoneB", "2024-01-01 09:15"),
        );
        let aggregator = aggregate(&csv);
        assert_eq!(aggregator.total_trips(), 2);
        assert_eq!(aggregator.distinct_zones(), 2);
    }

    #[test]
    fn test_last_line_without_newline() {
        let csv = format!(
            "{TRIP_CSV_HEADER}\n{}",
            trip_line("T1", "ZoneA", "2024-01-01 08:15")
        );
        assert_eq!(aggregate(&csv).zone_total("ZoneA"), Some(1));
    }

    #[test]
    fn test_ingest_reader_replaces_state() {
        let mut aggregator = aggregate(&trip_csv(&[trip_line("T1", "Old", "2024-01-01 08:15")]));
        aggregator.ingest_reader(trip_csv(&[trip_line("T1", "New", "2024-01-01 10:15")]).as_bytes());

        assert_eq!(aggregator.zone_total("Old"), None);
        assert_eq!(aggregator.zone_total("New"), Some(1));
        assert_eq!(aggregator.total_trips(), 1);
    }

    #[test]
    fn test_missing_path_clears_state() {
        let mut aggregator = aggregate(&trip_csv(&[trip_line("T1", "ZoneA", "2024-01-01 08:15")]));
        aggregator.ingest("/nonexistent/trips.csv");
        assert!(aggregator.is_empty());
        assert!(aggregator.top_zones(5).is_empty());
    }

    #[test]
    fn test_tiny_read_buffer_gives_same_counts() {
        let csv = trip_csv(&[
            trip_line("T1", "ZoneA", "2024-01-01 08:15"),
            trip_line("T2", "ZoneB", "\"2024-01-01 09:15\""),
            trip_line("T3", "ZoneA", "2024-01-01 08:45"),
        ]);
        let mut aggregator = TripAggregator::with_config(
            AggregatorConfig::default()
                .with_read_buffer_bytes(3)
                .with_initial_zone_capacity(0),
        );
        aggregator.ingest_reader(csv.as_bytes());

        assert_eq!(aggregator.top_zones(5), aggregate(&csv).top_zones(5));
        assert_eq!(aggregator.zone_hours("ZoneB").unwrap()[9], 1);
    }

    #[test]
    fn test_zero_read_buffer_still_counts() {
        let csv = trip_csv(&[
            trip_line("T1", "ZoneA", "2024-01-01 08:15"),
            trip_line("T2", "ZoneA", "2024-01-01 09:15"),
        ]);
        let config = AggregatorConfig {
            read_buffer_bytes: 0,
            ..AggregatorConfig::default()
        };

        let mut aggregator = TripAggregator::with_config(config);
        aggregator.ingest_reader(csv.as_bytes());
        assert_eq!(aggregator.total_trips(), 2);
        assert_eq!(aggregator.zone_total("ZoneA"), Some(2));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trips.csv");
        std::fs::write(&path, &csv).unwrap();
        let mut aggregator = TripAggregator::with_config(config);
        aggregator.ingest(&path);
        assert_eq!(aggregator.total_trips(), 2);
    }

    #[test]
    fn test_non_utf8_zone_is_counted() {
        let mut csv = trip_csv(&[trip_line("T1", "ZoneA", "2024-01-01 08:15")]).into_bytes();
        csv.extend_from_slice(b"T2,Zone\xff,Z2,2024-01-01 09:30,5.0,10.0\n");
        let mut aggregator = TripAggregator::new();
        aggregator.ingest_reader(csv.as_slice());

        assert_eq!(aggregator.total_trips(), 2);
        assert_eq!(aggregator.zone_total(b"Zone\xff"), Some(1));
        assert_eq!(aggregator.zone_hours(b"Zone\xff").unwrap()[9], 1);
    }

    #[test]
    fn test_slots_skip_empty_hours() {
        let aggregator = aggregate(&trip_csv(&[trip_line("T1", "ZoneA", "2024-01-01 00:15")]));
        let slots = aggregator.top_busy_slots(HOURS_PER_DAY);
        assert_eq!(
            slots,
            vec![SlotCount {
                zone: "ZoneA".into(),
                hour: 0,
                count: 1,
            }]
        );
    }
}
