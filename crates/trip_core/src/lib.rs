//! Streaming trip aggregation: busiest pickup zones and zone/hour slots.
//!
//! This crate reads a CSV of trip records in a single pass, counting trips per
//! pickup zone and per (zone, hour-of-day) slot, and answers exact top-k queries
//! over those counters.
//!
//! # Quick Start
//!
//! ```no_run
//! use trip_core::TripAggregator;
//!
//! let mut aggregator = TripAggregator::new();
//! aggregator.ingest("trips.csv");
//!
//! for entry in aggregator.top_zones(10) {
//!     println!("{} {}", entry.zone, entry.count);
//! }
//! for slot in aggregator.top_busy_slots(10) {
//!     println!("{} {:02}:00 {}", slot.zone, slot.hour, slot.count);
//! }
//! ```
//!
//! # Architecture
//!
//! - [`parse`]: delimiter scanning and fixed-offset hour extraction over borrowed bytes
//! - [`registry`]: raw zone key to dense index mapping
//! - [`ranking`]: exact top-k selection and result orderings
//! - [`aggregator`]: the [`TripAggregator`] that owns all state
//! - [`config`]: capacity and buffer tuning
//!
//! Input problems never surface as errors: unreadable sources leave the
//! aggregator empty and malformed lines are skipped. Both are reported
//! through `tracing` only.

pub mod aggregator;
pub mod config;
pub mod parse;
pub mod ranking;
pub mod registry;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use aggregator::{HourHistogram, TripAggregator, HOURS_PER_DAY};
pub use config::AggregatorConfig;
pub use parse::{parse_pickup_hour, parse_trip_line, LineRejection, TripFields};
pub use ranking::{SlotCount, ZoneCount};
