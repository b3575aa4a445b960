/// Zones reserved up front on every ingest pass.
const DEFAULT_INITIAL_ZONE_CAPACITY: usize = 4096;

/// Read buffer wrapped around the trip source: 64 KiB.
const DEFAULT_READ_BUFFER_BYTES: usize = 64 * 1024;

/// Performance tuning for [`TripAggregator`](crate::TripAggregator).
///
/// None of these settings change query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Number of zones to reserve registry and counter capacity for at the start of each ingest.
    pub initial_zone_capacity: usize,
    /// Size of the buffered reader placed in front of the trip source.
    pub read_buffer_bytes: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            initial_zone_capacity: DEFAULT_INITIAL_ZONE_CAPACITY,
            read_buffer_bytes: DEFAULT_READ_BUFFER_BYTES,
        }
    }
}

impl AggregatorConfig {
    /// Reserve space for this many distinct zones per ingest (0 = grow on demand).
    pub fn with_initial_zone_capacity(mut self, zones: usize) -> Self {
        self.initial_zone_capacity = zones;
        self
    }

    /// Set the read buffer size in bytes. Values below 1 are raised to 1.
    pub fn with_read_buffer_bytes(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(1);
        self
    }
}
