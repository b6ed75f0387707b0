//! Event logger traits — where assembled telemetry events are recorded.
//!
//! An event carries low-cardinality tags and high-cardinality fields. The
//! logger hands out a fresh event per name; the producer fills it in and
//! records it. Recording is fire-and-forget.

use std::collections::BTreeMap;

/// Tag set: low-cardinality dimensions.
pub type Tags = BTreeMap<String, String>;

/// Field set: high-cardinality or numeric data.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A telemetry event under construction.
pub trait Event {
    /// Merge tags into the event. Later keys overwrite earlier ones.
    fn add_tags(&mut self, tags: Tags);

    /// Merge fields into the event. Later keys overwrite earlier ones.
    fn add_fields(&mut self, fields: Fields);

    /// Stamp the event with the current time.
    fn record_timestamp(&mut self);

    /// Submit the event. Consumes it; no acknowledgment is returned.
    fn record(self: Box<Self>);
}

/// Factory for events bound to a recording sink.
pub trait EventLogger: Send + Sync {
    fn new_event(&self, name: &str) -> Box<dyn Event>;
}
