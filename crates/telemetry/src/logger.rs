//! Event loggers — sinks that recorded telemetry events end up in.

use crate::model::TelemetryEvent;
use chrono::Utc;
use mailticks_core::{Event, EventLogger, Fields, Tags};
use std::sync::{Arc, RwLock};

/// Where a finished event is delivered.
pub trait EventSink: Send + Sync {
    fn submit(&self, event: TelemetryEvent);
}

/// An event being filled in, bound to the sink it will be recorded into.
pub struct PendingEvent {
    event: TelemetryEvent,
    sink: Arc<dyn EventSink>,
}

impl PendingEvent {
    pub fn new(name: &str, sink: Arc<dyn EventSink>) -> Self {
        Self {
            event: TelemetryEvent::new(name),
            sink,
        }
    }
}

impl Event for PendingEvent {
    fn add_tags(&mut self, tags: Tags) {
        self.event.tags.extend(tags);
    }

    fn add_fields(&mut self, fields: Fields) {
        self.event.fields.extend(fields);
    }

    fn record_timestamp(&mut self) {
        self.event.timestamp = Some(Utc::now());
    }

    fn record(self: Box<Self>) {
        let PendingEvent { event, sink } = *self;
        sink.submit(event);
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────

/// Buffers recorded events in memory, oldest pruned first at capacity.
#[derive(Clone)]
pub struct MemoryEventLogger {
    sink: Arc<MemorySink>,
}

struct MemorySink {
    events: RwLock<Vec<TelemetryEvent>>,
    capacity: usize,
}

impl MemoryEventLogger {
    /// Default number of buffered events.
    pub const DEFAULT_CAPACITY: usize = 5_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Buffer at most `capacity` events (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sink: Arc::new(MemorySink {
                events: RwLock::new(Vec::new()),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Snapshot of the buffered events, oldest first.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.sink
            .events
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The most recently recorded event.
    pub fn last(&self) -> Option<TelemetryEvent> {
        self.sink
            .events
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sink
            .events
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return all buffered events.
    pub fn drain(&self) -> Vec<TelemetryEvent> {
        let mut events = self.sink.events.write().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *events)
    }
}

impl Default for MemoryEventLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for MemorySink {
    fn submit(&self, event: TelemetryEvent) {
        let mut events = self.events.write().unwrap_or_else(|e| e.into_inner());

        if events.len() >= self.capacity {
            // Drop the oldest tenth so pruning doesn't run on every insert
            let drain_count = (self.capacity / 10).max(1).min(events.len());
            events.drain(..drain_count);
            tracing::debug!(dropped = drain_count, "Event buffer full, pruned oldest events");
        }

        events.push(event);
    }
}

impl EventLogger for MemoryEventLogger {
    fn new_event(&self, name: &str) -> Box<dyn Event> {
        Box::new(PendingEvent::new(name, self.sink.clone()))
    }
}

// ── tracing ───────────────────────────────────────────────────────────────

/// Emits each recorded event as a structured `tracing` record.
#[derive(Clone, Default)]
pub struct TracingEventLogger {
    sink: Arc<TracingSink>,
}

#[derive(Default)]
struct TracingSink;

impl TracingEventLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for TracingSink {
    fn submit(&self, event: TelemetryEvent) {
        let tags = serde_json::to_string(&event.tags).unwrap_or_default();
        let fields = serde_json::to_string(&event.fields).unwrap_or_default();
        let timestamp = event
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        tracing::info!(
            target: "mailticks::event",
            name = %event.name,
            tags = %tags,
            fields = %fields,
            timestamp = %timestamp,
            "Telemetry event recorded"
        );
    }
}

impl EventLogger for TracingEventLogger {
    fn new_event(&self, name: &str) -> Box<dyn Event> {
        Box::new(PendingEvent::new(name, self.sink.clone()))
    }
}
