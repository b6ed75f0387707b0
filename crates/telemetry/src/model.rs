//! Data model for recorded telemetry events and trace spans.

use crate::TelemetryError;
use chrono::{DateTime, Utc};
use mailticks_core::{Fields, Tags};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Event ─────────────────────────────────────────────────────────────────

/// A recorded telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Event name (e.g. "mail").
    pub name: String,
    /// Low-cardinality dimensions.
    pub tags: Tags,
    /// High-cardinality and numeric data.
    pub fields: Fields,
    /// When the event was stamped (None until `record_timestamp`).
    pub timestamp: Option<DateTime<Utc>>,
}

impl TelemetryEvent {
    /// Create an empty event with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Tags::new(),
            fields: Fields::new(),
            timestamp: None,
        }
    }

    /// Look up a tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Look up a field value.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Look up a field that holds a string.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    /// Pretty-printed JSON representation.
    pub fn to_json_pretty(&self) -> Result<String, TelemetryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ── Span ──────────────────────────────────────────────────────────────────

/// A single span tracked by the span controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanRecord {
    /// Unique identifier.
    pub id: String,
    /// Parent span id (None for root spans).
    pub parent_id: Option<String>,
    /// When the span started.
    pub started_at: DateTime<Utc>,
    /// When the span ended (None if still running).
    pub ended_at: Option<DateTime<Utc>>,
    /// Duration in milliseconds (computed on end).
    pub duration_ms: Option<u64>,
}

impl SpanRecord {
    /// Start a new span under `parent_id`.
    pub fn new(parent_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            parent_id,
            started_at: Utc::now(),
            ended_at: None,
            duration_ms: None,
        }
    }

    /// Mark the span as ended.
    pub fn end(&mut self) {
        let now = Utc::now();
        self.ended_at = Some(now);
        self.duration_ms = Some(
            now.signed_duration_since(self.started_at)
                .num_milliseconds()
                .max(0) as u64,
        );
    }

    pub fn is_finished(&self) -> bool {
        self.ended_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn span_lifecycle() {
        let mut span = SpanRecord::new(Some("parent".into()));
        assert!(!span.is_finished());
        assert_eq!(span.parent_id.as_deref(), Some("parent"));

        span.end();
        assert!(span.is_finished());
        assert!(span.duration_ms.is_some());
    }

    #[test]
    fn event_lookup_helpers() {
        let mut event = TelemetryEvent::new("mail");
        event.tags.insert("type".into(), "smtp".into());
        event.fields.insert("url".into(), json!("localhost"));
        event.fields.insert("duration".into(), json!(1.5));

        assert_eq!(event.tag("type"), Some("smtp"));
        assert_eq!(event.field_str("url"), Some("localhost"));
        assert_eq!(event.field_str("duration"), None);
        assert_eq!(event.field("duration"), Some(&json!(1.5)));
        assert!(event.timestamp.is_none());

        let json = event.to_json_pretty().unwrap();
        assert!(json.contains("\"name\": \"mail\""));
    }
}
