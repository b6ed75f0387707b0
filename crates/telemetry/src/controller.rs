//! In-process span controller — tracks the child spans of one trace.

use crate::TelemetryError;
use crate::model::SpanRecord;
use mailticks_core::TracingController;
use std::sync::RwLock;
use uuid::Uuid;

/// Closed child spans kept for inspection before the oldest are pruned.
pub const MAX_FINISHED_SPANS: usize = 5_000;

/// A [`TracingController`] backed by a stack of open spans.
///
/// The root span is fixed at construction; every `start_child_span`
/// pushes a span parented on the current one, and `stop_child_span` pops
/// it into the finished list.
pub struct SpanController {
    trace_id: String,
    root_span_id: String,
    root_parent_id: Option<String>,
    state: RwLock<SpanState>,
}

#[derive(Debug, Default)]
struct SpanState {
    /// Open child spans, innermost last.
    open: Vec<SpanRecord>,
    /// Closed child spans, in close order.
    finished: Vec<SpanRecord>,
}

impl SpanController {
    /// Start a fresh trace with a new root span.
    pub fn new() -> Self {
        Self::with_trace(Uuid::new_v4().to_string(), Uuid::new_v4().to_string(), None)
    }

    /// Continue an inbound trace context.
    pub fn with_trace(
        trace_id: impl Into<String>,
        span_id: impl Into<String>,
        parent_span_id: Option<String>,
    ) -> Self {
        Self {
            trace_id: trace_id.into(),
            root_span_id: span_id.into(),
            root_parent_id: parent_span_id,
            state: RwLock::new(SpanState::default()),
        }
    }

    /// Close the innermost open child span and return it.
    pub fn try_stop_child_span(&self) -> Result<SpanRecord, TelemetryError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut span = state.open.pop().ok_or(TelemetryError::NoOpenSpan)?;
        span.end();

        if state.finished.len() >= MAX_FINISHED_SPANS {
            let drain_count = MAX_FINISHED_SPANS / 10;
            state.finished.drain(..drain_count);
        }
        state.finished.push(span.clone());
        Ok(span)
    }

    /// Take every closed child span, leaving the finished list empty.
    pub fn drain_finished(&self) -> Vec<SpanRecord> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut state.finished)
    }

    /// Number of child spans currently open.
    pub fn open_span_count(&self) -> usize {
        self.state.read().unwrap_or_else(|e| e.into_inner()).open.len()
    }

    /// Closed child spans still retained, in close order.
    pub fn finished_spans(&self) -> Vec<SpanRecord> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .finished
            .clone()
    }

    /// Look up a closed child span by id.
    pub fn finished_span(&self, span_id: &str) -> Result<SpanRecord, TelemetryError> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state
            .finished
            .iter()
            .find(|s| s.id == span_id)
            .cloned()
            .ok_or_else(|| TelemetryError::UnknownSpan(span_id.to_string()))
    }

    /// Id of the root span this controller was created with.
    pub fn root_span_id(&self) -> &str {
        &self.root_span_id
    }
}

impl Default for SpanController {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingController for SpanController {
    fn start_child_span(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let parent = state
            .open
            .last()
            .map(|s| s.id.clone())
            .unwrap_or_else(|| self.root_span_id.clone());
        let span = SpanRecord::new(Some(parent));
        tracing::debug!(
            trace_id = %self.trace_id,
            span_id = %span.id,
            depth = state.open.len() + 1,
            "Child span started"
        );
        state.open.push(span);
    }

    fn stop_child_span(&self) {
        match self.try_stop_child_span() {
            Ok(span) => tracing::debug!(
                trace_id = %self.trace_id,
                span_id = %span.id,
                duration_ms = span.duration_ms.unwrap_or(0),
                "Child span stopped"
            ),
            Err(e) => tracing::warn!(trace_id = %self.trace_id, "Cannot stop child span: {e}"),
        }
    }

    fn trace_id(&self) -> Option<String> {
        Some(self.trace_id.clone())
    }

    fn span_id(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Some(
            state
                .open
                .last()
                .map(|s| s.id.clone())
                .unwrap_or_else(|| self.root_span_id.clone()),
        )
    }

    fn parent_span_id(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        match state.open.last() {
            Some(span) => span.parent_id.clone(),
            None => self.root_parent_id.clone(),
        }
    }
}
