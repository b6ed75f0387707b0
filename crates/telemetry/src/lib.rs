//! Span tracking and telemetry assembly around mail transports.
//!
//! [`InstrumentedMailer`] decorates any [`Transport`](mailticks_core::Transport):
//! each send runs inside a child span and produces one `mail` event whose
//! payload depends on the configured
//! [`AnalyticsDetailLevel`](mailticks_core::AnalyticsDetailLevel).
//! The crate also ships a stack-based [`SpanController`], in-memory and
//! `tracing`-backed event loggers, and host resolvers for the `ip` field.

pub mod assembler;
pub mod controller;
pub mod logger;
pub mod mailer;
pub mod model;
pub mod resolver;

pub use assembler::{MAIL_EVENT, TelemetryAssembler};
pub use controller::SpanController;
pub use logger::{EventSink, MemoryEventLogger, PendingEvent, TracingEventLogger};
pub use mailer::{ChildSpan, InstrumentedMailer};
pub use model::{SpanRecord, TelemetryEvent};
pub use resolver::{DisabledResolver, HostResolver, StaticResolver, SystemResolver};

/// Errors from the telemetry subsystem.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("no open child span")]
    NoOpenSpan,

    #[error("unknown span id: {0}")]
    UnknownSpan(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TelemetryError> for mailticks_core::Error {
    fn from(err: TelemetryError) -> Self {
        mailticks_core::Error::Telemetry {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_error_converts_to_domain_error() {
        let err: mailticks_core::Error = TelemetryError::UnknownSpan("span-7".into()).into();
        assert!(matches!(err, mailticks_core::Error::Telemetry { .. }));
        assert!(err.to_string().contains("span-7"));
    }
}
