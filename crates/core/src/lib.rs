//! # mailticks core
//!
//! Domain types, traits, and error definitions for instrumented mail
//! delivery. This crate has **no framework dependencies** — it defines the
//! seams that the telemetry crate implements against.
//!
//! ## Design Philosophy
//!
//! Every collaborator is a trait here:
//! - [`Transport`] delivers mail and reports each attempt via a callback
//! - [`TracingController`] owns the span tree of the current trace
//! - [`EventLogger`] records assembled telemetry events
//!
//! Implementations live elsewhere, which keeps tests free to substitute
//! fakes for any of them.

pub mod error;
pub mod event;
pub mod level;
pub mod trace;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use error::{Error, TransportError};
pub use event::{Event, EventLogger, Fields, Tags};
pub use level::AnalyticsDetailLevel;
pub use trace::TracingController;
pub use transport::{
    Address, CompletionCallback, SMTP_KIND, SendOutcome, SmtpSettings, Transport, TransportState,
};
