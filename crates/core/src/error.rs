//! Error types for the mailticks domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all mailticks operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Transport errors ---
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Telemetry errors ---
    #[error("Telemetry error: {message}")]
    Telemetry { message: String },
}

// --- Bounded context errors ---

/// Failures raised by a mail transport while attempting delivery.
///
/// These are distinct from an unsuccessful send: a transport that reaches
/// the server and gets a rejection reports `success = false` through its
/// completion callback. An error here means the attempt itself broke.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Transport not configured: {0}")]
    NotConfigured(String),

    #[error("Connection to {host}:{port} failed: {reason}")]
    ConnectionFailed {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Server rejected message: {message} (code: {code})")]
    Rejected { code: u16, message: String },

    #[error("Transport timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Transport failure: {0}")]
    Other(String),
}
