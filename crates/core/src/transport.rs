//! Transport trait — the abstraction over whatever actually delivers mail.
//!
//! A transport owns message composition and delivery (SMTP, sendmail, an
//! HTTP API, ...). mailticks never reimplements any of that: it only needs
//! the transport to report each attempt through a completion callback and
//! to expose its configuration for telemetry.

use crate::error::TransportError;
use serde::{Deserialize, Serialize};

/// Transport kind identifier used for SMTP delivery.
pub const SMTP_KIND: &str = "smtp";

/// A mailbox address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Address {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn named(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

/// Result metadata handed to the completion callback, once per send attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendOutcome {
    /// Whether the transport delivered the message.
    pub success: bool,

    pub to: Vec<Address>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Address>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Address>,

    pub subject: String,

    pub body: String,

    /// Sender address.
    pub from: String,

    /// Transport-supplied extras (e.g. `smtp_transaction_id`)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// SMTP connection settings exposed by an SMTP transport.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// HELO/EHLO string; empty means "let the transport decide".
    #[serde(default)]
    pub helo: String,

    /// Encryption mode: "", "tls" or "ssl".
    #[serde(default)]
    pub secure: String,

    #[serde(default = "default_true")]
    pub auto_tls: bool,

    #[serde(default)]
    pub auth: bool,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub keep_alive: bool,

    /// SASL mechanism ("", "CRAM-MD5", "LOGIN", "PLAIN", "XOAUTH2").
    #[serde(default)]
    pub auth_type: String,

    /// Timeout in seconds.
    #[serde(default = "default_smtp_timeout")]
    pub timeout: u64,

    /// Transport-specific options passed through verbatim
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
}

fn default_smtp_port() -> u16 {
    25
}
fn default_smtp_timeout() -> u64 {
    300
}
fn default_true() -> bool {
    true
}

impl SmtpSettings {
    /// Settings for `host` with every other field at its default.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_smtp_port(),
            helo: String::new(),
            secure: String::new(),
            auto_tls: true,
            auth: false,
            username: String::new(),
            password: String::new(),
            keep_alive: false,
            auth_type: String::new(),
            timeout: default_smtp_timeout(),
            options: serde_json::Map::new(),
        }
    }
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("helo", &self.helo)
            .field("secure", &self.secure)
            .field("auto_tls", &self.auto_tls)
            .field("auth", &self.auth)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("keep_alive", &self.keep_alive)
            .field("auth_type", &self.auth_type)
            .field("timeout", &self.timeout)
            .field("options", &self.options)
            .finish()
    }
}

/// Readable transport state, valid at the time of the completion callback.
pub trait TransportState {
    /// Transport kind identifier (e.g., "smtp", "sendmail", "mail").
    fn kind(&self) -> &str;

    /// Host the transport talks to.
    fn host(&self) -> &str;

    /// SMTP settings, if this transport has any.
    fn smtp_settings(&self) -> Option<&SmtpSettings> {
        None
    }

    /// Raw MIME header block of the last composed message.
    fn mime_header(&self) -> &str;

    /// Raw MIME body of the last composed message.
    fn mime_body(&self) -> &str;
}

/// Callback invoked by a transport once per send attempt.
pub type CompletionCallback<'a> = dyn FnMut(&SendOutcome, &dyn TransportState) + 'a;

/// The core Transport trait.
///
/// Implementations must invoke `on_complete` exactly once per call, on the
/// calling thread, before `send` returns. An implementation that fails
/// before reaching that point returns `Err` without calling back.
pub trait Transport: TransportState {
    /// Compose and deliver the message. Returns the delivery result.
    fn send(&mut self, on_complete: &mut CompletionCallback<'_>) -> Result<bool, TransportError>;
}
