//! Telemetry assembly for completed send attempts.
//!
//! Builds the `mail` event from the transport's post-send state: two tags,
//! six fixed fields, and at `Detailed`/`Full` the raw request headers, body
//! and transport options, truncated at `Detailed`.

use crate::resolver::{DisabledResolver, HostResolver, SystemResolver};
use mailticks_config::MailTelemetryConfig;
use mailticks_core::{
    AnalyticsDetailLevel, EventLogger, Fields, SMTP_KIND, SendOutcome, Tags, TracingController,
    TransportState,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

/// Name of the event recorded per send attempt.
pub const MAIL_EVENT: &str = "mail";

/// Default character limit applied at [`AnalyticsDetailLevel::Detailed`].
pub const DEFAULT_TRUNCATE_AT: usize = 512;

/// Default suffix for truncated values.
pub const DEFAULT_TRUNCATION_MARKER: &str = "...";

/// Replacement for redacted credentials.
pub const REDACTED: &str = "[REDACTED]";

/// Builds and records one telemetry event per completed send attempt.
pub struct TelemetryAssembler {
    logger: Arc<dyn EventLogger>,
    controller: Arc<dyn TracingController>,
    resolver: Arc<dyn HostResolver>,
    truncate_at: usize,
    truncation_marker: String,
    redact_credentials: bool,
}

impl TelemetryAssembler {
    /// Create an assembler with default truncation, credential redaction
    /// and system host resolution.
    pub fn new(logger: Arc<dyn EventLogger>, controller: Arc<dyn TracingController>) -> Self {
        Self {
            logger,
            controller,
            resolver: Arc::new(SystemResolver),
            truncate_at: DEFAULT_TRUNCATE_AT,
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
            redact_credentials: true,
        }
    }

    /// Create an assembler from loaded configuration.
    pub fn from_config(
        logger: Arc<dyn EventLogger>,
        controller: Arc<dyn TracingController>,
        config: &MailTelemetryConfig,
    ) -> Self {
        let resolver: Arc<dyn HostResolver> = if config.resolve_host {
            Arc::new(SystemResolver)
        } else {
            Arc::new(DisabledResolver)
        };

        Self {
            logger,
            controller,
            resolver,
            truncate_at: config.truncate_at.max(1),
            truncation_marker: config.truncation_marker.clone(),
            redact_credentials: config.redact_credentials,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Toggle redaction of SMTP username/password in the options blob.
    pub fn with_credential_redaction(mut self, redact: bool) -> Self {
        self.redact_credentials = redact;
        self
    }

    pub fn with_truncation(mut self, truncate_at: usize, marker: impl Into<String>) -> Self {
        self.truncate_at = truncate_at.max(1);
        self.truncation_marker = marker.into();
        self
    }

    /// Assemble the event for one attempt and hand it to the logger.
    ///
    /// `elapsed` is the time between send start and completion.
    pub fn record(
        &self,
        level: AnalyticsDetailLevel,
        outcome: &SendOutcome,
        state: &dyn TransportState,
        elapsed: Duration,
    ) {
        let (tags, fields) = self.assemble(level, outcome, state, elapsed);

        let mut event = self.logger.new_event(MAIL_EVENT);
        event.add_tags(tags);
        event.add_fields(fields);
        event.record_timestamp();
        event.record();

        tracing::debug!(
            kind = %state.kind(),
            success = outcome.success,
            level = %level,
            "Mail event recorded"
        );
    }

    /// Tags and fields for one attempt, without recording anything.
    pub fn assemble(
        &self,
        level: AnalyticsDetailLevel,
        outcome: &SendOutcome,
        state: &dyn TransportState,
        elapsed: Duration,
    ) -> (Tags, Fields) {
        let tags = Self::tags(outcome, state);
        let mut fields = self.base_fields(state, elapsed);

        if level.at_least(AnalyticsDetailLevel::Detailed) {
            let options = self.options_json(outcome, state);
            fields.insert(
                "request_headers".into(),
                Value::String(self.prepare_log_data(level, state.mime_header())),
            );
            fields.insert(
                "data".into(),
                Value::String(self.prepare_log_data(level, state.mime_body())),
            );
            fields.insert(
                "options".into(),
                Value::String(self.prepare_log_data(level, &options)),
            );
        }

        (tags, fields)
    }

    fn tags(outcome: &SendOutcome, state: &dyn TransportState) -> Tags {
        let mut tags = Tags::new();
        tags.insert("type".into(), state.kind().to_string());
        tags.insert("status".into(), outcome.success.to_string());
        tags
    }

    fn base_fields(&self, state: &dyn TransportState, elapsed: Duration) -> Fields {
        let host = state.host();
        let ip = self
            .resolver
            .resolve(host)
            .map(|ip| ip.to_string())
            .unwrap_or_default();

        let mut fields = Fields::new();
        fields.insert("url".into(), Value::String(host.to_string()));
        fields.insert("duration".into(), json!(elapsed.as_secs_f64()));
        fields.insert("ip".into(), Value::String(ip));
        fields.insert("traceID".into(), optional(self.controller.trace_id()));
        fields.insert("spanID".into(), optional(self.controller.span_id()));
        fields.insert(
            "parentSpanID".into(),
            optional(self.controller.parent_span_id()),
        );
        fields
    }

    /// The transport options blob: sender, SMTP settings for SMTP
    /// transports, then the attempt's extra info on top.
    pub fn options(&self, outcome: &SendOutcome, state: &dyn TransportState) -> Fields {
        let mut options = Fields::new();
        options.insert("from".into(), Value::String(outcome.from.clone()));

        if state.kind() == SMTP_KIND {
            match state.smtp_settings() {
                Some(smtp) => {
                    let (username, password) = if self.redact_credentials {
                        (redact(&smtp.username), redact(&smtp.password))
                    } else {
                        (smtp.username.clone(), smtp.password.clone())
                    };

                    options.insert("SMTPHost".into(), json!(smtp.host));
                    options.insert("SMTPPort".into(), json!(smtp.port));
                    options.insert("SMTPHelo".into(), json!(smtp.helo));
                    options.insert("SMTPSecure".into(), json!(smtp.secure));
                    options.insert("SMTPAutoTLS".into(), json!(smtp.auto_tls));
                    options.insert("SMTPAuth".into(), json!(smtp.auth));
                    options.insert("SMTPUsername".into(), json!(username));
                    options.insert("SMTPPassword".into(), json!(password));
                    options.insert("SMTPKeepAlive".into(), json!(smtp.keep_alive));
                    options.insert("SMTPAuthType".into(), json!(smtp.auth_type));
                    options.insert("SMTPTimeout".into(), json!(smtp.timeout));

                    // Named settings take precedence over pass-through options
                    for (key, value) in &smtp.options {
                        options.entry(key.clone()).or_insert_with(|| value.clone());
                    }
                }
                None => tracing::debug!("SMTP transport exposes no SMTP settings"),
            }
        }

        for (key, value) in &outcome.extra {
            options.insert(key.clone(), value.clone());
        }

        options
    }

    fn options_json(&self, outcome: &SendOutcome, state: &dyn TransportState) -> String {
        match serde_json::to_string(&self.options(outcome, state)) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize mail options: {e}");
                String::new()
            }
        }
    }

    /// Apply the truncation policy: cut to `truncate_at` characters plus the
    /// marker at `Detailed`, pass through otherwise.
    pub fn prepare_log_data(&self, level: AnalyticsDetailLevel, data: &str) -> String {
        if level == AnalyticsDetailLevel::Detailed {
            if let Some((cut, _)) = data.char_indices().nth(self.truncate_at) {
                let mut truncated = String::with_capacity(cut + self.truncation_marker.len());
                truncated.push_str(&data[..cut]);
                truncated.push_str(&self.truncation_marker);
                return truncated;
            }
        }

        data.to_string()
    }
}

fn optional(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

fn redact(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        REDACTED.to_string()
    }
}
