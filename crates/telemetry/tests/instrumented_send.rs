//! End-to-end scenarios for the instrumented mailer.
//!
//! These drive a scripted SMTP transport through `InstrumentedMailer` with
//! a real `SpanController` and `MemoryEventLogger`, and check the recorded
//! `mail` event at each detail level.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use mailticks_core::{
    AnalyticsDetailLevel, Address, CompletionCallback, SendOutcome, SmtpSettings, Transport,
    TransportError, TransportState,
};
use mailticks_telemetry::{
    InstrumentedMailer, MemoryEventLogger, SpanController, StaticResolver, TelemetryEvent,
};
use serde_json::{Value, json};

// ── Scripted transport ───────────────────────────────────────────────────

/// A transport that "delivers" by calling back with a scripted result.
struct ScriptedTransport {
    kind: String,
    smtp: SmtpSettings,
    header: String,
    body: String,
    deliver: bool,
    extra: serde_json::Map<String, Value>,
}

impl ScriptedTransport {
    fn smtp(body: impl Into<String>) -> Self {
        Self {
            kind: "smtp".into(),
            smtp: SmtpSettings::new("localhost"),
            header: "Date: Thu, 29 Aug 2024 12:33:14 +0000\r\nTo: John Doe <example@mail.com>".into(),
            body: body.into(),
            deliver: true,
            extra: serde_json::Map::new(),
        }
    }
}

impl TransportState for ScriptedTransport {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn host(&self) -> &str {
        &self.smtp.host
    }

    fn smtp_settings(&self) -> Option<&SmtpSettings> {
        Some(&self.smtp)
    }

    fn mime_header(&self) -> &str {
        &self.header
    }

    fn mime_body(&self) -> &str {
        &self.body
    }
}

impl Transport for ScriptedTransport {
    fn send(&mut self, on_complete: &mut CompletionCallback<'_>) -> Result<bool, TransportError> {
        let outcome = SendOutcome {
            success: self.deliver,
            to: vec![Address::named("example@mail.com", "John Doe")],
            cc: vec![],
            bcc: vec![],
            subject: "subject".into(),
            body: self.body.clone(),
            from: "from@mail.com".into(),
            extra: self.extra.clone(),
        };
        on_complete(&outcome, &*self);
        Ok(self.deliver)
    }
}

fn send_once(transport: ScriptedTransport, level: AnalyticsDetailLevel) -> (TelemetryEvent, Arc<SpanController>) {
    let logger = MemoryEventLogger::new();
    let controller = Arc::new(SpanController::new());
    let resolver = StaticResolver::new().with_entry("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST));

    let mut mailer = InstrumentedMailer::new(transport, Arc::new(logger.clone()), controller.clone())
        .with_resolver(Arc::new(resolver));
    mailer.set_analytics_detail_level(level);

    let sent = mailer.send().expect("scripted transport never errors");
    assert_eq!(sent, mailer.transport().deliver);
    assert_eq!(logger.len(), 1);

    (logger.last().unwrap(), controller)
}

const FIXED_FIELDS: [&str; 6] = ["url", "duration", "ip", "traceID", "spanID", "parentSpanID"];
const DETAIL_FIELDS: [&str; 3] = ["request_headers", "data", "options"];

// ── Scenarios ────────────────────────────────────────────────────────────

#[test]
fn info_level_emits_six_fields() {
    let (event, _) = send_once(ScriptedTransport::smtp("x".repeat(600)), AnalyticsDetailLevel::Info);

    assert_eq!(event.name, "mail");
    assert_eq!(event.tags.len(), 2);
    assert_eq!(event.tag("type"), Some("smtp"));
    assert_eq!(event.tag("status"), Some("true"));

    assert_eq!(event.fields.len(), 6);
    for key in FIXED_FIELDS {
        assert!(event.fields.contains_key(key), "missing field {key}");
    }
    for key in DETAIL_FIELDS {
        assert!(!event.fields.contains_key(key), "unexpected field {key}");
    }
    assert_eq!(event.field_str("url"), Some("localhost"));
    assert_eq!(event.field_str("ip"), Some("127.0.0.1"));
    assert!(event.timestamp.is_some());
}

#[test]
fn detailed_level_truncates_body_to_512() {
    let (event, _) = send_once(
        ScriptedTransport::smtp("x".repeat(600)),
        AnalyticsDetailLevel::Detailed,
    );

    assert_eq!(event.fields.len(), 9);
    assert_eq!(
        event.field_str("data"),
        Some(format!("{}...", "x".repeat(512)).as_str())
    );
    assert!(event.field_str("request_headers").unwrap().starts_with("Date:"));
}

#[test]
fn full_level_keeps_entire_body() {
    let (event, _) = send_once(ScriptedTransport::smtp("x".repeat(600)), AnalyticsDetailLevel::Full);

    assert_eq!(event.fields.len(), 9);
    assert_eq!(event.field_str("data"), Some("x".repeat(600).as_str()));
}

#[test]
fn failed_delivery_is_tagged_false() {
    let mut transport = ScriptedTransport::smtp("body");
    transport.deliver = false;

    let (event, controller) = send_once(transport, AnalyticsDetailLevel::Info);
    assert_eq!(event.tag("status"), Some("false"));
    assert_eq!(controller.open_span_count(), 0);
}

#[test]
fn event_carries_the_send_span_ids() {
    let (event, controller) = send_once(ScriptedTransport::smtp("body"), AnalyticsDetailLevel::Info);

    let finished = controller.finished_spans();
    assert_eq!(finished.len(), 1);
    assert_eq!(controller.open_span_count(), 0);

    let span = &finished[0];
    assert_eq!(event.field_str("spanID"), Some(span.id.as_str()));
    assert_eq!(event.field_str("parentSpanID"), Some(controller.root_span_id()));
    assert_eq!(
        event.field_str("traceID").map(str::to_string),
        mailticks_core::TracingController::trace_id(controller.as_ref())
    );
}

#[test]
fn smtp_options_include_settings_and_transaction_id() {
    let mut transport = ScriptedTransport::smtp("body");
    transport.smtp.port = 587;
    transport.smtp.secure = "tls".into();
    transport.smtp.auth = true;
    transport.smtp.username = "mailer".into();
    transport.smtp.password = "s3cret".into();
    transport
        .extra
        .insert("smtp_transaction_id".into(), json!("Q1A2B3"));

    let (event, _) = send_once(transport, AnalyticsDetailLevel::Full);
    let options: Value = serde_json::from_str(event.field_str("options").unwrap()).unwrap();

    assert_eq!(
        options,
        json!({
            "from": "from@mail.com",
            "SMTPHost": "localhost",
            "SMTPPort": 587,
            "SMTPHelo": "",
            "SMTPSecure": "tls",
            "SMTPAutoTLS": true,
            "SMTPAuth": true,
            "SMTPUsername": "[REDACTED]",
            "SMTPPassword": "[REDACTED]",
            "SMTPKeepAlive": false,
            "SMTPAuthType": "",
            "SMTPTimeout": 300,
            "smtp_transaction_id": "Q1A2B3",
        })
    );
}

#[test]
fn non_smtp_transport_options_only_sender_and_extra() {
    let mut transport = ScriptedTransport::smtp("body");
    transport.kind = "sendmail".into();
    transport.extra.insert("queue_id".into(), json!("4F2A1"));

    let (event, _) = send_once(transport, AnalyticsDetailLevel::Detailed);
    assert_eq!(event.tag("type"), Some("sendmail"));

    let options: Value = serde_json::from_str(event.field_str("options").unwrap()).unwrap();
    assert_eq!(options, json!({"from": "from@mail.com", "queue_id": "4F2A1"}));
}
