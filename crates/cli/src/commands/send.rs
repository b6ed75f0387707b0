//! `mailticks send` — Dry-run a send and print the recorded mail event.

use crate::loopback::LoopbackTransport;
use clap::Args;
use mailticks_config::MailTelemetryConfig;
use mailticks_core::{Address, AnalyticsDetailLevel, EventLogger, SmtpSettings};
use mailticks_telemetry::{
    InstrumentedMailer, MemoryEventLogger, SpanController, TracingEventLogger,
};
use std::sync::Arc;

#[derive(Args)]
pub struct SendArgs {
    /// Recipient address (repeatable)
    #[arg(long, required = true)]
    to: Vec<String>,

    /// Cc address (repeatable)
    #[arg(long)]
    cc: Vec<String>,

    /// Sender address
    #[arg(long, default_value = "mailticks@localhost")]
    from: String,

    #[arg(long, default_value = "")]
    subject: String,

    #[arg(long, default_value = "")]
    body: String,

    /// SMTP host recorded as the event's url
    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(long, default_value_t = 25)]
    port: u16,

    /// Detail level (overrides config and MAILTICKS_DETAIL_LEVEL)
    #[arg(long, value_parser = crate::parse_level)]
    level: Option<AnalyticsDetailLevel>,

    /// Report the send as failed
    #[arg(long)]
    fail: bool,

    /// Forward the event to the log instead of printing it
    #[arg(long)]
    log_event: bool,
}

pub fn run(args: SendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        MailTelemetryConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(level) = args.level {
        config.detail_level = level;
    }

    let mut smtp = SmtpSettings::new(&args.host);
    smtp.port = args.port;

    let mut transport = LoopbackTransport::new(smtp, &args.from)
        .subject(&args.subject)
        .body(&args.body);
    for to in &args.to {
        transport = transport.to(Address::new(to));
    }
    for cc in &args.cc {
        transport = transport.cc(Address::new(cc));
    }
    if args.fail {
        transport = transport.failing();
    }

    let memory = MemoryEventLogger::with_capacity(config.max_buffered_events);
    let logger: Arc<dyn EventLogger> = if args.log_event {
        Arc::new(TracingEventLogger::new())
    } else {
        Arc::new(memory.clone())
    };
    let controller = Arc::new(SpanController::new());

    let mut mailer = InstrumentedMailer::from_config(transport, logger, controller, &config);
    let sent = mailer.send()?;
    tracing::info!(sent, level = %config.detail_level, "Loopback send finished");

    for event in memory.drain() {
        println!("{}", event.to_json_pretty()?);
    }

    Ok(())
}
