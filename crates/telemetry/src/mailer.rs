//! Instrumented mailer — wraps a transport's send with a child span and a
//! telemetry event per attempt.

use crate::assembler::TelemetryAssembler;
use crate::resolver::HostResolver;
use mailticks_config::MailTelemetryConfig;
use mailticks_core::{
    AnalyticsDetailLevel, EventLogger, SendOutcome, TracingController, Transport, TransportError,
    TransportState,
};
use std::cell::Cell;
use std::sync::Arc;
use std::time::Instant;

/// A child span that is stopped exactly once.
///
/// Stopped explicitly by the completion callback, or on drop if the
/// transport returned (or unwound) without calling back.
pub struct ChildSpan<'a> {
    controller: &'a dyn TracingController,
    open: Cell<bool>,
}

impl<'a> ChildSpan<'a> {
    /// Start a child span on `controller`.
    pub fn start(controller: &'a dyn TracingController) -> Self {
        controller.start_child_span();
        Self {
            controller,
            open: Cell::new(true),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Stop the span. Returns false if it was already stopped.
    pub fn close(&self) -> bool {
        if !self.open.replace(false) {
            return false;
        }
        self.controller.stop_child_span();
        true
    }
}

impl Drop for ChildSpan<'_> {
    fn drop(&mut self) {
        if self.is_open() {
            tracing::warn!("Transport returned without completion callback, stopping child span");
            self.close();
        }
    }
}

/// Decorates a [`Transport`] with span management and telemetry.
///
/// One instance handles one send at a time; `send` takes `&mut self`.
pub struct InstrumentedMailer<T: Transport> {
    transport: T,
    assembler: TelemetryAssembler,
    controller: Arc<dyn TracingController>,
    level: AnalyticsDetailLevel,
}

impl<T: Transport> InstrumentedMailer<T> {
    /// Wrap `transport` at detail level `Info`.
    pub fn new(
        transport: T,
        logger: Arc<dyn EventLogger>,
        controller: Arc<dyn TracingController>,
    ) -> Self {
        Self {
            transport,
            assembler: TelemetryAssembler::new(logger, controller.clone()),
            controller,
            level: AnalyticsDetailLevel::default(),
        }
    }

    /// Wrap `transport` with settings and detail level from configuration.
    pub fn from_config(
        transport: T,
        logger: Arc<dyn EventLogger>,
        controller: Arc<dyn TracingController>,
        config: &MailTelemetryConfig,
    ) -> Self {
        Self {
            transport,
            assembler: TelemetryAssembler::from_config(logger, controller.clone(), config),
            controller,
            level: config.detail_level,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.assembler = self.assembler.with_resolver(resolver);
        self
    }

    pub fn set_analytics_detail_level(&mut self, level: AnalyticsDetailLevel) {
        self.level = level;
    }

    pub fn analytics_detail_level(&self) -> AnalyticsDetailLevel {
        self.level
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Unwrap the decorated transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Send through the transport.
    ///
    /// Opens a child span, delegates, and records one `mail` event from the
    /// transport's completion callback before stopping the span. The
    /// transport's result and errors are returned unchanged.
    pub fn send(&mut self) -> Result<bool, TransportError> {
        let span = tracing::info_span!(
            "mail_send",
            kind = %self.transport.kind(),
            host = %self.transport.host(),
        );
        let _entered = span.enter();

        let started = Instant::now();
        let child = ChildSpan::start(self.controller.as_ref());
        let assembler = &self.assembler;
        let level = self.level;

        let mut on_complete = |outcome: &SendOutcome, state: &dyn TransportState| {
            if !child.is_open() {
                tracing::warn!("Ignoring repeated completion callback for one send");
                return;
            }
            assembler.record(level, outcome, state, started.elapsed());
            child.close();
        };

        let result = self.transport.send(&mut on_complete);

        match &result {
            Ok(sent) => tracing::debug!(sent = *sent, "Mail send completed"),
            Err(e) => tracing::warn!(error = %e, "Mail transport failed"),
        }

        result
    }
}
