//! Tracing controller trait — the distributed-trace context around a send.

/// Controls child spans of the current trace and exposes their identifiers.
///
/// Implementations are shared between the caller and the instrumented
/// mailer, so every method takes `&self` and implementations use interior
/// mutability.
pub trait TracingController: Send + Sync {
    /// Open a child span of the current span and make it current.
    fn start_child_span(&self);

    /// Close the current child span and restore its parent as current.
    fn stop_child_span(&self);

    /// Identifier of the trace.
    fn trace_id(&self) -> Option<String>;

    /// Identifier of the current span.
    fn span_id(&self) -> Option<String>;

    /// Identifier of the current span's parent.
    fn parent_span_id(&self) -> Option<String>;
}
