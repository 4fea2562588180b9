//! Telemetry utilities for handler timing and event spans.

use std::time::Instant;

/// Guard for timing one `handle` call and recording metrics.
///
/// Records latency when dropped.
pub struct HandlerTimer {
    handler: &'static str,
    start: Instant,
}

impl HandlerTimer {
    /// Start timing a handler.
    pub fn new(handler: &'static str) -> Self {
        Self {
            handler,
            start: Instant::now(),
        }
    }
}

impl Drop for HandlerTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_handle(self.handler, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span covering a handler task for its whole lifetime.
    pub fn handler(name: &str) -> Span {
        info_span!("handler", name = %name)
    }

    /// Span covering the processing of one event.
    pub fn event(kind: &str) -> Span {
        debug_span!("event", kind = %kind)
    }
}
