//! Prometheus metrics collection for herald.
//!
//! Metrics are recorded into a process-wide registry and rendered in the
//! Prometheus text format by [`gather_metrics`]. Recording before [`init`] is
//! a silent no-op.
//!
//! - `herald_events_published_total{kind}` - Events handed to the bus
//! - `herald_event_fanout` - Queues reached per published event
//! - `herald_commands_dispatched_total{command}` - Command events built from text input
//! - `herald_registrations_rejected_total{table}` - Duplicate keyword registrations
//! - `herald_handler_faults_total{handler,kind}` - Errors and panics caught by the handler loop
//! - `herald_handle_duration_seconds{handler}` - Time spent in `handle` per event

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Events published, by kind.
pub static EVENTS_PUBLISHED: OnceLock<IntCounterVec> = OnceLock::new();

/// Command events dispatched from text input, by command kind.
pub static COMMANDS_DISPATCHED: OnceLock<IntCounterVec> = OnceLock::new();

/// Registrations rejected because the keyword was taken, by table.
pub static REGISTRATIONS_REJECTED: OnceLock<IntCounterVec> = OnceLock::new();

/// Faults caught at the handler loop boundary.
pub static HANDLER_FAULTS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Queues reached per published event.
pub static EVENT_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Time spent handling one event, by handler.
pub static HANDLE_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup before any metrics are recorded. Later calls keep the
/// metrics from the first call.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                let m = $init.expect(concat!(stringify!($metric), " creation failed"));
                if let Err(e) = r.register(Box::new(m.clone())) {
                    tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                }
                let _ = $metric.set(m);
            }
        };
    }

    register!(EVENTS_PUBLISHED, IntCounterVec::new(Opts::new("herald_events_published_total", "Events published to the bus"), &["kind"]));
    register!(COMMANDS_DISPATCHED, IntCounterVec::new(Opts::new("herald_commands_dispatched_total", "Command events dispatched from text input"), &["command"]));
    register!(REGISTRATIONS_REJECTED, IntCounterVec::new(Opts::new("herald_registrations_rejected_total", "Duplicate keyword registrations rejected"), &["table"]));
    register!(HANDLER_FAULTS, IntCounterVec::new(Opts::new("herald_handler_faults_total", "Errors and panics caught by handler loops"), &["handler", "kind"]));
    register!(EVENT_FANOUT, Histogram::with_opts(
        HistogramOpts::new("herald_event_fanout", "Queues reached per published event")
            .buckets(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0])));
    register!(HANDLE_LATENCY, HistogramVec::new(
        HistogramOpts::new("herald_handle_duration_seconds", "Event handling latency by handler")
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
        &["handler"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Record a published event and how many queues it reached.
#[inline]
pub fn record_publish(kind: &str, recipients: usize) {
    if let Some(c) = EVENTS_PUBLISHED.get() {
        c.with_label_values(&[kind]).inc();
    }
    if let Some(h) = EVENT_FANOUT.get() {
        h.observe(recipients as f64);
    }
}

/// Record a command event built from text input.
#[inline]
pub fn record_dispatch(command: &str) {
    if let Some(c) = COMMANDS_DISPATCHED.get() {
        c.with_label_values(&[command]).inc();
    }
}

/// Record a rejected duplicate registration.
#[inline]
pub fn record_rejected_registration(table: &str) {
    if let Some(c) = REGISTRATIONS_REJECTED.get() {
        c.with_label_values(&[table]).inc();
    }
}

/// Record a fault caught by a handler loop.
#[inline]
pub fn record_handler_fault(handler: &str, kind: &str) {
    if let Some(c) = HANDLER_FAULTS.get() {
        c.with_label_values(&[handler, kind]).inc();
    }
}

/// Record time spent in one `handle` call.
#[inline]
pub fn record_handle(handler: &str, duration_secs: f64) {
    if let Some(h) = HANDLE_LATENCY.get() {
        h.with_label_values(&[handler]).observe(duration_secs);
    }
}
