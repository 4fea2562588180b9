//! Output sinks for rendered text.
//!
//! Handlers that produce user-facing text write it to an [`OutputSink`]
//! instead of the terminal, so the destination can be swapped without
//! touching handler logic.

use crate::bus::EventBus;
use crate::error::HandlerResult;
use herald_proto::Event;

/// Destination for rendered text.
pub trait OutputSink: Send {
    fn write(&mut self, text: &str) -> HandlerResult;
}

/// Routes text through the bus as `TextOutput` events.
pub struct BusSink {
    bus: EventBus,
}

impl BusSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl OutputSink for BusSink {
    fn write(&mut self, text: &str) -> HandlerResult {
        self.bus.publish(Event::text_output(text));
        Ok(())
    }
}

impl<F> OutputSink for F
where
    F: FnMut(&str) + Send,
{
    fn write(&mut self, text: &str) -> HandlerResult {
        self(text);
        Ok(())
    }
}
