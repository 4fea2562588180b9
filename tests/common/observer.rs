//! Observer queue.
//!
//! Subscribes to the bus like any handler and lets tests wait for events.

use herald::{EventBus, EventQueue};
use herald_proto::{CommandEvent, CommandKind, Event, EventKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

pub struct Observer {
    queue: EventQueue,
}

impl Observer {
    pub fn subscribe(bus: &EventBus) -> Self {
        Self {
            queue: bus.subscribe("observer"),
        }
    }

    /// Receive a single event.
    pub async fn recv(&mut self) -> anyhow::Result<Arc<Event>> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive an event with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Arc<Event>> {
        timeout(dur, self.queue.recv())
            .await?
            .ok_or_else(|| anyhow::anyhow!("bus closed"))
    }

    /// Receive events until the predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Arc<Event>>>
    where
        F: FnMut(&Event) -> bool,
    {
        let mut events = Vec::new();
        loop {
            let event = self.recv().await?;
            let done = predicate(&event);
            events.push(event);
            if done {
                return Ok(events);
            }
        }
    }

    /// Wait for the next text output and return its message.
    pub async fn next_output(&mut self) -> anyhow::Result<String> {
        let events = self
            .recv_until(|e| matches!(e.kind(), EventKind::TextOutput(_)))
            .await?;
        match events.last().map(|e| e.kind()) {
            Some(EventKind::TextOutput(out)) => Ok(out.message.clone()),
            _ => unreachable!("recv_until stops on text output"),
        }
    }
}

/// Command events of `kind` among `events`.
pub fn commands(events: &[Arc<Event>], kind: CommandKind) -> Vec<CommandEvent> {
    events
        .iter()
        .filter_map(|e| e.as_command(kind).cloned())
        .collect()
}

/// Whether `event` is any command event.
pub fn is_command(event: &Event) -> bool {
    matches!(event.kind(), EventKind::Command(_))
}
