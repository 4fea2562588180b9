//! Supervisor: startup ordering and handler tasks.
//!
//! Startup happens in two steps so that self-registration always lands
//! before any outside input:
//!
//! 1. [`Supervisor::add`] subscribes a queue for each handler. Nothing runs.
//! 2. [`Supervisor::start`] calls every handler's `init` in order, then spawns
//!    one task per handler.
//!
//! Because every queue exists before any `init` publishes, each handler
//! receives every registration, and those registrations sit ahead of any
//! event published after `start` returns.

use crate::bus::{EventBus, EventQueue};
use crate::handlers::{self, EventHandler};
use herald_proto::Event;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct Supervisor {
    bus: EventBus,
    handlers: Vec<(Box<dyn EventHandler>, EventQueue)>,
}

impl Supervisor {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            handlers: Vec::new(),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe a queue for `handler`. It starts receiving events now and
    /// processing them after [`start`](Self::start).
    pub fn add(&mut self, handler: Box<dyn EventHandler>) -> &mut Self {
        let queue = self.bus.subscribe(handler.name());
        self.handlers.push((handler, queue));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every `init`, then spawn every loop.
    ///
    /// A failing `init` is logged and the handler still runs.
    pub async fn start(mut self) -> Running {
        for (handler, _) in &mut self.handlers {
            if let Err(e) = handler.init().await {
                warn!(handler = handler.name(), error = %e, "Handler init failed");
            }
        }

        let tasks = self
            .handlers
            .into_iter()
            .map(|(handler, queue)| {
                let name = handler.name();
                debug!(handler = name, "Spawning handler");
                (name, tokio::spawn(handlers::run(handler, queue)))
            })
            .collect::<Vec<_>>();

        info!(handlers = tasks.len(), "Supervisor started");
        Running {
            bus: self.bus,
            tasks,
        }
    }
}

/// Handle to a started set of handlers.
pub struct Running {
    bus: EventBus,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl Running {
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Publish an event to every handler.
    pub fn publish(&self, event: impl Into<Event>) -> usize {
        self.bus.publish(event)
    }

    /// Names of the running handlers, in start order.
    pub fn handlers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tasks.iter().map(|(name, _)| *name)
    }

    /// Abort every handler task and wait for them to finish.
    pub async fn shutdown(self) {
        for (_, task) in &self.tasks {
            task.abort();
        }
        for (name, task) in self.tasks {
            match task.await {
                Ok(()) => debug!(handler = name, "Handler finished"),
                Err(e) if e.is_cancelled() => debug!(handler = name, "Handler stopped"),
                Err(e) => warn!(handler = name, error = %e, "Handler task failed"),
            }
        }
    }
}
