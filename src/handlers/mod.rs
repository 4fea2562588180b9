//! Event handlers.
//!
//! This module contains the [`EventHandler`] trait and the generic loop that
//! drives a handler from its queue, plus the builtin handlers:
//!
//! - [`CommandRegistry`]: turns text input into command events
//! - [`HelpRegistry`]: mirrors registrations and renders help text
//! - [`EchoHandler`]: the `echo` command
//! - [`TimeHandler`]: the `timer` and `deltimer` commands
//! - [`TtyOutput`]: writes text output events to a terminal

mod command_registry;
mod echo;
mod help;
mod output;
mod time;
mod tty;

pub use command_registry::CommandRegistry;
pub use echo::{EchoHandler, echo_command};
pub use help::{HelpRegistry, help_command};
pub use output::{BusSink, OutputSink};
pub use time::{TimeHandler, TimerId, deltimer_command, timer_command};
pub use tty::{InputClosed, TtyOutput, spawn_line_reader, spawn_stdin_reader};

use crate::bus::EventQueue;
use crate::error::HandlerResult;
use crate::telemetry::{HandlerTimer, spans};
use async_trait::async_trait;
use futures_util::FutureExt;
use herald_proto::Event;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{Instrument, debug, error, warn};

/// A consumer bound to one event queue.
///
/// Implementations own their state outright; nothing else touches it. All
/// communication with other handlers goes through published events.
#[async_trait]
pub trait EventHandler: Send {
    /// Name used in logs, metrics and the queue subscription.
    fn name(&self) -> &'static str;

    /// Runs once before the loop starts. Used for self-registration.
    async fn init(&mut self) -> HandlerResult {
        Ok(())
    }

    /// React to one event. Runs to completion before the next is dequeued.
    async fn handle(&mut self, event: &Event) -> HandlerResult;
}

/// How one `handle` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    Failed,
    Panicked,
}

/// Drive `handler` from `queue` until the queue closes.
///
/// The handler is idle while awaiting the queue and processing while
/// `handle` runs; there is never more than one event in flight. Faults are
/// contained per event.
pub async fn run(mut handler: Box<dyn EventHandler>, mut queue: EventQueue) {
    let name = handler.name();
    async move {
        while let Some(event) = queue.recv().await {
            process(handler.as_mut(), &event).await;
        }
        debug!("Queue closed, handler stopping");
    }
    .instrument(spans::handler(name))
    .await
}

/// Run `handle` for one event, logging and counting errors and panics.
pub async fn process(handler: &mut dyn EventHandler, event: &Event) -> Outcome {
    let name = handler.name();
    let kind = event.kind().name();
    let _timer = HandlerTimer::new(name);

    let result = AssertUnwindSafe(handler.handle(event))
        .catch_unwind()
        .instrument(spans::event(kind))
        .await;

    match result {
        Ok(Ok(())) => Outcome::Handled,
        Ok(Err(e)) => {
            warn!(handler = name, event = kind, error = %e, "Handler failed on event");
            crate::metrics::record_handler_fault(name, e.error_code());
            Outcome::Failed
        }
        Err(payload) => {
            error!(
                handler = name,
                event = kind,
                panic = panic_message(&*payload),
                "Handler panicked on event"
            );
            crate::metrics::record_handler_fault(name, "panic");
            Outcome::Panicked
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
