//! Published events.
//!
//! An [`Event`] is built once, published once, and then shared by every
//! handler that receives it. Its payload never changes after construction.
//! The single exception is the propagation flag: any consumer may clear it,
//! and consumers that process the same event afterwards will see it cleared.
//! This is a cooperative veto, not a hard stop, since delivery has already
//! been fanned out by the time anyone reads it.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::command::{CommandDescriptor, CommandEvent, CommandKind};

/// Raw text entered by the user. The sole ingress from the I/O layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    /// The line as typed, or `None` if the producer had nothing to send.
    pub message: Option<String>,
}

/// Text destined for the terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOutput {
    /// Text to write, including any trailing newlines.
    pub message: String,
}

/// Event payloads.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// A line of user input.
    TextInput(TextInput),
    /// Text to be written by the output handler.
    TextOutput(TextOutput),
    /// A handler advertising a command.
    RegisterCommand(CommandDescriptor),
    /// A parsed command, addressed by its [`CommandKind`].
    Command(CommandEvent),
}

impl EventKind {
    /// Static label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TextInput(_) => "text_input",
            Self::TextOutput(_) => "text_output",
            Self::RegisterCommand(_) => "register_command",
            Self::Command(cmd) => cmd.kind.as_str(),
        }
    }
}

/// A typed message travelling on the event bus.
#[derive(Debug)]
pub struct Event {
    kind: EventKind,
    propagate: AtomicBool,
}

impl Event {
    /// Wrap a payload. Propagation starts enabled.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            propagate: AtomicBool::new(true),
        }
    }

    /// Convenience constructor for a line of user input.
    pub fn text_input(message: impl Into<String>) -> Self {
        Self::new(EventKind::TextInput(TextInput {
            message: Some(message.into()),
        }))
    }

    /// Convenience constructor for terminal output.
    pub fn text_output(message: impl Into<String>) -> Self {
        Self::new(EventKind::TextOutput(TextOutput {
            message: message.into(),
        }))
    }

    /// Convenience constructor for a command registration.
    pub fn register_command(descriptor: CommandDescriptor) -> Self {
        Self::new(EventKind::RegisterCommand(descriptor))
    }

    /// The payload.
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Whether handlers should still act on this event.
    pub fn propagate(&self) -> bool {
        self.propagate.load(Ordering::Acquire)
    }

    /// Ask handlers that see this event later to ignore it.
    pub fn stop_propagation(&self) {
        self.propagate.store(false, Ordering::Release);
    }

    /// The command payload if this is a command event of `kind`.
    pub fn as_command(&self, kind: CommandKind) -> Option<&CommandEvent> {
        match &self.kind {
            EventKind::Command(cmd) if cmd.kind == kind => Some(cmd),
            _ => None,
        }
    }

    /// Whether this is a command event of `kind`.
    pub fn is_command(&self, kind: CommandKind) -> bool {
        self.as_command(kind).is_some()
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Self::new(kind)
    }
}
