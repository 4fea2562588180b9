//! Command registry: keyword table and text-input dispatch.
//!
//! Any handler can own a command by publishing a `RegisterCommand` event.
//! The registry records it, and from then on every line of text input whose
//! first word is that keyword becomes a fresh command event built by the
//! descriptor's constructor and published back onto the bus.
//!
//! Unrecognized first words are dropped without a reply: the registry has no
//! way to know which keywords are supposed to exist.

use super::EventHandler;
use crate::bus::EventBus;
use crate::config::KeywordMatch;
use crate::error::{HandlerResult, RegistryError};
use crate::table::CommandTable;
use async_trait::async_trait;
use herald_proto::{CommandDescriptor, CommandPayload, Event, EventKind, TextInput, tokenize};
use tracing::{debug, trace, warn};

/// Handler that registers commands and turns text into command events.
pub struct CommandRegistry {
    bus: EventBus,
    keyword_match: KeywordMatch,
    commands: CommandTable,
}

impl CommandRegistry {
    pub fn new(bus: EventBus, keyword_match: KeywordMatch) -> Self {
        Self {
            bus,
            keyword_match,
            commands: CommandTable::new(),
        }
    }

    /// The dispatch table.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Register a command. A keyword that is already taken is rejected and
    /// the existing entry is kept.
    pub fn register_command(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        let kind = descriptor.command_kind();
        self.commands.insert(descriptor)?;
        debug!(command = %kind, total = self.commands.len(), "Command registered");
        Ok(())
    }

    /// Build the command event a line of text refers to, if any.
    pub fn build_command(&self, input: &TextInput) -> Option<Event> {
        let raw_text = input.message.as_deref().filter(|m| !m.is_empty())?;

        let tokens = tokenize(raw_text);
        let (keyword, rest) = tokens.split_first()?;

        let Some(descriptor) = self.commands.lookup(keyword, self.keyword_match) else {
            trace!(keyword = %keyword, "No command registered for keyword");
            return None;
        };

        let event = (descriptor.event_constructor)().init(CommandPayload {
            raw_text: raw_text.to_string(),
            tokens: rest.iter().map(|t| t.to_string()).collect(),
        });
        Some(event)
    }

    /// Parse a line of text input and publish the matching command event.
    ///
    /// Returns whether a command was dispatched. Empty input and unknown
    /// keywords publish nothing.
    pub fn parse_text_input(&self, input: &TextInput) -> bool {
        let Some(event) = self.build_command(input) else {
            return false;
        };

        let command = event.kind().name();
        crate::metrics::record_dispatch(command);
        let delivered = self.bus.publish(event);
        debug!(command, delivered, "Command dispatched");
        true
    }
}

#[async_trait]
impl EventHandler for CommandRegistry {
    fn name(&self) -> &'static str {
        "command_registry"
    }

    async fn handle(&mut self, event: &Event) -> HandlerResult {
        if !event.propagate() {
            return Ok(());
        }

        match event.kind() {
            EventKind::RegisterCommand(descriptor) => {
                if let Err(e) = self.register_command(descriptor.clone()) {
                    warn!(table = "dispatch", error = %e, "Registration rejected");
                    crate::metrics::record_rejected_registration("dispatch");
                }
            }
            EventKind::TextInput(input) => {
                self.parse_text_input(input);
            }
            EventKind::TextOutput(_) | EventKind::Command(_) => {}
        }
        Ok(())
    }
}
