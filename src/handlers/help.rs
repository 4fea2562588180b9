//! Help registry.
//!
//! Mirrors every command registration into its own table and answers the
//! `help` command, which it registers for itself at startup like any other
//! command.

use super::{EventHandler, OutputSink};
use crate::bus::EventBus;
use crate::config::KeywordMatch;
use crate::error::{HandlerResult, RegistryError};
use crate::table::CommandTable;
use async_trait::async_trait;
use herald_proto::{
    CommandDescriptor, CommandEvent, CommandEventBuilder, CommandKind, Event, EventKind,
};
use std::fmt::Write as _;
use tracing::{debug, warn};

/// Constructor for `help` command events.
pub fn help_command() -> CommandEventBuilder {
    CommandEventBuilder::new(CommandKind::HELP)
}

/// Handler that records registrations and renders help text.
pub struct HelpRegistry {
    bus: EventBus,
    sink: Box<dyn OutputSink>,
    keyword_match: KeywordMatch,
    commands: CommandTable,
}

impl HelpRegistry {
    pub fn new(bus: EventBus, sink: Box<dyn OutputSink>, keyword_match: KeywordMatch) -> Self {
        Self {
            bus,
            sink,
            keyword_match,
            commands: CommandTable::new(),
        }
    }

    /// The help table.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Descriptor the registry publishes for its own command.
    pub fn descriptor() -> Result<CommandDescriptor, herald_proto::ProtoError> {
        CommandDescriptor::builder("help", help_command)
            .describe("Prints available commands and information about command usage.")
            .usage("'help'  or 'help [command name]'")
            .options("None")
            .build()
    }

    pub fn register_command(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        let keyword = descriptor.keyword();
        self.commands.insert(descriptor)?;
        debug!(keyword = %keyword, "Help entry recorded");
        Ok(())
    }

    /// Render the text `help` should print for `command`, if any.
    ///
    /// No tokens lists every command. A known command name gives that
    /// command's details. An unknown name gives nothing.
    pub fn render_help(&self, command: &CommandEvent) -> Option<String> {
        let Some(target) = command.tokens.first() else {
            let mut out = String::from("Available Commands: \n");
            for (name, descriptor) in self.commands.iter() {
                let _ = writeln!(out, "{}: {}", name, descriptor.describe);
            }
            out.push('\n');
            return Some(out);
        };

        let descriptor = self.commands.lookup(target, self.keyword_match)?;
        Some(format!(
            "Help text for command '{}':\nUsage: {}\nOptions: {}\nDescription: {}\n",
            descriptor.keyword(),
            descriptor.usage,
            descriptor.options,
            descriptor.describe,
        ))
    }

    /// Write help for `command` to the sink.
    pub fn display_help(&mut self, command: &CommandEvent) -> HandlerResult {
        match self.render_help(command) {
            Some(text) => self.sink.write(&text),
            None => {
                debug!(requested = ?command.tokens.first(), "No help for unknown command");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl EventHandler for HelpRegistry {
    fn name(&self) -> &'static str {
        "help"
    }

    async fn init(&mut self) -> HandlerResult {
        self.bus.publish(Event::register_command(Self::descriptor()?));
        Ok(())
    }

    async fn handle(&mut self, event: &Event) -> HandlerResult {
        if !event.propagate() {
            return Ok(());
        }

        match event.kind() {
            EventKind::RegisterCommand(descriptor) => {
                if let Err(e) = self.register_command(descriptor.clone()) {
                    warn!(table = "help", error = %e, "Registration rejected");
                    crate::metrics::record_rejected_registration("help");
                }
                Ok(())
            }
            EventKind::Command(cmd) if cmd.kind == CommandKind::HELP => self.display_help(cmd),
            _ => Ok(()),
        }
    }
}
