//! The `echo` command: prints its arguments back.

use super::EventHandler;
use crate::bus::EventBus;
use crate::error::HandlerResult;
use async_trait::async_trait;
use herald_proto::{CommandDescriptor, CommandEventBuilder, CommandKind, Event};

/// Constructor for `echo` command events.
pub fn echo_command() -> CommandEventBuilder {
    CommandEventBuilder::new(CommandKind::ECHO)
}

pub struct EchoHandler {
    bus: EventBus,
}

impl EchoHandler {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl EventHandler for EchoHandler {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn init(&mut self) -> HandlerResult {
        let descriptor = CommandDescriptor::builder("echo", echo_command)
            .describe("Prints the given text.")
            .usage("'echo [text]'")
            .options("None")
            .build()?;
        self.bus.publish(Event::register_command(descriptor));
        Ok(())
    }

    async fn handle(&mut self, event: &Event) -> HandlerResult {
        if !event.propagate() {
            return Ok(());
        }
        if let Some(cmd) = event.as_command(CommandKind::ECHO) {
            let mut line = cmd.tokens.join(" ");
            line.push('\n');
            self.bus.publish(Event::text_output(line));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_proto::{CommandPayload, EventKind};

    #[tokio::test]
    async fn init_registers_echo() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        EchoHandler::new(bus).init().await.unwrap();

        let event = queue.try_recv().unwrap();
        let EventKind::RegisterCommand(descriptor) = event.kind() else {
            panic!("expected registration, got {event:?}");
        };
        assert_eq!(descriptor.invoke, "echo");
        assert_eq!(descriptor.command_kind(), CommandKind::ECHO);
    }

    #[tokio::test]
    async fn echo_joins_tokens() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        let mut handler = EchoHandler::new(bus);

        let command = echo_command().init(CommandPayload {
            raw_text: "echo   hello   world".to_string(),
            tokens: vec!["hello".to_string(), "world".to_string()],
        });
        handler.handle(&command).await.unwrap();

        let event = queue.try_recv().unwrap();
        match event.kind() {
            EventKind::TextOutput(out) => assert_eq!(out.message, "hello world\n"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn ignores_other_events() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        let mut handler = EchoHandler::new(bus);

        handler.handle(&Event::text_input("echo hi")).await.unwrap();
        assert!(queue.try_recv().is_none());
    }
}
