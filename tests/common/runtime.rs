//! Test runtime.
//!
//! Starts the command registry, help registry and echo handler on a fresh
//! bus, with help text captured in memory instead of published.

use herald::handlers::{CommandRegistry, EchoHandler, EventHandler, HelpRegistry, OutputSink};
use herald::{EventBus, KeywordMatch, Running, Supervisor};
use parking_lot::Mutex;
use std::sync::Arc;

use super::Observer;

pub type Captured = Arc<Mutex<Vec<String>>>;

pub struct TestRuntime {
    pub running: Running,
    pub observer: Observer,
    pub help_output: Captured,
}

impl TestRuntime {
    pub async fn start() -> Self {
        Self::start_with(KeywordMatch::Insensitive, |_| Vec::new()).await
    }

    /// Start the builtins plus the handlers `plugins` builds, added after them.
    pub async fn start_with<F>(mode: KeywordMatch, plugins: F) -> Self
    where
        F: FnOnce(&EventBus) -> Vec<Box<dyn EventHandler>>,
    {
        let bus = EventBus::new();
        let observer = Observer::subscribe(&bus);

        let help_output = Captured::default();
        let out = Arc::clone(&help_output);
        let sink: Box<dyn OutputSink> = Box::new(move |text: &str| out.lock().push(text.to_string()));

        let mut supervisor = Supervisor::new(bus.clone());
        supervisor
            .add(Box::new(CommandRegistry::new(bus.clone(), mode)))
            .add(Box::new(HelpRegistry::new(bus.clone(), sink, mode)))
            .add(Box::new(EchoHandler::new(bus.clone())));
        for handler in plugins(&bus) {
            supervisor.add(handler);
        }

        Self {
            running: supervisor.start().await,
            observer,
            help_output,
        }
    }

    pub fn send(&self, line: &str) {
        self.running.publish(herald_proto::Event::text_input(line));
    }

    /// Wait until help has written `count` chunks of text.
    pub async fn help_chunks(&self, count: usize) -> Vec<String> {
        for _ in 0..200 {
            {
                let out = self.help_output.lock();
                if out.len() >= count {
                    return out.clone();
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.help_output.lock().clone()
    }
}
