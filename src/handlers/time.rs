//! Timers: replay a line of text input later.
//!
//! `timer [-r] <ms> <command...>` schedules `<command...>` to be published
//! as text input after `<ms>` milliseconds, or every `<ms>` milliseconds with
//! `-r`. `deltimer <id>` cancels a pending or repeating timer. Each timer is
//! one tokio task owned by the handler; dropping the handler cancels them.

use super::EventHandler;
use crate::bus::EventBus;
use crate::error::HandlerResult;
use async_trait::async_trait;
use herald_proto::{CommandDescriptor, CommandEvent, CommandEventBuilder, CommandKind, Event};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Identifier handed out for each scheduled timer.
pub type TimerId = u32;

const REPEAT_FLAG: &str = "-r";

/// Constructor for `timer` command events.
pub fn timer_command() -> CommandEventBuilder {
    CommandEventBuilder::new(CommandKind::TIMER)
}

/// Constructor for `deltimer` command events.
pub fn deltimer_command() -> CommandEventBuilder {
    CommandEventBuilder::new(CommandKind::DELTIMER)
}

pub struct TimeHandler {
    bus: EventBus,
    next_id: TimerId,
    timers: BTreeMap<TimerId, JoinHandle<()>>,
}

impl TimeHandler {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            next_id: 0,
            timers: BTreeMap::new(),
        }
    }

    /// Ids of timers that have not fired (one-shot) or been stopped.
    pub fn active(&mut self) -> Vec<TimerId> {
        self.prune();
        self.timers.keys().copied().collect()
    }

    /// Publish `line` as text input once after `delay`.
    pub fn delay(&mut self, delay: Duration, line: String) -> TimerId {
        let bus = self.bus.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            bus.publish(Event::text_input(line));
        });
        self.track(task)
    }

    /// Publish `line` as text input every `period`. `period` must be non-zero.
    pub fn repeat(&mut self, period: Duration, line: String) -> TimerId {
        let bus = self.bus.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                bus.publish(Event::text_input(line.clone()));
            }
        });
        self.track(task)
    }

    /// Stop a timer. Returns false if no such timer is pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.prune();
        match self.timers.remove(&id) {
            Some(task) => {
                task.abort();
                debug!(timer = id, "Timer stopped");
                true
            }
            None => false,
        }
    }

    fn track(&mut self, task: JoinHandle<()>) -> TimerId {
        self.prune();
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.timers.insert(id, task);
        id
    }

    fn prune(&mut self) {
        self.timers.retain(|_, task| !task.is_finished());
    }

    fn say(&self, text: String) {
        self.bus.publish(Event::text_output(text));
    }

    fn schedule(&mut self, cmd: &CommandEvent) {
        let mut args = cmd.tokens.as_slice();
        let recurring = args.first().is_some_and(|a| a == REPEAT_FLAG);
        if recurring {
            args = &args[1..];
        }

        let [ms, command @ ..] = args else {
            self.say("timer needs a delay in milliseconds and a command.\n".to_string());
            return;
        };
        if command.is_empty() {
            self.say("timer needs a delay in milliseconds and a command.\n".to_string());
            return;
        }
        let Ok(millis) = ms.parse::<u64>() else {
            self.say(format!("'{ms}' isn't a number of milliseconds.\n"));
            return;
        };
        if recurring && millis == 0 {
            self.say("A repeating timer needs a delay above 0 milliseconds.\n".to_string());
            return;
        }

        let line = command.join(" ");
        let period = Duration::from_millis(millis);
        let id = if recurring {
            self.repeat(period, line.clone())
        } else {
            self.delay(period, line.clone())
        };
        debug!(timer = id, delay_ms = millis, recurring, "Timer scheduled");

        let when = if recurring { "every" } else { "in" };
        let plural = if millis == 1 { "" } else { "s" };
        self.say(format!(
            "Timer {id} will run '{line}' {when} {millis} millisecond{plural}.\n"
        ));
    }

    fn unschedule(&mut self, cmd: &CommandEvent) {
        let Some(arg) = cmd.tokens.first() else {
            self.say("deltimer needs a timer id.\n".to_string());
            return;
        };
        let Ok(id) = arg.parse::<TimerId>() else {
            self.say(format!("'{arg}' isn't a timer id.\n"));
            return;
        };
        if self.cancel(id) {
            self.say(format!("Stopped timer {id}.\n"));
        } else {
            self.say(format!("No timer with id {id}.\n"));
        }
    }
}

impl Drop for TimeHandler {
    fn drop(&mut self) {
        for task in self.timers.values() {
            task.abort();
        }
    }
}

#[async_trait]
impl EventHandler for TimeHandler {
    fn name(&self) -> &'static str {
        "time"
    }

    async fn init(&mut self) -> HandlerResult {
        let timer = CommandDescriptor::builder("timer", timer_command)
            .describe("Runs a command after a delay, or repeatedly with -r.")
            .usage("'timer [-r] [milliseconds] [command]'")
            .options("-r: repeat every [milliseconds] until stopped")
            .build()?;
        let deltimer = CommandDescriptor::builder("deltimer", deltimer_command)
            .describe("Stops a timer.")
            .usage("'deltimer [timer id]'")
            .options("None")
            .build()?;
        self.bus.publish(Event::register_command(timer));
        self.bus.publish(Event::register_command(deltimer));
        Ok(())
    }

    async fn handle(&mut self, event: &Event) -> HandlerResult {
        if !event.propagate() {
            return Ok(());
        }
        if let Some(cmd) = event.as_command(CommandKind::TIMER) {
            self.schedule(cmd);
        } else if let Some(cmd) = event.as_command(CommandKind::DELTIMER) {
            self.unschedule(cmd);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventQueue;
    use herald_proto::{CommandPayload, EventKind};
    use tokio::time::timeout;

    fn command(ctor: fn() -> CommandEventBuilder, raw: &str) -> Event {
        let mut words = raw.split_whitespace();
        words.next();
        ctor().init(CommandPayload {
            raw_text: raw.to_string(),
            tokens: words.map(String::from).collect(),
        })
    }

    fn next_output(queue: &mut EventQueue) -> String {
        let event = queue.try_recv().expect("an event");
        match event.kind() {
            EventKind::TextOutput(out) => out.message.clone(),
            other => panic!("expected text output, got {other:?}"),
        }
    }

    async fn next_input(queue: &mut EventQueue) -> String {
        let event = queue.recv().await.expect("bus open");
        match event.kind() {
            EventKind::TextInput(input) => input.message.clone().unwrap_or_default(),
            other => panic!("expected text input, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn init_registers_both_commands() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        TimeHandler::new(bus).init().await.unwrap();

        let mut keywords = Vec::new();
        while let Some(event) = queue.try_recv() {
            if let EventKind::RegisterCommand(descriptor) = event.kind() {
                keywords.push(descriptor.invoke.clone());
            }
        }
        assert_eq!(keywords, ["timer", "deltimer"]);
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_timer_replays_line_after_delay() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        let mut handler = TimeHandler::new(bus);
        let start = Instant::now();

        handler
            .handle(&command(timer_command, "timer 250 echo hi"))
            .await
            .unwrap();
        assert_eq!(
            next_output(&mut queue),
            "Timer 0 will run 'echo hi' in 250 milliseconds.\n"
        );

        assert!(timeout(Duration::from_millis(249), queue.recv()).await.is_err());
        assert_eq!(next_input(&mut queue).await, "echo hi");
        assert!(start.elapsed() >= Duration::from_millis(250));

        // Fired once and gone.
        assert!(timeout(Duration::from_secs(10), queue.recv()).await.is_err());
        assert!(handler.active().is_empty());
        handler
            .handle(&command(deltimer_command, "deltimer 0"))
            .await
            .unwrap();
        assert_eq!(next_output(&mut queue), "No timer with id 0.\n");
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_timer_fires_until_stopped() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        let mut handler = TimeHandler::new(bus);
        let start = Instant::now();

        handler
            .handle(&command(timer_command, "timer -r 100 echo tick"))
            .await
            .unwrap();
        assert_eq!(
            next_output(&mut queue),
            "Timer 0 will run 'echo tick' every 100 milliseconds.\n"
        );

        for n in 1..=3u64 {
            assert_eq!(next_input(&mut queue).await, "echo tick");
            assert!(start.elapsed() >= Duration::from_millis(100 * n));
        }
        assert_eq!(handler.active(), [0]);

        handler
            .handle(&command(deltimer_command, "deltimer 0"))
            .await
            .unwrap();
        assert_eq!(next_output(&mut queue), "Stopped timer 0.\n");
        assert!(handler.active().is_empty());
        assert!(timeout(Duration::from_secs(10), queue.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_not_reused() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        let mut handler = TimeHandler::new(bus);

        handler.handle(&command(timer_command, "timer 10 a")).await.unwrap();
        handler.handle(&command(timer_command, "timer 20 b")).await.unwrap();
        assert!(handler.cancel(0));
        handler.handle(&command(timer_command, "timer 1 c")).await.unwrap();

        assert_eq!(next_output(&mut queue), "Timer 0 will run 'a' in 10 milliseconds.\n");
        assert_eq!(next_output(&mut queue), "Timer 1 will run 'b' in 20 milliseconds.\n");
        assert_eq!(next_output(&mut queue), "Timer 2 will run 'c' in 1 millisecond.\n");
        assert_eq!(handler.active(), [1, 2]);
    }

    #[tokio::test]
    async fn bad_arguments_get_a_reply() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        let mut handler = TimeHandler::new(bus);

        for (ctor, raw, reply) in [
            (timer_command as fn() -> CommandEventBuilder, "timer", "timer needs a delay in milliseconds and a command.\n"),
            (timer_command, "timer 100", "timer needs a delay in milliseconds and a command.\n"),
            (timer_command, "timer -r 100", "timer needs a delay in milliseconds and a command.\n"),
            (timer_command, "timer soon echo hi", "'soon' isn't a number of milliseconds.\n"),
            (timer_command, "timer -r 0 echo hi", "A repeating timer needs a delay above 0 milliseconds.\n"),
            (deltimer_command, "deltimer", "deltimer needs a timer id.\n"),
            (deltimer_command, "deltimer x", "'x' isn't a timer id.\n"),
            (deltimer_command, "deltimer 7", "No timer with id 7.\n"),
        ] {
            handler.handle(&command(ctor, raw)).await.unwrap();
            assert_eq!(next_output(&mut queue), reply, "input {raw:?}");
        }
        assert!(handler.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handler_cancels_timers() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        let mut handler = TimeHandler::new(bus);

        handler
            .handle(&command(timer_command, "timer -r 5 echo tick"))
            .await
            .unwrap();
        next_output(&mut queue);
        drop(handler);

        assert!(timeout(Duration::from_secs(1), queue.recv()).await.is_err());
    }

    #[tokio::test]
    async fn vetoed_commands_are_ignored() {
        let bus = EventBus::new();
        let mut queue = bus.subscribe("observer");
        let mut handler = TimeHandler::new(bus);

        let event = command(timer_command, "timer 5 echo hi");
        event.stop_propagation();
        handler.handle(&event).await.unwrap();
        assert!(queue.try_recv().is_none());
    }
}
