//! Terminal I/O: stdin ingress and text output.

use super::EventHandler;
use crate::bus::EventBus;
use crate::error::HandlerResult;
use async_trait::async_trait;
use herald_proto::{Event, EventKind};
use std::io::{self, BufRead};
use std::thread;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Writes every `TextOutput` event to a writer.
pub struct TtyOutput<W> {
    writer: W,
}

impl TtyOutput<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> TtyOutput<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> EventHandler for TtyOutput<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &'static str {
        "tty_output"
    }

    async fn handle(&mut self, event: &Event) -> HandlerResult {
        if !event.propagate() {
            return Ok(());
        }
        if let EventKind::TextOutput(out) = event.kind() {
            self.writer.write_all(out.message.as_bytes()).await?;
            self.writer.flush().await?;
        }
        Ok(())
    }
}

/// Resolves once a line reader has hit EOF or a read error.
pub type InputClosed = oneshot::Receiver<()>;

/// Publish one `TextInput` event per line read from `reader` until EOF.
///
/// Reading happens on a detached OS thread. A blocked read never holds up
/// runtime shutdown, and the thread dies with the process.
pub fn spawn_line_reader<R>(bus: EventBus, reader: R) -> io::Result<InputClosed>
where
    R: BufRead + Send + 'static,
{
    let (closed_tx, closed_rx) = oneshot::channel();
    thread::Builder::new()
        .name("herald-input".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        bus.publish(Event::text_input(line));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read input line");
                        break;
                    }
                }
            }
            debug!("Input closed");
            let _ = closed_tx.send(());
        })?;
    Ok(closed_rx)
}

/// Publish one `TextInput` event per line of stdin until EOF.
pub fn spawn_stdin_reader(bus: EventBus) -> io::Result<InputClosed> {
    spawn_line_reader(bus, io::BufReader::new(io::stdin()))
}
