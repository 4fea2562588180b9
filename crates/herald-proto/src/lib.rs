//! # herald-proto
//!
//! Event and command-registration types shared by every herald handler.
//!
//! Handlers never call each other. They publish [`Event`]s, and every event is
//! delivered to every handler's queue. This crate defines what travels on
//! that bus:
//!
//! - [`Event`]: the published envelope, with a cooperative propagation flag
//! - [`EventKind`]: the closed set of payloads
//! - [`CommandDescriptor`]: what a handler publishes to advertise a command
//! - [`CommandEventBuilder`]: two-phase construction of command events
//!
//! ## Quick Start
//!
//! ```rust
//! use herald_proto::{CommandDescriptor, CommandEventBuilder, CommandKind, CommandPayload};
//!
//! const GREET: CommandKind = CommandKind::new("greet");
//!
//! fn greet() -> CommandEventBuilder {
//!     CommandEventBuilder::new(GREET)
//! }
//!
//! let descriptor = CommandDescriptor::builder("greet", greet)
//!     .describe("Says hello.")
//!     .usage("'greet [name]'")
//!     .build()
//!     .expect("valid keyword");
//!
//! let event = (descriptor.event_constructor)().init(CommandPayload {
//!     raw_text: "greet world".to_string(),
//!     tokens: vec!["world".to_string()],
//! });
//! assert!(event.is_command(GREET));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod event;

pub use command::{
    CommandDescriptor, CommandDescriptorBuilder, CommandEvent, CommandEventBuilder, CommandKind,
    CommandPayload, EventConstructor, Tokens, is_separator, tokenize,
};
pub use error::{ProtoError, Result};
pub use event::{Event, EventKind, TextInput, TextOutput};
