//! herald - event-driven text-command runtime.
//!
//! Handlers never call one another. Each owns a queue on the [`EventBus`] and
//! reacts to what arrives there; anything it wants others to know, it
//! publishes. Commands are advertised the same way: a handler publishes a
//! registration, the [`CommandRegistry`](handlers::CommandRegistry) records
//! it, and matching lines of text input come back as typed command events.

pub mod bus;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod modules;
pub mod supervisor;
pub mod table;
pub mod telemetry;

pub use bus::{EventBus, EventQueue};
pub use config::{Config, KeywordMatch};
pub use error::{HandlerError, HandlerResult, RegistryError};
pub use handlers::EventHandler;
pub use supervisor::{Running, Supervisor};
