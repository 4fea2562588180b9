//! Builtin module table.
//!
//! Each builtin contributes one handler. Modules are selected by name in the
//! configuration and added to the supervisor in the configured order.

use crate::bus::EventBus;
use crate::config::Config;
use crate::handlers::{
    BusSink, CommandRegistry, EchoHandler, EventHandler, HelpRegistry, TimeHandler, TtyOutput,
};
use crate::supervisor::Supervisor;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error("unknown builtin module '{0}'")]
    Unknown(String),
    #[error("builtin module '{0}' listed more than once")]
    Duplicate(Builtin),
}

/// Modules shipped with the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Terminal output, plus stdin ingress started by the binary.
    Tty,
    CommandRegistry,
    Help,
    Echo,
    /// The `timer` and `deltimer` commands.
    Time,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Tty,
        Builtin::CommandRegistry,
        Builtin::Help,
        Builtin::Echo,
        Builtin::Time,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tty => "tty",
            Self::CommandRegistry => "command_registry",
            Self::Help => "help",
            Self::Echo => "echo",
            Self::Time => "time",
        }
    }

    /// Build this module's handler.
    pub fn handler(self, bus: &EventBus, config: &Config) -> Box<dyn EventHandler> {
        let keyword_match = config.commands.keyword_match;
        match self {
            Self::Tty => Box::new(TtyOutput::stdout()),
            Self::CommandRegistry => Box::new(CommandRegistry::new(bus.clone(), keyword_match)),
            Self::Help => Box::new(HelpRegistry::new(
                bus.clone(),
                Box::new(BusSink::new(bus.clone())),
                keyword_match,
            )),
            Self::Echo => Box::new(EchoHandler::new(bus.clone())),
            Self::Time => Box::new(TimeHandler::new(bus.clone())),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Builtin {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ModuleError::Unknown(s.to_string()))
    }
}

/// Resolve the configured builtin names, rejecting unknown or repeated ones.
pub fn resolve(config: &Config) -> Result<Vec<Builtin>, ModuleError> {
    let mut builtins = Vec::with_capacity(config.modules.builtins.len());
    for name in &config.modules.builtins {
        let builtin: Builtin = name.parse()?;
        if builtins.contains(&builtin) {
            return Err(ModuleError::Duplicate(builtin));
        }
        builtins.push(builtin);
    }
    Ok(builtins)
}

/// Build a supervisor with one handler per configured builtin.
pub fn load_builtins(bus: EventBus, config: &Config) -> Result<(Supervisor, Vec<Builtin>), ModuleError> {
    let builtins = resolve(config)?;
    let mut supervisor = Supervisor::new(bus);
    for builtin in &builtins {
        let handler = builtin.handler(supervisor.bus(), config);
        supervisor.add(handler);
        tracing::debug!(module = %builtin, "Builtin module loaded");
    }
    Ok((supervisor, builtins))
}
