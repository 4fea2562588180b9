//! Command registration and command events.
//!
//! A handler that wants to own a command publishes a
//! [`CommandDescriptor`](crate::CommandDescriptor) inside a
//! `RegisterCommand` event. The descriptor carries an [`EventConstructor`]:
//! a plain function returning a [`CommandEventBuilder`] for the command's
//! [`CommandKind`]. When user text matches the keyword, the registry calls the
//! constructor and finalizes the builder with a [`CommandPayload`].

use std::fmt;

use smallvec::SmallVec;

use crate::error::{ProtoError, Result};
use crate::event::{Event, EventKind};

/// Whitespace-split words of a line. Most commands are short.
pub type Tokens<'a> = SmallVec<[&'a str; 8]>;

/// Split a line on runs of separators (see [`is_separator`]).
pub fn tokenize(raw: &str) -> Tokens<'_> {
    raw.split(is_separator).filter(|t| !t.is_empty()).collect()
}

/// Characters that separate tokens: Unicode whitespace plus the ASCII
/// information separators `\x1c`..=`\x1f` (file, group, record and unit
/// separator), which line-oriented shells also treat as blanks.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Stable identifier of a command event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandKind(&'static str);

impl CommandKind {
    /// The builtin `help` command.
    pub const HELP: CommandKind = CommandKind::new("help");
    /// The builtin `echo` command.
    pub const ECHO: CommandKind = CommandKind::new("echo");
    /// The builtin `timer` command.
    pub const TIMER: CommandKind = CommandKind::new("timer");
    /// The builtin `deltimer` command.
    pub const DELTIMER: CommandKind = CommandKind::new("deltimer");

    /// Declare a command kind.
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    /// The identifier.
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Payload every command event is initialized with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPayload {
    /// The full line the user typed.
    pub raw_text: String,
    /// Words after the invoke keyword, in order.
    pub tokens: Vec<String>,
}

/// A parsed command addressed to whichever handler owns `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    /// Which command this is.
    pub kind: CommandKind,
    /// The full line the user typed.
    pub raw_text: String,
    /// Words after the invoke keyword, in order.
    pub tokens: Vec<String>,
}

/// First phase of building a command event: the type is known, the payload
/// is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEventBuilder {
    kind: CommandKind,
}

impl CommandEventBuilder {
    /// Start a command event of `kind`.
    pub const fn new(kind: CommandKind) -> Self {
        Self { kind }
    }

    /// The kind this builder produces.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Second phase: attach the payload and produce the immutable event.
    pub fn init(self, payload: CommandPayload) -> Event {
        Event::new(EventKind::Command(CommandEvent {
            kind: self.kind,
            raw_text: payload.raw_text,
            tokens: payload.tokens,
        }))
    }
}

/// Factory producing a fresh builder for a command's event type.
pub type EventConstructor = fn() -> CommandEventBuilder;

/// Everything a registry needs to know about a command.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    /// Keyword the user types. Tables key it lower-cased.
    pub invoke: String,
    /// One-line description shown in the command listing.
    pub describe: String,
    /// Usage line.
    pub usage: String,
    /// Options text.
    pub options: String,
    /// Builds the command's event.
    pub event_constructor: EventConstructor,
}

impl CommandDescriptor {
    /// Start describing a command invoked by `invoke`.
    pub fn builder(invoke: impl Into<String>, constructor: EventConstructor) -> CommandDescriptorBuilder {
        CommandDescriptorBuilder {
            invoke: invoke.into(),
            describe: String::new(),
            usage: String::new(),
            options: String::new(),
            constructor,
        }
    }

    /// Table key for this descriptor.
    pub fn keyword(&self) -> String {
        self.invoke.to_lowercase()
    }

    /// Kind of event this command produces.
    pub fn command_kind(&self) -> CommandKind {
        (self.event_constructor)().kind()
    }
}

/// Builder for [`CommandDescriptor`]. Validates the keyword on [`build`](Self::build).
#[derive(Debug, Clone)]
#[must_use]
pub struct CommandDescriptorBuilder {
    invoke: String,
    describe: String,
    usage: String,
    options: String,
    constructor: EventConstructor,
}

impl CommandDescriptorBuilder {
    /// Set the one-line description.
    pub fn describe(mut self, describe: impl Into<String>) -> Self {
        self.describe = describe.into();
        self
    }

    /// Set the usage line.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Set the options text.
    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    /// Finish the descriptor.
    ///
    /// Fails if the keyword is empty or contains whitespace, since the
    /// registry matches against a single whitespace-delimited token.
    pub fn build(self) -> Result<CommandDescriptor> {
        if self.invoke.is_empty() {
            return Err(ProtoError::EmptyKeyword);
        }
        if self.invoke.chars().any(is_separator) {
            return Err(ProtoError::WhitespaceInKeyword(self.invoke));
        }

        Ok(CommandDescriptor {
            invoke: self.invoke,
            describe: self.describe,
            usage: self.usage,
            options: self.options,
            event_constructor: self.constructor,
        })
    }
}
