//! Administrative commands.
//!
//! Commands are registered in an explicit name-to-kind table built at
//! startup; there is no runtime registration. The platform adapter decides
//! who may invoke them.

use crate::ChannelId;
use crate::channel::{ChannelStore, VerbosityLevel};
use crate::error::{Result, ValidationError};
use std::collections::HashMap;

/// Command prefix on the chat surface.
pub const PREFIX: char = '!';

/// The closed set of administrative commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Flip automatic responses for the current channel.
    Toggle,
    /// Set the verbosity level for the current channel.
    SetVerbosity,
}

/// A recognized command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub kind: CommandKind,
    pub args: &'a str,
}

/// Name-to-command table plus the store the handlers act on.
#[derive(Clone)]
pub struct CommandRegistry {
    table: HashMap<&'static str, CommandKind>,
    channels: ChannelStore,
}

impl CommandRegistry {
    pub fn new(channels: ChannelStore) -> Self {
        let table = HashMap::from([
            ("toggle", CommandKind::Toggle),
            ("verbosity", CommandKind::SetVerbosity),
        ]);

        Self { table, channels }
    }

    /// Recognize a command invocation. Text that does not name a registered
    /// command is not a command, it is an ordinary message.
    pub fn parse<'a>(&self, content: &'a str) -> Option<Invocation<'a>> {
        let rest = content.trim().strip_prefix(PREFIX)?.trim_start();
        let name = rest.split_whitespace().next()?;
        let kind = *self.table.get(name)?;
        let args = rest[name.len()..].trim();

        Some(Invocation { kind, args })
    }

    /// Whether the content is a recognized command invocation.
    pub fn is_command(&self, content: &str) -> bool {
        self.parse(content).is_some()
    }

    /// Run a command against a channel. Returns the confirmation text to
    /// send; validation failures surface as [`ValidationError`] with no
    /// state change.
    pub async fn execute(&self, invocation: Invocation<'_>, channel_id: &ChannelId) -> Result<String> {
        match invocation.kind {
            CommandKind::Toggle => {
                let disabled = self.channels.toggle_disabled(channel_id).await?;
                let status = if disabled { "disabled" } else { "enabled" };
                Ok(format!("Automatic responses are now {status} in this channel."))
            }
            CommandKind::SetVerbosity => {
                let raw = invocation.args.trim();
                if raw.is_empty() {
                    return Err(ValidationError::MissingArgument("verbosity level").into());
                }

                let verbosity = raw
                    .parse::<i64>()
                    .ok()
                    .and_then(VerbosityLevel::from_level)
                    .ok_or_else(|| ValidationError::InvalidVerbosity(raw.to_string()))?;

                self.channels.set_verbosity(channel_id, verbosity).await?;
                Ok(format!(
                    "Verbosity level set to {verbosity} ({}) in this channel.",
                    verbosity.describe()
                ))
            }
        }
    }
}
