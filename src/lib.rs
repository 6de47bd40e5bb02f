//! Pomelo: a persona-driven community chat assistant with a karma ledger.
//!
//! Every inbound message is an independent unit of work: the router
//! classifies it, records it, applies any karma deltas, and picks at most
//! one response generator. Platform transport, the generative backends, and
//! the summary services live behind narrow boundaries.

pub mod channel;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod db;
pub mod error;
pub mod generate;
pub mod karma;
pub mod links;
pub mod llm;
pub mod messaging;
pub mod prompts;
pub mod router;
pub mod summarize;

pub use error::{Error, Result};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User identifier type.
pub type UserId = Arc<str>;

/// Channel identifier type.
pub type ChannelId = Arc<str>;

/// A user mention carried by a message, in the order it appears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub user_id: UserId,
    pub display_name: String,
}

/// Inbound chat message, already translated from the platform's shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub guild_name: String,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    /// Mentioned users, ordered as they appear in the raw content.
    pub mentions: Vec<Mention>,
    /// True when the bot's own user id is among the mentions.
    pub mentions_bot: bool,
    /// True when the bot itself authored the message.
    pub from_bot: bool,
    /// True when the platform adapter recognized an administrative command.
    pub is_command: bool,
    pub timestamp: DateTime<Utc>,
}

/// A member joining the community; drives the welcome generator directly,
/// with no karma or content classification involved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberJoinEvent {
    pub user_id: UserId,
    pub display_name: String,
    pub guild_name: String,
}
