//! Response generators: one external-collaborator capability per kind.
//!
//! The router selects a generator by enumerated kind and performs exactly one
//! call. Retries against the backing services live inside the generator
//! implementations, never in routing logic.

pub mod announce;
pub mod chat;
pub mod retry;
pub mod summary;
pub mod traits;
pub mod welcome;

pub use announce::KarmaAnnouncer;
pub use chat::ChatGenerator;
pub use summary::SummaryGenerator;
pub use traits::{Generator, GeneratorDyn};
pub use welcome::WelcomeGenerator;

use crate::config::{LlmConfig, SummaryConfig};
use crate::error::Result;
use crate::links::ContentLink;
use crate::llm::ChatClient;
use crate::summarize::{TranscriptClient, WebSummaryClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The closed set of generators the router can select.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Chat,
    KarmaAnnounce,
    Welcome,
    Summary,
}

impl GeneratorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorKind::Chat => "chat",
            GeneratorKind::KarmaAnnounce => "karma_announce",
            GeneratorKind::Welcome => "welcome",
            GeneratorKind::Summary => "summary",
        }
    }
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Context bundle handed to a generator. Each kind consumes its own variant.
#[derive(Debug, Clone)]
pub enum GenerationContext {
    Chat {
        guild_name: String,
        channel_name: String,
        /// History window, oldest first, already rendered as `author: text`
        /// lines.
        history: String,
    },
    KarmaChange {
        username: String,
        delta: i64,
        total: i64,
    },
    Welcome {
        username: String,
    },
    Summary {
        link: ContentLink,
    },
}

/// The four generator implementations, selected by kind.
#[derive(Clone)]
pub struct Generators {
    chat: Arc<dyn GeneratorDyn>,
    karma: Arc<dyn GeneratorDyn>,
    welcome: Arc<dyn GeneratorDyn>,
    summary: Arc<dyn GeneratorDyn>,
}

impl Generators {
    pub fn new(
        chat: Arc<dyn GeneratorDyn>,
        karma: Arc<dyn GeneratorDyn>,
        welcome: Arc<dyn GeneratorDyn>,
        summary: Arc<dyn GeneratorDyn>,
    ) -> Self {
        Self {
            chat,
            karma,
            welcome,
            summary,
        }
    }

    /// Build the production set against the configured backends.
    pub fn from_config(llm: &LlmConfig, summary: &SummaryConfig) -> Result<Self> {
        let chat_client = ChatClient::new(llm)?;
        let transcripts = TranscriptClient::new(summary)?;
        let web_summaries = WebSummaryClient::new(summary)?;

        Ok(Self::new(
            Arc::new(ChatGenerator::new(chat_client.clone())),
            Arc::new(KarmaAnnouncer::new(chat_client.clone())),
            Arc::new(WelcomeGenerator::new(chat_client.clone())),
            Arc::new(SummaryGenerator::new(chat_client, transcripts, web_summaries)),
        ))
    }

    pub fn for_kind(&self, kind: GeneratorKind) -> &dyn GeneratorDyn {
        match kind {
            GeneratorKind::Chat => self.chat.as_ref(),
            GeneratorKind::KarmaAnnounce => self.karma.as_ref(),
            GeneratorKind::Welcome => self.welcome.as_ref(),
            GeneratorKind::Summary => self.summary.as_ref(),
        }
    }
}
