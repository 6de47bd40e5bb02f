//! Message routing: classify each inbound event, record it, apply karma,
//! and pick at most one response generator.

use crate::channel::{ChannelConfig, ChannelStore, MessageClass};
use crate::conversation::{MessageLog, NewMessage, StoredMessage};
use crate::error::Result;
use crate::generate::{GenerationContext, GeneratorKind, Generators};
use crate::karma::{self, KarmaStore};
use crate::links;
use crate::{MemberJoinEvent, MessageEvent, Mention, UserId};
use std::collections::{HashMap, HashSet};

/// Outcome of routing one message event.
///
/// The log entry is always present — history is preserved independent of
/// response policy. Karma deltas are non-empty only when the announcement
/// generator is selected, so applying them and announcing them stay paired.
#[derive(Debug)]
pub struct RouterDecision {
    pub class: MessageClass,
    pub generator: Option<GeneratorKind>,
    pub karma_deltas: HashMap<UserId, i64>,
    pub log_entry: NewMessage,
}

/// Routes inbound events to stores and generators.
pub struct Router {
    message_log: MessageLog,
    karma: KarmaStore,
    channels: ChannelStore,
    generators: Generators,
    bot_name: String,
    model_id: String,
    history_limit: i64,
}

impl Router {
    pub fn new(
        message_log: MessageLog,
        karma: KarmaStore,
        channels: ChannelStore,
        generators: Generators,
        bot_name: String,
        model_id: String,
        history_limit: i64,
    ) -> Self {
        Self {
            message_log,
            karma,
            channels,
            generators,
            bot_name,
            model_id,
            history_limit,
        }
    }

    /// Decide what to do with one message. Pure with respect to storage.
    ///
    /// Bot-authored messages and recognized command invocations are recorded
    /// but never answered. Karma classification takes strict priority over
    /// bot-mention so a message carrying both gets exactly one reply.
    pub fn route(&self, event: &MessageEvent, policy: &ChannelConfig) -> RouterDecision {
        let log_entry = NewMessage {
            channel_id: event.channel_id.clone(),
            author_id: event.author_id.clone(),
            author_name: event.author_name.clone(),
            content: normalize_mentions(&event.content, &event.mentions),
            model: event.from_bot.then(|| self.model_id.clone()),
            timestamp: event.timestamp,
        };

        let mut karma_deltas = if event.from_bot {
            HashMap::new()
        } else {
            karma::parse(&event.content, &event.mentions, &event.author_id)
        };

        let class = if !karma_deltas.is_empty() {
            MessageClass::KarmaEvent
        } else if event.mentions_bot || self.mentions_bot_by_name(&event.content) {
            MessageClass::MentionOfBot
        } else {
            MessageClass::PlainMessage
        };

        if !policy.should_process(class) {
            karma_deltas.clear();
        }

        let generator = if event.from_bot {
            None
        } else if class == MessageClass::KarmaEvent && policy.should_process(class) {
            Some(GeneratorKind::KarmaAnnounce)
        } else if !event.is_command && !policy.disabled && links::detect(&event.content).is_some() {
            // Summarization is a utility, not chat: verbosity does not gate
            // it, the disabled flag still does.
            Some(GeneratorKind::Summary)
        } else if !event.is_command && policy.should_process(class) {
            Some(GeneratorKind::Chat)
        } else {
            None
        };

        RouterDecision {
            class,
            generator,
            karma_deltas,
            log_entry,
        }
    }

    /// Process one inbound message end to end: log it, apply any karma, and
    /// run the selected generator. Returns the replies to send.
    ///
    /// Store failures propagate — they are fatal for this event. Generator
    /// failures downgrade to "no reply"; state already written stays
    /// written.
    pub async fn handle_message(&self, event: MessageEvent) -> Result<Vec<String>> {
        let policy = self.channels.get(&event.channel_id).await?;
        let decision = self.route(&event, &policy);

        self.message_log.append(&decision.log_entry).await?;

        let mut replies = Vec::new();

        match decision.generator {
            Some(GeneratorKind::KarmaAnnounce) => {
                for (user_id, username, delta) in ordered_deltas(&event.mentions, &decision.karma_deltas) {
                    let total = self.karma.apply_delta(&user_id, delta).await?;

                    let context = GenerationContext::KarmaChange {
                        username,
                        delta,
                        total,
                    };
                    match self
                        .generators
                        .for_kind(GeneratorKind::KarmaAnnounce)
                        .generate(context)
                        .await
                    {
                        Ok(text) => replies.push(text),
                        Err(error) => tracing::warn!(
                            %error,
                            user_id = user_id.as_ref(),
                            delta,
                            "karma announcement failed, delta committed without it"
                        ),
                    }
                }
            }
            Some(GeneratorKind::Summary) => {
                let Some(link) = links::detect(&event.content) else {
                    return Ok(replies);
                };
                let context = GenerationContext::Summary { link };
                match self
                    .generators
                    .for_kind(GeneratorKind::Summary)
                    .generate(context)
                    .await
                {
                    Ok(text) => replies.push(text),
                    Err(error) => tracing::warn!(%error, "content summary failed"),
                }
            }
            Some(GeneratorKind::Chat) => {
                let history = self
                    .message_log
                    .load_recent(&event.channel_id, self.history_limit)
                    .await?;

                let context = GenerationContext::Chat {
                    guild_name: event.guild_name.clone(),
                    channel_name: event.channel_name.clone(),
                    history: render_history(&history),
                };
                match self
                    .generators
                    .for_kind(GeneratorKind::Chat)
                    .generate(context)
                    .await
                {
                    Ok(text) => {
                        if is_repetitive(&history, &text) {
                            tracing::info!(channel_id = event.channel_id.as_ref(), "duplicate reply suppressed");
                        } else {
                            replies.push(text);
                        }
                    }
                    Err(error) => tracing::warn!(%error, "chat reply failed"),
                }
            }
            Some(GeneratorKind::Welcome) | None => {}
        }

        Ok(replies)
    }

    /// Greet a new member. Bypasses classification and policy entirely.
    pub async fn handle_member_join(&self, event: MemberJoinEvent) -> Result<Option<String>> {
        let context = GenerationContext::Welcome {
            username: event.display_name.clone(),
        };

        match self
            .generators
            .for_kind(GeneratorKind::Welcome)
            .generate(context)
            .await
        {
            Ok(text) => Ok(Some(text)),
            Err(error) => {
                tracing::warn!(%error, member = %event.display_name, "welcome message failed");
                Ok(None)
            }
        }
    }

    fn mentions_bot_by_name(&self, content: &str) -> bool {
        content
            .to_lowercase()
            .contains(&self.bot_name.to_lowercase())
    }
}

/// Rewrite raw mention tokens to `@name` form before persisting, so the log
/// and the chat history window read as plain text.
fn normalize_mentions(content: &str, mentions: &[Mention]) -> String {
    let mut normalized = content.to_string();
    for mention in mentions {
        let readable = format!("@{}", mention.display_name);
        normalized = normalized.replace(&format!("<@{}>", mention.user_id), &readable);
        normalized = normalized.replace(&format!("<@!{}>", mention.user_id), &readable);
    }
    normalized
}

/// Deltas in first-appearance order, so multi-user announcements come out in
/// the order people were mentioned.
fn ordered_deltas(
    mentions: &[Mention],
    deltas: &HashMap<UserId, i64>,
) -> Vec<(UserId, String, i64)> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    for mention in mentions {
        if !seen.insert(mention.user_id.clone()) {
            continue;
        }
        if let Some(delta) = deltas.get(&mention.user_id) {
            ordered.push((mention.user_id.clone(), mention.display_name.clone(), *delta));
        }
    }

    ordered
}

fn render_history(history: &[StoredMessage]) -> String {
    history
        .iter()
        .map(|message| format!("{}: {}", message.author_name, message.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Repetition guard: drop a reply that parrots the last user message
/// (case-insensitively) or repeats the bot's own last message.
fn is_repetitive(history: &[StoredMessage], reply: &str) -> bool {
    let last_user = history.iter().rev().find(|message| message.model.is_none());
    let last_bot = history.iter().rev().find(|message| message.model.is_some());

    last_user.is_some_and(|message| message.content.eq_ignore_ascii_case(reply))
        || last_bot.is_some_and(|message| message.content == reply)
}
