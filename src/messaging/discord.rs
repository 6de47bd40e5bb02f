//! Discord adapter: serenity gateway events in, router replies out.

use crate::commands::CommandRegistry;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::router::Router;
use crate::{MemberJoinEvent, Mention, MessageEvent};
use anyhow::Context as _;
use serenity::all::{
    ChannelId as DiscordChannelId, Client, Context, EventHandler, GatewayIntents, Member, Message,
    Mentionable as _, Ready, RoleId,
};
use serenity::async_trait;
use std::sync::Arc;

struct Handler {
    router: Arc<Router>,
    commands: CommandRegistry,
    admin_role_id: Option<u64>,
    welcome_channel_id: Option<u64>,
}

impl Handler {
    /// Whether the author may run administrative commands. With no operator
    /// role configured, anyone may.
    fn is_operator(&self, message: &Message) -> bool {
        let Some(role_id) = self.admin_role_id else {
            return true;
        };

        message
            .member
            .as_ref()
            .is_some_and(|member| member.roles.contains(&RoleId::new(role_id)))
    }

    async fn send(&self, ctx: &Context, channel_id: DiscordChannelId, text: String) {
        if let Err(error) = channel_id.say(&ctx.http, text).await {
            tracing::error!(%error, channel_id = %channel_id, "failed to send message");
        }
    }

    async fn run_command(&self, ctx: &Context, message: &Message, channel_id: &crate::ChannelId) {
        if !self.is_operator(message) {
            self.send(
                ctx,
                message.channel_id,
                "Only operators can use administrative commands.".to_string(),
            )
            .await;
            return;
        }

        let Some(invocation) = self.commands.parse(&message.content) else {
            return;
        };

        match self.commands.execute(invocation, channel_id).await {
            Ok(confirmation) => self.send(ctx, message.channel_id, confirmation).await,
            // Bad input goes back to the invoking user; nothing changed.
            Err(Error::Validation(error)) => {
                self.send(ctx, message.channel_id, error.to_string()).await
            }
            Err(error) => tracing::error!(%error, "administrative command failed"),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "connected to Discord");
    }

    async fn message(&self, ctx: Context, message: Message) {
        let bot_id = ctx.cache.current_user().id;

        // Pull names out of the cache before the first await; cache refs
        // are not Send.
        let (guild_name, channel_name) = {
            match message.guild(&ctx.cache) {
                Some(guild) => (
                    guild.name.clone(),
                    guild
                        .channels
                        .get(&message.channel_id)
                        .map(|channel| channel.name.clone())
                        .unwrap_or_default(),
                ),
                None => (String::new(), String::new()),
            }
        };

        let from_bot = message.author.id == bot_id;
        let channel_id: crate::ChannelId = message.channel_id.to_string().into();
        let is_command = !from_bot && self.commands.is_command(&message.content);

        if is_command {
            self.run_command(&ctx, &message, &channel_id).await;
        }

        let event = MessageEvent {
            channel_id,
            channel_name,
            guild_name,
            author_id: message.author.id.to_string().into(),
            author_name: message.author.name.clone(),
            content: message.content.clone(),
            mentions: message
                .mentions
                .iter()
                .map(|user| Mention {
                    user_id: user.id.to_string().into(),
                    display_name: user.name.clone(),
                })
                .collect(),
            mentions_bot: message.mentions.iter().any(|user| user.id == bot_id),
            from_bot,
            is_command,
            timestamp: chrono::Utc::now(),
        };

        match self.router.handle_message(event).await {
            Ok(replies) => {
                for reply in replies {
                    self.send(&ctx, message.channel_id, reply).await;
                }
            }
            // Fatal for this event only; the next event proceeds.
            Err(error) => tracing::error!(%error, "message handling failed"),
        }
    }

    async fn guild_member_addition(&self, ctx: Context, member: Member) {
        let Some(welcome_channel) = self.welcome_channel_id else {
            return;
        };

        let guild_name = {
            member
                .guild_id
                .to_guild_cached(&ctx.cache)
                .map(|guild| guild.name.clone())
                .unwrap_or_default()
        };

        let event = MemberJoinEvent {
            user_id: member.user.id.to_string().into(),
            display_name: member.user.name.clone(),
            guild_name,
        };

        match self.router.handle_member_join(event).await {
            Ok(Some(greeting)) => {
                let target = DiscordChannelId::new(welcome_channel);
                self.send(&ctx, target, format!("{} {}", member.mention(), greeting))
                    .await;
            }
            Ok(None) => {}
            Err(error) => tracing::error!(%error, "member join handling failed"),
        }
    }
}

/// Connect to the Discord gateway and run until the client exits.
pub async fn run(config: &Config, router: Arc<Router>, commands: CommandRegistry) -> Result<()> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler {
        router,
        commands,
        admin_role_id: config.admin_role_id,
        welcome_channel_id: config.welcome_channel_id,
    };

    let mut client = Client::builder(&config.bot_token, intents)
        .event_handler(handler)
        .await
        .context("failed to build Discord client")?;

    client.start().await.context("Discord client error")?;

    Ok(())
}
