//! General chat generator.

use crate::error::GenerationError;
use crate::generate::retry::{DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, with_retries};
use crate::generate::{GenerationContext, Generator, GeneratorKind};
use crate::llm::ChatClient;
use crate::prompts;

const MAX_TOKENS: u32 = 300;

/// Replies to channel conversation with the persona, grounded in the recent
/// history window.
pub struct ChatGenerator {
    client: ChatClient,
}

impl ChatGenerator {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

impl Generator for ChatGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Chat
    }

    async fn generate(&self, context: GenerationContext) -> Result<String, GenerationError> {
        let GenerationContext::Chat {
            guild_name,
            channel_name,
            history,
        } = context
        else {
            return Err(GenerationError::WrongContext { kind: "chat" });
        };

        let prompt = prompts::chat_prompt(&guild_name, &channel_name, &history);

        with_retries(DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, "chat", || {
            self.client.complete(prompts::SYSTEM, &prompt, MAX_TOKENS)
        })
        .await
    }
}
