//! Karma announcement generator.

use crate::error::GenerationError;
use crate::generate::retry::{DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, with_retries};
use crate::generate::{GenerationContext, Generator, GeneratorKind};
use crate::llm::ChatClient;
use crate::prompts;

const MAX_TOKENS: u32 = 100;

/// Turns an applied karma delta into a one-line announcement.
pub struct KarmaAnnouncer {
    client: ChatClient,
}

impl KarmaAnnouncer {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

impl Generator for KarmaAnnouncer {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::KarmaAnnounce
    }

    async fn generate(&self, context: GenerationContext) -> Result<String, GenerationError> {
        let GenerationContext::KarmaChange {
            username,
            delta,
            total,
        } = context
        else {
            return Err(GenerationError::WrongContext { kind: "karma_announce" });
        };

        let system = prompts::system_with(prompts::KARMA_INSTRUCTIONS);
        let prompt = prompts::karma_prompt(&username, delta, total);

        with_retries(DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, "karma_announce", || {
            self.client.complete(&system, &prompt, MAX_TOKENS)
        })
        .await
    }
}
