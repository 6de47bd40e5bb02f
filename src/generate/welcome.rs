//! Welcome message generator.

use crate::error::GenerationError;
use crate::generate::retry::{DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, with_retries};
use crate::generate::{GenerationContext, Generator, GeneratorKind};
use crate::llm::ChatClient;
use crate::prompts;

const MAX_TOKENS: u32 = 150;

/// Greets new members. Driven by the member-joined event, not by message
/// classification.
pub struct WelcomeGenerator {
    client: ChatClient,
}

impl WelcomeGenerator {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}

impl Generator for WelcomeGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Welcome
    }

    async fn generate(&self, context: GenerationContext) -> Result<String, GenerationError> {
        let GenerationContext::Welcome { username } = context else {
            return Err(GenerationError::WrongContext { kind: "welcome" });
        };

        let system = prompts::system_with(prompts::WELCOME_INSTRUCTIONS);
        let prompt = prompts::welcome_prompt(&username);

        with_retries(DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, "welcome", || {
            self.client.complete(&system, &prompt, MAX_TOKENS)
        })
        .await
    }
}
