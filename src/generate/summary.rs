//! Content summary generator.

use crate::error::GenerationError;
use crate::generate::retry::{DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, with_retries};
use crate::generate::{GenerationContext, Generator, GeneratorKind};
use crate::links::ContentLink;
use crate::llm::ChatClient;
use crate::prompts;
use crate::summarize::{TranscriptClient, WebSummaryClient};

const MAX_TOKENS: u32 = 300;

/// Summarizes linked content. Video links go through the transcript service
/// and then the chat backend; other web links are summarized by the
/// web-summary service directly.
pub struct SummaryGenerator {
    client: ChatClient,
    transcripts: TranscriptClient,
    web_summaries: WebSummaryClient,
}

impl SummaryGenerator {
    pub fn new(
        client: ChatClient,
        transcripts: TranscriptClient,
        web_summaries: WebSummaryClient,
    ) -> Self {
        Self {
            client,
            transcripts,
            web_summaries,
        }
    }

    async fn summarize_video(&self, video_id: &str) -> Result<String, GenerationError> {
        let transcript = with_retries(DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, "transcript", || {
            self.transcripts.fetch(video_id)
        })
        .await?;

        let system = prompts::system_with(prompts::SUMMARY_INSTRUCTIONS);
        let prompt = prompts::video_summary_prompt(&transcript.title, &transcript.transcript);

        with_retries(DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, "video_summary", || {
            self.client.complete(&system, &prompt, MAX_TOKENS)
        })
        .await
    }
}

impl Generator for SummaryGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Summary
    }

    async fn generate(&self, context: GenerationContext) -> Result<String, GenerationError> {
        let GenerationContext::Summary { link } = context else {
            return Err(GenerationError::WrongContext { kind: "summary" });
        };

        match link {
            ContentLink::Video { video_id } => self.summarize_video(&video_id).await,
            ContentLink::Web { url } => {
                with_retries(DEFAULT_ATTEMPTS, DEFAULT_BACKOFF, "web_summary", || {
                    self.web_summaries.summarize(&url)
                })
                .await
            }
        }
    }
}
