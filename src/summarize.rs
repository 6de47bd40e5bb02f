//! External transcript and web-summary services.
//!
//! Both wrap remote HTTP endpoints and are consumed only by the summary
//! generator; the router never talks to them directly.

use crate::config::SummaryConfig;
use crate::error::{GenerationError, Result};
use anyhow::Context as _;
use serde::Deserialize;
use serde_json::Value;

/// A fetched video transcript.
#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub transcript: String,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "Video".to_string()
}

/// Client for the transcript service.
#[derive(Debug, Clone)]
pub struct TranscriptClient {
    http: reqwest::Client,
    url: String,
    token: String,
}

impl TranscriptClient {
    pub fn new(config: &SummaryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .with_context(|| "failed to build transcript HTTP client")?;

        Ok(Self {
            http,
            url: config.transcript_url.clone(),
            token: config.transcript_token.clone(),
        })
    }

    /// Fetch the transcript for a video id.
    pub async fn fetch(
        &self,
        video_id: &str,
    ) -> std::result::Result<Transcript, GenerationError> {
        let body = serde_json::json!({
            "video_id_or_url": format!("https://www.youtube.com/watch?v={video_id}"),
        });

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|error| GenerationError::RequestFailed(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::RequestFailed(format!(
                "transcript service returned {status}"
            )));
        }

        let transcript: Transcript = response
            .json()
            .await
            .map_err(|error| GenerationError::InvalidResponse(error.to_string()))?;

        if transcript.transcript.is_empty() {
            return Err(GenerationError::MissingTranscript {
                video_id: video_id.to_string(),
            });
        }

        Ok(transcript)
    }
}

/// Client for the web-summary service. Unlike the transcript service, this
/// endpoint returns the finished summary itself.
#[derive(Debug, Clone)]
pub struct WebSummaryClient {
    http: reqwest::Client,
    url: String,
    token: String,
}

impl WebSummaryClient {
    pub fn new(config: &SummaryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(90))
            .build()
            .with_context(|| "failed to build web summary HTTP client")?;

        Ok(Self {
            http,
            url: config.web_summary_url.clone(),
            token: config.web_summary_token.clone(),
        })
    }

    /// Summarize a web page.
    pub async fn summarize(&self, url: &str) -> std::result::Result<String, GenerationError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|error| GenerationError::RequestFailed(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::RequestFailed(format!(
                "web summary service returned {status}"
            )));
        }

        let result: Value = response
            .json()
            .await
            .map_err(|error| GenerationError::InvalidResponse(error.to_string()))?;

        // The service returns either the summary string or an error object.
        match result {
            Value::String(summary) if !summary.is_empty() => Ok(summary),
            Value::Object(object) => {
                let detail = object
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unexpected object response");
                Err(GenerationError::InvalidResponse(detail.to_string()))
            }
            other => Err(GenerationError::InvalidResponse(format!(
                "unexpected response shape: {other}"
            ))),
        }
    }
}
