//! Configuration loading and validation.
//!
//! Everything comes from the environment and is validated once at startup;
//! nothing in the routing core reads env vars directly.

use crate::error::{ConfigError, Result};
use anyhow::Context as _;

/// Pomelo configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory path.
    pub data_dir: std::path::PathBuf,

    /// Discord bot token.
    pub bot_token: String,

    /// Display name the bot answers to. Plain-text occurrences of this name
    /// count as a bot mention for routing purposes.
    pub bot_name: String,

    /// Chat-completions backend configuration.
    pub llm: LlmConfig,

    /// External summary service configuration.
    pub summary: SummaryConfig,

    /// Role id allowed to run administrative commands. None means anyone.
    pub admin_role_id: Option<u64>,

    /// Channel that receives welcome messages for new members. None disables
    /// the welcome generator.
    pub welcome_channel_id: Option<u64>,

    /// Optional error-telemetry endpoint. Validated here, consumed by the
    /// operator's collector, unused by the routing core.
    pub telemetry_endpoint: Option<String>,

    /// How many messages of channel history feed the chat generator.
    pub history_limit: i64,
}

/// Chat-completions backend configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model id, recorded on every bot reply in the message log.
    pub model: String,

    /// OpenAI-compatible API base URL.
    pub api_base: String,

    /// API key for the chat backend.
    pub api_key: String,
}

/// Transcript and web-summary service configuration.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub transcript_url: String,
    pub transcript_token: String,
    pub web_summary_url: String,
    pub web_summary_token: String,
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ConfigError::MissingKey(key.to_string()).into())
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let data_dir = std::env::var("POMELO_DATA_DIR")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| std::path::PathBuf::from("./data"));

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;

        let llm = LlmConfig {
            model: std::env::var("POMELO_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".into()),
            api_base: std::env::var("POMELO_OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: required("OPENAI_API_KEY")?,
        };

        let summary = SummaryConfig {
            transcript_url: required("POMELO_TRANSCRIPT_API_URL")?,
            transcript_token: required("POMELO_TRANSCRIPT_API_TOKEN")?,
            web_summary_url: required("POMELO_WEB_SUMMARY_API_URL")?,
            web_summary_token: required("POMELO_WEB_SUMMARY_API_TOKEN")?,
        };

        let telemetry_endpoint = std::env::var("POMELO_TELEMETRY_ENDPOINT").ok();
        if let Some(endpoint) = &telemetry_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "POMELO_TELEMETRY_ENDPOINT must be an http(s) URL, got: {endpoint}"
                ))
                .into());
            }
        }

        Ok(Self {
            data_dir,
            bot_token: required("POMELO_BOT_TOKEN")?,
            bot_name: std::env::var("POMELO_BOT_NAME").unwrap_or_else(|_| "Pomelo".into()),
            llm,
            summary,
            admin_role_id: parse_optional_u64("POMELO_ADMIN_ROLE_ID")?,
            welcome_channel_id: parse_optional_u64("POMELO_WELCOME_CHANNEL_ID")?,
            telemetry_endpoint,
            history_limit: parse_optional_u64("POMELO_HISTORY_LIMIT")?
                .map(|v| v as i64)
                .unwrap_or(100),
        })
    }

    /// Get the SQLite database path.
    pub fn sqlite_path(&self) -> std::path::PathBuf {
        self.data_dir.join("pomelo.db")
    }
}

fn parse_optional_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => {
            let value = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid(format!("{key} must be an integer, got: {raw}")))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}
