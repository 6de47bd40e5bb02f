//! Top-level error types for Pomelo.

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error enum wrapping domain-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required config key: {0}")]
    MissingKey(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence failures. A failed message append or karma write is never
/// swallowed: it breaks the audit/ledger invariant, so callers surface it
/// as fatal for the event (but not for the process).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to SQLite: {0}")]
    Connect(sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// External generator failures. A reply is suppressed on these, but state
/// mutations computed before the call still commit.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generator request failed: {0}")]
    RequestFailed(String),

    #[error("generator returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("no transcript available for video {video_id}")]
    MissingTranscript { video_id: String },

    #[error("wrong context for {kind} generator")]
    WrongContext { kind: &'static str },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Bad administrative input, surfaced to the invoking user. No state change.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid verbosity level '{0}', expected 1 (karma only), 2 (mentions only), or 3 (unrestricted)")]
    InvalidVerbosity(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
}
