//! Error types for OmniScience.

use uuid::Uuid;

/// Top-level error type for the session engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Generative-backend errors.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from backend: {reason}")]
    InvalidResponse { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::RequestFailed {
            reason: err.to_string(),
        }
    }
}

/// Workspace store and content codec errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("File not found: {0}")]
    FileNotFound(Uuid),

    #[error("File {id} is a {actual} file, expected {expected}")]
    KindMismatch {
        id: Uuid,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Malformed {kind} content: {reason}")]
    MalformedContent { kind: &'static str, reason: String },
}

/// Typed rejections from the assistant and runner paths.
///
/// These are no-ops by design: nothing has been mutated when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("No active chat file")]
    NoActiveChat,

    #[error("Empty input")]
    EmptyInput,

    #[error("A backend request is already in flight")]
    Busy,

    #[error("No code file to run")]
    NoCodeFile,
}

/// Result type alias for the session engine.
pub type Result<T> = std::result::Result<T, Error>;
