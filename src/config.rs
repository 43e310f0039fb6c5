//! Environment-based configuration.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default backend model when `OMNISCIENCE_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default thinking-budget hint passed to the backend.
pub const DEFAULT_THINKING_BUDGET: i32 = 0;

/// Runtime configuration, read once at startup.
///
/// Everything comes from the environment; there is no config file and no CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential for the generative backend.
    pub api_key: SecretString,
    /// Backend model identifier.
    pub model: String,
    /// Backend base URL (override for tests/proxies).
    pub base_url: String,
    /// Port for the HTTP/WebSocket API.
    pub port: u16,
    /// Thinking-budget hint forwarded with every chat request.
    pub thinking_budget: i32,
    /// Optional directory for file-based log output.
    pub log_dir: Option<String>,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `OMNISCIENCE_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OMNISCIENCE_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OMNISCIENCE_API_KEY".to_string()))?;

        let model =
            std::env::var("OMNISCIENCE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url = std::env::var("OMNISCIENCE_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());

        let port = parse_env("OMNISCIENCE_PORT", 8080u16)?;
        let thinking_budget = parse_env("OMNISCIENCE_THINKING_BUDGET", DEFAULT_THINKING_BUDGET)?;

        let log_dir = std::env::var("OMNISCIENCE_LOG_DIR").ok();

        Ok(Self {
            api_key: SecretString::from(api_key),
            model,
            base_url,
            port,
            thinking_budget,
            log_dir,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
