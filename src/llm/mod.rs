//! Generative-backend integration.
//!
//! The backend is an opaque request/response service: ordered role/text
//! contents in, free text out. [`GenerativeBackend`] is the seam the
//! assistant client and code runner call through; [`GeminiClient`] is the
//! production HTTP implementation, and tests substitute stubs.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::content::chat::Role;
use crate::error::BackendError;

/// One turn of backend input.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// A request to the generative backend.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Ordered conversation turns.
    pub turns: Vec<Turn>,
    /// Instruction preamble applied outside the conversation.
    pub system_instruction: Option<String>,
    /// Thinking-budget hint forwarded as a generation option.
    pub thinking_budget: Option<i32>,
}

impl GenerateRequest {
    /// A one-shot request: a single user turn, no history, no preamble.
    pub fn one_shot(prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::new(Role::User, prompt)],
            system_instruction: None,
            thinking_budget: None,
        }
    }
}

/// The seam over the hosted generative API.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Send a request and return the reply text.
    async fn generate(&self, request: GenerateRequest) -> Result<String, BackendError>;
}
