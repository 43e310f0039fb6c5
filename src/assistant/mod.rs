//! The AI assistant: prompt assembly, reply parsing, and the send flow.

pub mod client;
pub mod directive;
pub mod dispatch;
pub mod prompt;

pub use client::{AssistantClient, SendOutcome};
pub use directive::{Directive, DirectiveAction};
