//! Chat model backends

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::error::Result;

/// A chat-completion backend.
///
/// Implementations take care of transport, authentication and retries;
/// callers just hand over the two messages and get the raw completion
/// text back.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion with a system and a user message
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Check whether the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Model identifier, for logging
    fn model(&self) -> &str;

    /// Backend name, for logging
    fn name(&self) -> &str;
}
