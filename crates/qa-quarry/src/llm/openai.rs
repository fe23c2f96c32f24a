//! Client for OpenAI-compatible chat completion APIs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::ChatModel;

/// Talks to any endpoint implementing the OpenAI chat completions
/// protocol, with exponential backoff between attempts
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::llm(format!("failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "chat client ready: model {} at {}",
            config.model,
            config.base_url
        );

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    /// Run `operation` up to `max_retries` times, doubling the delay
    /// after each failed attempt. The last error is returned when all
    /// attempts fail.
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 1..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::warn!(
                        "attempt {}/{} failed: {}",
                        attempt,
                        self.config.max_retries,
                        e
                    );
                    last_error = Some(e);

                    if attempt < self.config.max_retries {
                        let delay = self.config.retry_delay_secs * 2u64.pow(attempt - 1);
                        sleep(Duration::from_secs(delay)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::llm("request failed with no attempts made")))
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let system_prompt = system_prompt.to_string();
        let user_prompt = user_prompt.to_string();

        self.retry_request(|| {
            let url = url.clone();
            let system_prompt = system_prompt.clone();
            let user_prompt = user_prompt.clone();

            async move {
                let request = ChatRequest {
                    model: self.config.model.clone(),
                    messages: vec![
                        ChatMessage {
                            role: "system".to_string(),
                            content: system_prompt,
                        },
                        ChatMessage {
                            role: "user".to_string(),
                            content: user_prompt,
                        },
                    ],
                    temperature: self.config.temperature,
                    max_tokens: self.config.max_tokens,
                };

                let response = self
                    .client
                    .post(&url)
                    .bearer_auth(&self.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::llm(format!("chat request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::llm(format!(
                        "chat completion returned status {}: {}",
                        status, body
                    )));
                }

                let chat: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::llm(format!("failed to parse chat response: {}", e)))?;

                let choice = chat
                    .choices
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::llm("chat response contained no choices"))?;

                Ok(choice.message.content)
            }
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::llm(format!("health check failed: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn test_config() -> LlmConfig {
        LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = OpenAiClient::new(&LlmConfig::default()).err();
        assert!(matches!(err, Some(Error::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhausts_all_attempts() {
        let client = OpenAiClient::new(&test_config()).unwrap();
        let calls = AtomicU32::new(0);

        let result: Result<()> = client
            .retry_request(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::llm("backend down")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_surfaces_as_llm_error() {
        let config = LlmConfig {
            base_url: "not a url".to_string(),
            ..test_config()
        };
        let client = OpenAiClient::new(&config).unwrap();

        let err = client.complete("system", "user").await.err();
        assert!(matches!(err, Some(Error::Llm(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_stops_after_first_success() {
        let client = OpenAiClient::new(&test_config()).unwrap();
        let calls = AtomicU32::new(0);

        let result: Result<u32> = client
            .retry_request(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(Error::llm("transient"))
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
