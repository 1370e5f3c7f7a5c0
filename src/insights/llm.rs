//! Generation-service clients.
//!
//! `GenerationClient` is the seam: the API layer holds a trait object so
//! tests (and alternative backends) can swap the Azure implementation out.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::InsightError;
use crate::config::GenerationConfig;

/// Hosted text-generation service.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Render a completion for a fully-built prompt.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, InsightError>;
}

/// Azure OpenAI chat-completions client.
pub struct AzureGenerationClient {
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
    client: reqwest::Client,
    timeout_secs: u64,
    max_attempts: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl AzureGenerationClient {
    pub fn new(config: &GenerationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
            api_version: config.api_version.clone(),
            client,
            timeout_secs: config.timeout_secs,
            max_attempts: config.max_attempts.max(1),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    async fn attempt(&self, prompt: &str, temperature: f32) -> Result<String, InsightError> {
        let body = ChatCompletionRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    InsightError::Connection(self.endpoint.clone())
                } else if e.is_timeout() {
                    InsightError::Timeout(self.timeout_secs)
                } else {
                    InsightError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InsightError::ResponseDecoding(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(InsightError::EmptyCompletion)
    }
}

#[async_trait]
impl GenerationClient for AzureGenerationClient {
    /// Transient transport failures are retried up to `max_attempts`;
    /// a response from the service (even an error status) is final.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, InsightError> {
        let mut last_error = InsightError::EmptyCompletion;
        for attempt in 1..=self.max_attempts {
            match self.attempt(prompt, temperature).await {
                Ok(text) => return Ok(text),
                Err(
                    err @ (InsightError::Connection(_)
                    | InsightError::Timeout(_)
                    | InsightError::HttpClient(_)),
                ) => {
                    tracing::warn!(attempt, error = %err, "generation attempt failed");
                    last_error = err;
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_error)
    }
}

/// Mock generation client for tests — returns a configured response or
/// a connection failure.
pub struct MockGenerationClient {
    response: String,
    fail: bool,
}

impl MockGenerationClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, InsightError> {
        if self.fail {
            return Err(InsightError::Connection("http://mock".to_string()));
        }
        Ok(self.response.clone())
    }
}
