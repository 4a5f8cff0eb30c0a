use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::time::Duration;

use crate::application::ports::completion_provider::{
    Completion, CompletionError, CompletionProvider,
};
use crate::config::RagConfig;

#[derive(Debug, Clone)]
pub struct OpenRouterClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub referer: String,
    pub app_title: String,
}

impl OpenRouterClientConfig {
    pub fn from_env(rag_config: &RagConfig) -> Self {
        let api_key = env::var("OPENROUTER_API_KEY").unwrap_or_default();
        let base_url = env::var("OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());

        Self {
            api_key,
            base_url,
            model: rag_config.primary_model.clone(),
            temperature: rag_config.temperature,
            max_tokens: rag_config.max_tokens,
            timeout_secs: 60,
            referer: env::var("APP_REFERER")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            app_title: "DocMind".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// Chat completions through OpenRouter. One request per call, no retries:
/// generation is not idempotent and the caller surfaces failures directly.
pub struct OpenRouterClient {
    client: Client,
    config: OpenRouterClientConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, CompletionError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [ChatMessage { role: "user", content: prompt }],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(e.without_url().to_string())
                } else {
                    CompletionError::NetworkError(e.without_url().to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(CompletionError::ApiError(format!(
                "Completion API returned status {}",
                response.status()
            )));
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| CompletionError::ApiError(e.without_url().to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        Ok(Completion {
            content,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
            total_tokens: parsed.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/models", self.config.base_url);
        match self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
