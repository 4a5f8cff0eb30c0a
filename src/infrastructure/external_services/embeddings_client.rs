use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

#[derive(Serialize)]
pub struct EmbeddingsRequest {
    pub text: TextInput,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
pub struct EmbeddingsResponse {
    pub success: bool,
    pub embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub model_name: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl Default for EmbeddingsClientConfig {
    fn default() -> Self {
        let service_url = env::var("EMBEDDINGS_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8081/embeddings".to_string());
        let model_name =
            env::var("EMBEDDINGS_MODEL").unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string());

        Self {
            service_url,
            model_name,
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
        }
    }
}

/// SentenceTransformers model behind an HTTP endpoint. Requests are
/// idempotent, so transient failures are retried with exponential backoff;
/// timeouts are reported as such so callers can map them to a 504.
pub struct HttpEmbeddingsClient {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl HttpEmbeddingsClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(EmbeddingsClientConfig::default())
    }

    async fn send_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingProviderError> {
        let mut attempts = 0;
        loop {
            attempts += 1;

            match self.execute_request(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempts > self.config.max_retries {
                        return Err(e);
                    }

                    let backoff_time = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    tokio::time::sleep(backoff_time).await;
                }
            }
        }
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingProviderError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingProviderError::Timeout(e.without_url().to_string())
                } else {
                    EmbeddingProviderError::NetworkError(e.without_url().to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Embedding service returned status {}",
                response.status()
            )));
        }

        let body = response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingProviderError::ApiError(e.without_url().to_string()))?;

        if !body.success {
            return Err(EmbeddingProviderError::ApiError(
                "Embedding service reported failure".to_string(),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingsClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "No texts to embed".to_string(),
            ));
        }

        let request = EmbeddingsRequest {
            text: TextInput::Multiple(texts.to_vec()),
        };

        let response = self.send_request(&request).await?;

        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(response.embeddings)
    }

    async fn health_check(&self) -> bool {
        let request = EmbeddingsRequest {
            text: TextInput::Single("health check".to_string()),
        };

        self.execute_request(&request).await.is_ok()
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}
