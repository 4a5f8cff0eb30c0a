use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::application::ports::vector_index::{
    EmbeddedChunk, ScoredChunk, StoredChunk, VectorIndex, VectorIndexError,
};

#[derive(Debug, Clone)]
pub struct ChromaClientConfig {
    pub base_url: String,
    pub collection_name: String,
    pub timeout_secs: u64,
}

impl Default for ChromaClientConfig {
    fn default() -> Self {
        let base_url =
            env::var("CHROMA_URL").unwrap_or_else(|_| "http://localhost:8001".to_string());
        let collection_name =
            env::var("CHROMA_COLLECTION").unwrap_or_else(|_| "documents".to_string());

        Self {
            base_url,
            collection_name,
            timeout_secs: 30,
        }
    }
}

/// Per-chunk metadata stored alongside each embedding. The document id is a
/// string because the store only filters on string-typed metadata reliably.
#[derive(Debug, Serialize, Deserialize)]
struct ChunkMetadata {
    document_id: String,
    chunk_index: i32,
    page_number: i32,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    documents: Vec<Vec<String>>,
    metadatas: Vec<Vec<ChunkMetadata>>,
    distances: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct GetResponse {
    documents: Vec<String>,
    metadatas: Vec<ChunkMetadata>,
}

/// Chroma over its HTTP API. The collection is created on first use and its
/// id cached for the life of the client. Entry ids are
/// `{document_id}_{chunk_index}`, so re-indexing a document overwrites its
/// previous entries instead of duplicating them.
pub struct ChromaVectorIndex {
    client: Client,
    config: ChromaClientConfig,
    collection_id: OnceCell<String>,
}

impl ChromaVectorIndex {
    pub fn new(config: ChromaClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            collection_id: OnceCell::new(),
        })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(ChromaClientConfig::default())
    }

    async fn collection_id(&self) -> Result<&str, VectorIndexError> {
        self.collection_id
            .get_or_try_init(|| async {
                let url = format!("{}/api/v1/collections", self.config.base_url);
                let response = self
                    .client
                    .post(&url)
                    .json(&json!({
                        "name": self.config.collection_name,
                        "get_or_create": true,
                    }))
                    .send()
                    .await
                    .map_err(request_error)?;

                if !response.status().is_success() {
                    return Err(VectorIndexError::ApiError(format!(
                        "Collection lookup returned status {}",
                        response.status()
                    )));
                }

                let collection = response
                    .json::<CollectionResponse>()
                    .await
                    .map_err(|e| VectorIndexError::ParseError(e.without_url().to_string()))?;

                Ok(collection.id)
            })
            .await
            .map(String::as_str)
    }

    async fn post_to_collection(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, VectorIndexError> {
        let collection_id = self.collection_id().await?;
        let url = format!(
            "{}/api/v1/collections/{}/{}",
            self.config.base_url, collection_id, action
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(VectorIndexError::ApiError(format!(
                "Vector store {} returned status {}",
                action,
                response.status()
            )));
        }

        Ok(response)
    }
}

fn request_error(e: reqwest::Error) -> VectorIndexError {
    if e.is_timeout() {
        VectorIndexError::Timeout(e.without_url().to_string())
    } else if e.is_connect() {
        VectorIndexError::ConnectionError(e.without_url().to_string())
    } else {
        VectorIndexError::ApiError(e.without_url().to_string())
    }
}

fn document_filter(document_id: i32) -> serde_json::Value {
    json!({ "document_id": document_id.to_string() })
}

#[async_trait]
impl VectorIndex for ChromaVectorIndex {
    async fn index_chunks(
        &self,
        document_id: i32,
        chunks: &[EmbeddedChunk],
    ) -> Result<(), VectorIndexError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = chunks
            .iter()
            .map(|c| format!("{}_{}", document_id, c.chunk_index))
            .collect();
        let embeddings: Vec<&[f32]> = chunks.iter().map(|c| c.embedding.as_slice()).collect();
        let documents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let metadatas: Vec<ChunkMetadata> = chunks
            .iter()
            .map(|c| ChunkMetadata {
                document_id: document_id.to_string(),
                chunk_index: c.chunk_index,
                page_number: c.page_number,
            })
            .collect();

        self.post_to_collection(
            "add",
            json!({
                "ids": ids,
                "embeddings": embeddings,
                "documents": documents,
                "metadatas": metadatas,
            }),
        )
        .await?;

        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        k: usize,
        document_id: Option<i32>,
    ) -> Result<Vec<ScoredChunk>, VectorIndexError> {
        let mut body = json!({
            "query_embeddings": [query_embedding],
            "n_results": k,
            "include": ["documents", "metadatas", "distances"],
        });
        if let Some(id) = document_id {
            body["where"] = document_filter(id);
        }

        let response = self.post_to_collection("query", body).await?;
        let parsed = response
            .json::<QueryResponse>()
            .await
            .map_err(|e| VectorIndexError::ParseError(e.without_url().to_string()))?;

        let documents = parsed.documents.into_iter().next().unwrap_or_default();
        let metadatas = parsed.metadatas.into_iter().next().unwrap_or_default();
        let distances = parsed.distances.into_iter().next().unwrap_or_default();

        let mut chunks = Vec::with_capacity(documents.len());
        for ((content, metadata), distance) in documents.into_iter().zip(metadatas).zip(distances) {
            let chunk_document_id = metadata
                .document_id
                .parse::<i32>()
                .map_err(|e| VectorIndexError::ParseError(e.to_string()))?;
            chunks.push(ScoredChunk {
                document_id: chunk_document_id,
                chunk_index: metadata.chunk_index,
                page_number: metadata.page_number,
                content,
                distance,
            });
        }

        Ok(chunks)
    }

    async fn fetch_document_chunks(
        &self,
        document_id: i32,
        limit: usize,
    ) -> Result<Vec<StoredChunk>, VectorIndexError> {
        let response = self
            .post_to_collection(
                "get",
                json!({
                    "where": document_filter(document_id),
                    "limit": limit,
                    "include": ["documents", "metadatas"],
                }),
            )
            .await?;

        let parsed = response
            .json::<GetResponse>()
            .await
            .map_err(|e| VectorIndexError::ParseError(e.without_url().to_string()))?;

        let chunks = parsed
            .documents
            .into_iter()
            .zip(parsed.metadatas)
            .map(|(content, metadata)| StoredChunk {
                document_id,
                chunk_index: metadata.chunk_index,
                page_number: metadata.page_number,
                content,
            })
            .collect();

        Ok(chunks)
    }

    async fn delete_document(&self, document_id: i32) -> Result<(), VectorIndexError> {
        self.post_to_collection("delete", json!({ "where": document_filter(document_id) }))
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/v1/heartbeat", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
