use async_trait::async_trait;

use crate::domain::value_objects::DocumentMetadata;

#[derive(Debug)]
pub enum MetadataExtractionError {
    ServiceUnavailable(String),
    ExtractionFailed(String),
    ParseError(String),
    Timeout(String),
}

impl std::fmt::Display for MetadataExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataExtractionError::ServiceUnavailable(msg) => {
                write!(f, "Metadata service unavailable: {}", msg)
            }
            MetadataExtractionError::ExtractionFailed(msg) => {
                write!(f, "Metadata extraction failed: {}", msg)
            }
            MetadataExtractionError::ParseError(msg) => {
                write!(f, "Metadata parse error: {}", msg)
            }
            MetadataExtractionError::Timeout(msg) => {
                write!(f, "Metadata extraction timed out: {}", msg)
            }
        }
    }
}

impl std::error::Error for MetadataExtractionError {}

/// Bibliographic metadata extraction from raw PDF bytes (GROBID in
/// production). Upload tolerates failures here; the record is created with
/// whatever fields came back.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract_metadata(
        &self,
        pdf_bytes: &[u8],
        file_name: &str,
    ) -> Result<DocumentMetadata, MetadataExtractionError>;

    async fn health_check(&self) -> bool;
}
