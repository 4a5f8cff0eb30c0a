use async_trait::async_trait;

#[derive(Debug)]
pub enum TextExtractionError {
    CorruptedFile(String),
    NoTextContent,
}

impl std::fmt::Display for TextExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextExtractionError::CorruptedFile(msg) => write!(f, "Corrupted PDF: {}", msg),
            TextExtractionError::NoTextContent => {
                write!(f, "No text content extracted from PDF")
            }
        }
    }
}

impl std::error::Error for TextExtractionError {}

/// Text of a single page; page numbers are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    pub page_number: i32,
    pub text: String,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Number of pages, without extracting text. Used at upload time; the
    /// caller tolerates failure (page count stays unknown).
    async fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, TextExtractionError>;

    /// Per-page text in page order. Fails with `NoTextContent` when the
    /// whole document yields nothing (scanned PDFs without an OCR layer).
    async fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageText>, TextExtractionError>;
}
