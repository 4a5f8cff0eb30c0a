use async_trait::async_trait;
use lopdf::Document;
use tracing::debug;

use crate::application::ports::text_extractor::{PageText, TextExtractionError, TextExtractor};

/// Text extraction directly from PDF bytes. Pages that fail individually are
/// skipped; the whole document only fails when nothing at all comes out.
pub struct PdfTextExtractor {
    password: String,
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self {
            password: String::new(),
        }
    }

    fn load(&self, pdf_bytes: &[u8]) -> Result<Document, TextExtractionError> {
        let mut doc = Document::load_mem(pdf_bytes)
            .map_err(|e| TextExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(&self.password).map_err(|_| {
                TextExtractionError::CorruptedFile("PDF is password-protected".to_string())
            })?;
        }

        Ok(doc)
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, TextExtractionError> {
        let doc = self.load(pdf_bytes)?;
        Ok(doc.get_pages().len())
    }

    async fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageText>, TextExtractionError> {
        let doc = self.load(pdf_bytes)?;

        let mut pages = Vec::new();
        for (page_num, _) in doc.get_pages() {
            match doc.extract_text(&[page_num]) {
                Ok(text) => {
                    let cleaned: String = text
                        .split('\n')
                        .map(|line| line.trim_end())
                        .filter(|line| !line.is_empty())
                        .collect::<Vec<_>>()
                        .join("\n");
                    pages.push(PageText {
                        page_number: page_num as i32,
                        text: cleaned,
                    });
                }
                Err(e) => {
                    debug!(page = page_num, error = %e, "Page text extraction failed");
                }
            }
        }

        if pages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(TextExtractionError::NoTextContent);
        }

        Ok(pages)
    }
}
