use serde::{Deserialize, Serialize};

/// A contiguous slice of a document's extracted text: the unit of indexing
/// and retrieval. Chunks are derived during indexing and live only in the
/// vector index, never in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    document_id: i32,
    chunk_index: i32,
    page_number: i32,
    content: String,
}

impl DocumentChunk {
    pub fn new(document_id: i32, chunk_index: i32, page_number: i32, content: String) -> Self {
        Self {
            document_id,
            chunk_index,
            page_number,
            content,
        }
    }

    pub fn document_id(&self) -> i32 {
        self.document_id
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn page_number(&self) -> i32 {
        self.page_number
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Preview used in chat `sources`: first 150 characters with an ellipsis.
    pub fn content_preview(&self) -> String {
        let mut preview: String = self.content.chars().take(150).collect();
        if self.content.chars().count() > 150 {
            preview.push_str("...");
        }
        preview
    }
}
