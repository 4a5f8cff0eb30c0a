use serde::{Deserialize, Serialize};

/// Bibliographic fields produced by metadata extraction. Every field is
/// optional: an upload still succeeds when the extraction service fails,
/// leaving the record partially empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub abstract_text: Option<String>,
    pub publication_date: Option<String>,
    pub page_count: Option<i32>,
    pub reference_count: Option<i32>,
    pub appears_academic: bool,
}

impl DocumentMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = normalize(title);
        self
    }

    pub fn with_authors(mut self, authors: Option<String>) -> Self {
        self.authors = normalize(authors);
        self
    }

    pub fn with_abstract(mut self, abstract_text: Option<String>) -> Self {
        self.abstract_text = normalize(abstract_text);
        self
    }

    pub fn with_publication_date(mut self, publication_date: Option<String>) -> Self {
        self.publication_date = normalize(publication_date);
        self
    }

    pub fn with_page_count(mut self, page_count: Option<i32>) -> Self {
        self.page_count = page_count;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_none()
            && self.abstract_text.is_none()
            && self.publication_date.is_none()
            && self.page_count.is_none()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metadata() {
        let metadata = DocumentMetadata::new();
        assert!(metadata.is_empty());
        assert!(!metadata.appears_academic);
    }

    #[test]
    fn test_builder_normalizes_blank_strings() {
        let metadata = DocumentMetadata::new()
            .with_title(Some("  Attention Is All You Need  ".to_string()))
            .with_authors(Some("   ".to_string()));

        assert_eq!(metadata.title.as_deref(), Some("Attention Is All You Need"));
        assert_eq!(metadata.authors, None);
        assert!(!metadata.is_empty());
    }
}
