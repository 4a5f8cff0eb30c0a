use serde::{Deserialize, Serialize};

/// Lifecycle of an uploaded document. Only `Ready` documents are eligible
/// for summarization, question generation, and scoped chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Uploaded,
    Indexing,
    Ready,
    Failed(String),
}

impl DocumentStatus {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, DocumentStatus::Uploaded)
    }

    pub fn is_indexing(&self) -> bool {
        matches!(self, DocumentStatus::Indexing)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DocumentStatus::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DocumentStatus::Failed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Ready | DocumentStatus::Failed(_))
    }

    /// Forward-only transitions, with the single retry edge `Failed -> Indexing`.
    /// A `Ready` document never moves backward.
    pub fn can_transition_to(&self, new_status: &DocumentStatus) -> bool {
        match (self, new_status) {
            (DocumentStatus::Uploaded, DocumentStatus::Indexing) => true,
            (DocumentStatus::Indexing, DocumentStatus::Ready) => true,
            (DocumentStatus::Indexing, DocumentStatus::Failed(_)) => true,
            (DocumentStatus::Failed(_), DocumentStatus::Indexing) => true,
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            DocumentStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Uploaded => "uploaded",
            DocumentStatus::Indexing => "indexing",
            DocumentStatus::Ready => "ready",
            // The reason is stored separately in the error_message column.
            DocumentStatus::Failed(_) => "failed",
        }
    }

    pub fn from_parts(status: &str, error_message: Option<&str>) -> Result<Self, String> {
        match status.to_lowercase().as_str() {
            "uploaded" => Ok(DocumentStatus::Uploaded),
            "indexing" => Ok(DocumentStatus::Indexing),
            "ready" => Ok(DocumentStatus::Ready),
            "failed" => Ok(DocumentStatus::Failed(
                error_message.unwrap_or("unknown error").to_string(),
            )),
            other => Err(format!("Invalid document status: {}", other)),
        }
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Uploaded
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        assert!(DocumentStatus::Uploaded.is_uploaded());
        assert!(DocumentStatus::Indexing.is_indexing());
        assert!(DocumentStatus::Ready.is_ready());
        assert!(DocumentStatus::Failed("boom".to_string()).is_failed());

        assert!(!DocumentStatus::Uploaded.is_terminal());
        assert!(!DocumentStatus::Indexing.is_terminal());
        assert!(DocumentStatus::Ready.is_terminal());
        assert!(DocumentStatus::Failed("boom".to_string()).is_terminal());
    }

    #[test]
    fn test_valid_transitions() {
        let failed = DocumentStatus::Failed("embedding service down".to_string());

        assert!(DocumentStatus::Uploaded.can_transition_to(&DocumentStatus::Indexing));
        assert!(DocumentStatus::Indexing.can_transition_to(&DocumentStatus::Ready));
        assert!(DocumentStatus::Indexing.can_transition_to(&failed));
        assert!(failed.can_transition_to(&DocumentStatus::Indexing));
    }

    #[test]
    fn test_ready_never_moves_backward() {
        assert!(!DocumentStatus::Ready.can_transition_to(&DocumentStatus::Uploaded));
        assert!(!DocumentStatus::Ready.can_transition_to(&DocumentStatus::Indexing));
        assert!(!DocumentStatus::Ready.can_transition_to(&DocumentStatus::Failed("x".to_string())));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!DocumentStatus::Uploaded.can_transition_to(&DocumentStatus::Ready));
        assert!(
            !DocumentStatus::Uploaded.can_transition_to(&DocumentStatus::Failed("x".to_string()))
        );
        assert!(!DocumentStatus::Failed("x".to_string()).can_transition_to(&DocumentStatus::Ready));
    }

    #[test]
    fn test_string_round_trip() {
        let statuses = vec![
            DocumentStatus::Uploaded,
            DocumentStatus::Indexing,
            DocumentStatus::Ready,
            DocumentStatus::Failed("no text extracted".to_string()),
        ];

        for status in statuses {
            let parsed =
                DocumentStatus::from_parts(status.as_str(), status.error_message()).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_invalid_string_parsing() {
        assert!(DocumentStatus::from_parts("archived", None).is_err());
    }
}
