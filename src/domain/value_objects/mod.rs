pub mod document_metadata;
pub mod document_status;

pub use document_metadata::DocumentMetadata;
pub use document_status::DocumentStatus;
