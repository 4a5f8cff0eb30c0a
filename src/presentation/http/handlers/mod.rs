pub mod document_handler;
pub mod health_handler;
pub mod rag_handler;

pub use document_handler::DocumentHandler;
pub use health_handler::HealthHandler;
pub use rag_handler::RagHandler;
