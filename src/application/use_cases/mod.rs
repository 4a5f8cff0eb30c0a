pub mod chat_with_documents;
pub mod check_health;
pub mod delete_document;
pub mod generate_questions;
pub mod get_document;
pub mod list_documents;
pub mod summarize_document;
pub mod upload_document;

pub use chat_with_documents::ChatWithDocumentsUseCase;
pub use check_health::CheckHealthUseCase;
pub use delete_document::DeleteDocumentUseCase;
pub use generate_questions::GenerateQuestionsUseCase;
pub use get_document::GetDocumentUseCase;
pub use list_documents::ListDocumentsUseCase;
pub use summarize_document::SummarizeDocumentUseCase;
pub use upload_document::UploadDocumentUseCase;
