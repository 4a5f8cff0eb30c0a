pub mod postgres_document_repository;

pub use postgres_document_repository::PostgresDocumentRepository;
