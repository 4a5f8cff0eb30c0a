pub mod chroma_client;
pub mod embeddings_client;
pub mod grobid_client;
pub mod openrouter_client;
pub mod pdf_extractor;

pub use chroma_client::ChromaVectorIndex;
pub use embeddings_client::HttpEmbeddingsClient;
pub use grobid_client::GrobidClient;
pub use openrouter_client::OpenRouterClient;
pub use pdf_extractor::PdfTextExtractor;
