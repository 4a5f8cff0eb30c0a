use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::RagHandler;

pub fn rag_routes(rag_handler: Arc<RagHandler>) -> Router {
    Router::new()
        .route(
            "/documents/{document_id}/summarize",
            post(RagHandler::summarize_document),
        )
        .route(
            "/documents/{document_id}/questions",
            post(RagHandler::generate_questions),
        )
        .route("/chat", post(RagHandler::chat))
        .with_state(rag_handler)
}
