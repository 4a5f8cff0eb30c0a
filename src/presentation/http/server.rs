use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::presentation::http::{
    handlers::{DocumentHandler, HealthHandler, RagHandler},
    routes::{document_routes, health_routes, rag_routes},
};

// Slack over the application-level upload limit so the precise check (and
// its error message) happens in the use case, not the body-limit layer.
const BODY_LIMIT_BYTES: usize = 52 * 1024 * 1024;

/// Build the full application router. Tests drive this directly without
/// binding a socket.
pub fn app_router(
    document_handler: Arc<DocumentHandler>,
    rag_handler: Arc<RagHandler>,
    health_handler: Arc<HealthHandler>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health_routes(health_handler))
        .merge(document_routes(document_handler))
        .merge(rag_routes(rag_handler))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .on_request(
                    |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                        tracing::info!("Received request: {} {}", request.method(), request.uri());
                    },
                )
                .on_response(
                    |response: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            "Response: {} (took {} ms)",
                            response.status(),
                            latency.as_millis()
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            "Request failed: {:?} (took {} ms)",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
}

pub struct HttpServer {
    document_handler: Arc<DocumentHandler>,
    rag_handler: Arc<RagHandler>,
    health_handler: Arc<HealthHandler>,
    port: u16,
}

impl HttpServer {
    pub fn new(
        document_handler: Arc<DocumentHandler>,
        rag_handler: Arc<RagHandler>,
        health_handler: Arc<HealthHandler>,
        port: u16,
    ) -> Self {
        Self {
            document_handler,
            rag_handler,
            health_handler,
            port,
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = app_router(self.document_handler, self.rag_handler, self.health_handler);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
