use docmind::config::ServerConfig;
use docmind::infrastructure::AppContainer;
use docmind::logging::init_tracing;
use docmind::presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();

    let mut container = AppContainer::new().await?;
    container.start_indexing_worker();

    let server = HttpServer::new(
        container.document_handler.clone(),
        container.rag_handler.clone(),
        container.health_handler.clone(),
        server_config.port,
    );

    server.run().await
}
