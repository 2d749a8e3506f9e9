/**
 * Stagelink Server Entry Point
 *
 * Initializes logging, reads configuration from the environment, opens
 * the document store, and serves the coordination API.
 */

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    // Initialize tracing with DEBUG level by default
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = stagelink::backend::server::ServerConfig::from_env();
    let addr = config.bind_addr;

    let app = stagelink::backend::server::create_app(config).await?;

    tracing::info!("Starting Stagelink server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
