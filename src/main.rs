use tokio::net::TcpListener;
use url_summarizer::{
    api::routes::create_router, config::Config, telemetry::init_tracing_subscriber, AppState,
    DefaultPipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;
    init_tracing_subscriber(config.log_json)?;

    let server_addr = config.server_addr;
    tracing::info!(%server_addr, "Starting server");

    let pipeline = DefaultPipeline::from_config(&config)?;
    let app_state = AppState::new(pipeline, config.request_timeout);

    // Build the router with routes
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!(%server_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
