// Mindful Haven server binary.

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;

use mindful_haven::{api::create_api_router, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env()?;
    info!("Connecting to database at {}", config.database.url);

    let app_state = AppState::new(config.clone())
        .await
        .map_err(|e| anyhow::anyhow!("failed to initialize application state: {}", e))?;

    let app = Router::new()
        .nest("/api", create_api_router(app_state))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    let addr = config.server_address();
    info!("Mindful Haven server starting on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
