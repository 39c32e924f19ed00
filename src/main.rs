//! Insight Arena - Application Entry Point
//!
//! This is the main entry point for the Insight Arena server.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use insight_arena::{config::CONFIG, create_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Insight Arena server...");

    // Create application state
    let state = AppState::new(CONFIG.clone());

    // Make sure both tables and upload directories exist
    tracing::info!(
        data_dir = %CONFIG.storage.data_dir.display(),
        "Initializing record store..."
    );
    state.initialize().await?;

    if CONFIG.instructor.access_key.is_none() {
        tracing::warn!("INSTRUCTOR_KEY is not set; instructor key login is disabled");
    }

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
