//! Gourmet bot - restaurant search over a messaging webhook
//!
//! Walks each user through sharing a location, picking a genre and entering
//! a budget, then replies with nearby stores from the gourmet catalog.

mod api;
mod budget;
mod catalog;
mod config;
mod db;
mod line;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use catalog::{Catalog, HotPepperCatalog, LoggingCatalog};
use config::Config;
use db::Database;
use line::LineClient;
use runtime::{DatabaseStorage, StateStore};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gourmet_bot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env()?;

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&config.db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path, "Opening database");
    let db = Database::open(&config.db_path)?;
    tracing::info!(users = db.count_states()?, "Database ready");
    let store: Arc<dyn StateStore> = Arc::new(DatabaseStorage::new(db));

    let hotpepper = HotPepperCatalog::new(
        config.gourmet_api_key.clone(),
        &config.gourmet_api_base_url,
        config.http_timeout,
    )?;
    let catalog: Arc<dyn Catalog> = Arc::new(LoggingCatalog::new(Arc::new(hotpepper)));

    let replier = Arc::new(LineClient::new(
        config.channel_access_token.clone(),
        &config.line_api_base_url,
        config.http_timeout,
    )?);

    let state = AppState::new(store, catalog, replier, &config.channel_secret);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Gourmet bot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
