mod compose;
mod config;
mod db;
mod errors;
mod export;
mod models;
mod render;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::export::HttpPdfCapture;
use crate::routes::build_router;
use crate::state::AppState;
use crate::templates::{CatalogStore, PgTemplateStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url)?;

    // Template catalog: built-ins, then TEMPLATES_DIR overrides, then the database
    let mut catalog = CatalogStore::builtin()?;
    if let Some(dir) = &config.templates_dir {
        let loaded = catalog
            .load_dir(dir)
            .with_context(|| format!("failed to load templates from {}", dir.display()))?;
        info!("Loaded {loaded} template(s) from {}", dir.display());
    }
    let templates = Arc::new(PgTemplateStore::new(db.clone(), catalog));

    // Initialize PDF capture client
    let pdf = Arc::new(HttpPdfCapture::new(
        config.pdf_capture_url.clone(),
        Duration::from_secs(config.pdf_capture_timeout_secs),
    )?);
    info!("PDF capture endpoint: {}", config.pdf_capture_url);

    // Build app state
    let state = AppState {
        db,
        templates,
        pdf,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the editor origin once it is configurable

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
