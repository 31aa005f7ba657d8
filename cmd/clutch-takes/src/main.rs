//! # Clutch Takes Binary
//!
//! The entry point that assembles the application: settings, the SQLite
//! take store, the Gemini moderation classifier, the lifecycle service,
//! and the axum presentation adapter.

use std::sync::Arc;

use api_adapters::AppState;
use domains::{ModerationClassifier, TakeStore};
use moderation_adapters::GeminiClassifier;
use services::TakeLifecycleService;
use storage_adapters::SqliteTakeStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = configs::Settings::load()?;

    let store: Arc<dyn TakeStore> = Arc::new(SqliteTakeStore::new(&settings.database.url).await?);

    let classifier: Arc<dyn ModerationClassifier> = Arc::new(GeminiClassifier::new(
        settings.moderation.model.clone(),
        settings.moderation.api_key,
    ));

    let lifecycle = Arc::new(TakeLifecycleService::new(
        classifier,
        store.clone(),
        settings.moderation.enabled,
    ));

    let app = api_adapters::router(Arc::new(AppState { lifecycle, store }));

    let addr = settings.server.bind_addr();
    tracing::info!(%addr, moderation = settings.moderation.enabled, "clutch-takes starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
