use std::sync::Arc;

use anyhow::Context;
use api::{CredentialStore, NoteStore, Settings};
use store::UploadDir;
use tokio::net::TcpListener;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::EnvFilter;

mod extract;
mod handlers;
mod routes;
mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    let pool = api::db::connect(&settings.database.url)
        .await
        .context("Failed to connect to database")?;
    api::db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("Failed to create session table")?;

    let repo = Arc::new(api::db::PgStore::new(pool));
    let credentials = CredentialStore::new(repo.clone());
    let notes = NoteStore::new(repo);

    let uploads = UploadDir::new(&settings.uploads.dir);
    uploads
        .ensure_exists()
        .await
        .with_context(|| format!("Failed to create upload directory {}", settings.uploads.dir))?;
    if settings.uploads.sweep_orphans {
        match api::notes::sweep_orphans(&uploads, &notes).await {
            Ok(0) => {}
            Ok(removed) => tracing::info!("Removed {} orphaned uploads", removed),
            Err(e) => tracing::warn!("Orphan sweep failed: {}", e),
        }
    }

    let state = routes::AppState {
        credentials,
        notes,
        uploads,
        download_policy: settings.downloads.policy,
    };
    let app = routes::router(state, settings.uploads.max_bytes)
        .layer(routes::session_layer(session_store, &settings.session));

    let listener = TcpListener::bind(&settings.server.address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.address))?;
    tracing::info!("Server running at http://{}", settings.server.address);
    axum::serve(listener, app).await?;

    Ok(())
}
