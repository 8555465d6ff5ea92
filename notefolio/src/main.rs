// Notefolio - offline-first notes core
// Entry point: opens the store and reports what it holds

use anyhow::Context;
use notefolio::config::{DEFAULT_LOG_FILTER, RECENT_NOTES_LIMIT};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Data directory: first argument, or the platform's local data dir
fn data_dir() -> anyhow::Result<PathBuf> {
    if let Some(dir) = std::env::args().nth(1) {
        return Ok(PathBuf::from(dir));
    }

    let dirs = directories::ProjectDirs::from("app", "Notefolio", "Notefolio")
        .context("could not determine app data directory")?;
    Ok(dirs.data_local_dir().to_path_buf())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Notefolio");

    let dir = data_dir()?;
    let app = notefolio::app::setup(&dir)
        .await
        .with_context(|| format!("failed to open store in {}", dir.display()))?;

    for folder in app.folders_service.list_system_folders().await? {
        let count = if folder.is_favorites() {
            app.notes_service.list_favorite_notes().await?.len() as i64
        } else {
            app.notes_service.count_notes_in_folder(&folder.name).await?
        };
        tracing::info!("{}: {} notes", folder.name, count);
    }

    for folder in app.folders_service.list_folders().await? {
        let count = app.notes_service.count_notes_in_folder(&folder.name).await?;
        tracing::info!("{}: {} notes", folder.name, count);
    }

    for recent in app.recents_service.list_recents(RECENT_NOTES_LIMIT).await? {
        tracing::info!("Recent: {}", recent.title);
    }

    app.shutdown().await;

    Ok(())
}
