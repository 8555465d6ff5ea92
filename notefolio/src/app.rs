//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::DATABASE_FILE_NAME;
use crate::database::{create_pool, memory_pool, Repository};
use crate::error::Result;
use crate::services::{FoldersService, NotesService, RecentsService};
use crate::session::Session;
use std::path::Path;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    repo: Repository,
    pub folders_service: FoldersService,
    pub notes_service: NotesService,
    pub recents_service: RecentsService,
    pub session: Session,
}

impl AppState {
    pub fn new(repo: Repository) -> Self {
        Self {
            folders_service: FoldersService::new(repo.clone()),
            notes_service: NotesService::new(repo.clone()),
            recents_service: RecentsService::new(repo.clone()),
            session: Session::new(),
            repo,
        }
    }

    /// Close the store. Every clone of this state shares it.
    pub async fn shutdown(&self) {
        tracing::info!("Closing database");
        self.repo.close().await;
    }
}

/// Application setup against a database in `app_data_dir`
pub async fn setup(app_data_dir: &Path) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(app_data_dir)?;

    let pool = create_pool(&app_data_dir.join(DATABASE_FILE_NAME)).await?;
    let state = AppState::new(Repository::new(pool));

    tracing::info!("Application initialized successfully");

    Ok(state)
}

/// Application setup against a throwaway in-memory database
pub async fn setup_in_memory() -> Result<AppState> {
    tracing::info!("Initializing in-memory application");

    let pool = memory_pool().await?;

    Ok(AppState::new(Repository::new(pool)))
}
