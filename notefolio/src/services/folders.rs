//! Folders service
//!
//! Creating folders and reading the folder lists.

use crate::database::{CreateFolderRequest, Folder, LiveQuery, Repository};
use crate::error::{Result, ValidationError};

/// Service for managing folders
#[derive(Clone)]
pub struct FoldersService {
    repo: Repository,
}

impl FoldersService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create a user folder. Re-creating an existing name overwrites it.
    pub async fn create_folder(&self, name: &str) -> Result<Folder> {
        let req = CreateFolderRequest {
            name: name.trim().to_string(),
        };

        if req.name.is_empty() {
            return Err(ValidationError::BlankFolderName.into());
        }
        if req.is_reserved() {
            return Err(ValidationError::ReservedFolderName(req.name).into());
        }

        tracing::info!("Creating folder: {}", req.name);

        let folder = self.repo.create_folder(req).await?;

        tracing::info!("Folder created successfully: {}", folder.name);

        Ok(folder)
    }

    /// User folders, newest first
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.repo.list_folders().await
    }

    /// The fixed system folders
    pub async fn list_system_folders(&self) -> Result<Vec<Folder>> {
        self.repo.list_system_folders().await
    }

    /// User folders, kept current as folders are created
    pub fn watch_folders(&self) -> LiveQuery<Vec<Folder>> {
        LiveQuery::spawn(&self.repo, "folders", Vec::new(), |repo| async move {
            repo.list_folders().await
        })
    }
}
