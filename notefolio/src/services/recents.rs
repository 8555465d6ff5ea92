//! Recents service
//!
//! Tracks which notes were touched most recently.

use crate::database::{LiveQuery, RecentEntry, Repository};
use crate::error::Result;

/// Service for the recently used notes list
#[derive(Clone)]
pub struct RecentsService {
    repo: Repository,
}

impl RecentsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Make `title` the most recent entry
    pub async fn add_recent(&self, title: &str) -> Result<()> {
        self.repo.touch_recent(title).await
    }

    /// The `limit` most recently touched entries, most recent first
    pub async fn list_recents(&self, limit: usize) -> Result<Vec<RecentEntry>> {
        let entries = self.repo.list_recents().await?;
        Ok(most_recent(entries, limit))
    }

    /// Recents kept current as notes are saved and deleted
    pub fn watch_recents(&self, limit: usize) -> LiveQuery<Vec<RecentEntry>> {
        LiveQuery::spawn(&self.repo, "recents", Vec::new(), move |repo| async move {
            repo.list_recents()
                .await
                .map(|entries| most_recent(entries, limit))
        })
    }
}

/// Keep the last `limit` entries of an oldest-first list, newest first
pub fn most_recent(mut entries: Vec<RecentEntry>, limit: usize) -> Vec<RecentEntry> {
    let skip = entries.len().saturating_sub(limit);
    entries.drain(..skip);
    entries.reverse();
    entries
}
