//! Notes service
//!
//! High-level business logic for notes operations.
//! Handles validation, folder placement and the trash lifecycle.

use crate::config::{ARCHIVE_FOLDER, FAVORITES_FOLDER, TRASH_FOLDER};
use crate::database::{DeleteOutcome, LiveQuery, Note, Repository};
use crate::error::{AppError, Result, ValidationError};
use tokio::sync::watch;

/// Service for managing notes
#[derive(Clone)]
pub struct NotesService {
    repo: Repository,
}

impl NotesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Create or update a note, keyed by title
    pub async fn save_note(&self, note: &Note) -> Result<Note> {
        if !note.has_title() {
            return Err(ValidationError::BlankTitle.into());
        }

        tracing::info!("Saving note: {}", note.title);

        let saved = self.repo.save_note(note).await?;

        tracing::info!("Note saved successfully: {}", saved.title);

        Ok(saved)
    }

    /// Get a note by title
    pub async fn get_note(&self, title: &str) -> Result<Note> {
        self.repo.get_note(title).await
    }

    /// Get a note by title, if it was ever saved
    pub async fn find_note(&self, title: &str) -> Result<Option<Note>> {
        self.repo.find_note(title).await
    }

    /// Delete a note as seen from `current_folder`.
    ///
    /// Outside the trash this moves the note to the trash. Inside the trash
    /// the note and its recent entry are removed for good.
    pub async fn delete_note(&self, title: &str, current_folder: &str) -> Result<DeleteOutcome> {
        tracing::info!("Deleting note {} from {}", title, current_folder);

        let outcome = if current_folder == TRASH_FOLDER {
            self.repo.delete_note_permanently(title).await?;
            DeleteOutcome::Removed
        } else {
            self.repo.move_note(title, TRASH_FOLDER).await?;
            DeleteOutcome::MovedToTrash
        };

        tracing::info!("Note {} deleted: {:?}", title, outcome);

        Ok(outcome)
    }

    /// Move a trashed note to `destination`
    pub async fn restore_note(&self, title: &str, destination: &str) -> Result<()> {
        let destination = destination.trim();
        if destination.is_empty() || destination == TRASH_FOLDER || destination == FAVORITES_FOLDER
        {
            return Err(ValidationError::InvalidDestination(destination.to_string()).into());
        }

        tracing::info!("Restoring note {} to {}", title, destination);

        self.repo.restore_note(title, destination).await
    }

    /// Move a note to the archive folder
    pub async fn archive_note(&self, title: &str) -> Result<()> {
        tracing::info!("Archiving note: {}", title);

        self.repo.move_note(title, ARCHIVE_FOLDER).await
    }

    /// Flip the favorite flag of a stored note. Returns the new value.
    pub async fn toggle_favorite(&self, title: &str, favorite: bool) -> Result<bool> {
        let favorite = !favorite;

        self.repo.set_favorite(title, favorite).await?;

        tracing::info!("Note {} favorite: {}", title, favorite);

        Ok(favorite)
    }

    /// Notes whose parent folder is `folder`
    pub async fn list_notes_in_folder(&self, folder: &str) -> Result<Vec<Note>> {
        self.repo.list_notes_in_folder(folder).await
    }

    /// Favorite notes across all folders
    pub async fn list_favorite_notes(&self) -> Result<Vec<Note>> {
        self.repo.list_favorite_notes().await
    }

    pub async fn count_notes_in_folder(&self, folder: &str) -> Result<i64> {
        self.repo.count_notes_in_folder(folder).await
    }

    /// Search notes outside the trash by title or body
    pub async fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let all_notes = self.repo.list_notes().await?;

        let query_lower = query.to_lowercase();

        let filtered: Vec<Note> = all_notes
            .into_iter()
            .filter(|note| {
                note.title.to_lowercase().contains(&query_lower)
                    || note.body.to_lowercase().contains(&query_lower)
            })
            .collect();

        Ok(filtered)
    }

    /// Notes of whichever folder the cursor points at, published together
    /// with the folder they were read for
    pub fn watch_folder_notes(
        &self,
        folder: watch::Receiver<Option<String>>,
    ) -> LiveQuery<(Option<String>, Vec<Note>)> {
        LiveQuery::follow(
            &self.repo,
            "folder notes",
            folder,
            (None, Vec::new()),
            |repo, folder: Option<String>| async move {
                let notes = match folder.as_deref() {
                    None => Vec::new(),
                    Some(FAVORITES_FOLDER) => repo.list_favorite_notes().await?,
                    Some(name) => repo.list_notes_in_folder(name).await?,
                };
                Ok::<_, AppError>((folder, notes))
            },
        )
    }

    /// The note the cursor points at, or `None` when nothing is selected
    pub fn watch_note(&self, title: watch::Receiver<Option<String>>) -> LiveQuery<Option<Note>> {
        LiveQuery::follow(
            &self.repo,
            "note detail",
            title,
            None,
            |repo, title: Option<String>| async move {
                match title.filter(|t| !t.trim().is_empty()) {
                    Some(title) => repo.find_note(&title).await,
                    None => Ok(None),
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;
    use crate::error::AppError;
    use crate::session::Session;
    use std::time::Duration;

    async fn create_test_service() -> NotesService {
        NotesService::new(Repository::new(memory_pool().await.unwrap()))
    }

    fn note(title: &str, folder: &str, body: &str) -> Note {
        let mut note = Note::draft(folder);
        note.title = title.to_string();
        note.body = body.to_string();
        note
    }

    #[tokio::test]
    async fn test_blank_title_not_saved() {
        let service = create_test_service().await;

        let err = service.save_note(&note("  ", "Work", "body")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ValidationError::BlankTitle)));
        assert!(service.list_notes_in_folder("Work").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_twice_keeps_latest_body() {
        let service = create_test_service().await;

        service.save_note(&note("Plan", "Work", "one")).await.unwrap();
        service.save_note(&note("Plan", "Work", "two")).await.unwrap();

        let notes = service.list_notes_in_folder("Work").await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].body, "two");
    }

    #[tokio::test]
    async fn test_delete_outside_trash_is_restorable() {
        let service = create_test_service().await;
        service.save_note(&note("X", "Work", "")).await.unwrap();

        let outcome = service.delete_note("X", "Work").await.unwrap();

        assert!(outcome.is_restorable());
        assert_eq!(service.get_note("X").await.unwrap().folder, TRASH_FOLDER);

        service.restore_note("X", "Work").await.unwrap();
        assert_eq!(service.get_note("X").await.unwrap().folder, "Work");
    }

    #[tokio::test]
    async fn test_delete_from_favorites_moves_to_trash() {
        let service = create_test_service().await;
        service.save_note(&note("X", "Work", "")).await.unwrap();
        service.toggle_favorite("X", false).await.unwrap();

        let outcome = service.delete_note("X", FAVORITES_FOLDER).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::MovedToTrash);
        assert!(service.get_note("X").await.unwrap().is_trashed());
    }

    #[tokio::test]
    async fn test_delete_in_trash_removes_note() {
        let service = create_test_service().await;
        service.save_note(&note("Y", "Work", "")).await.unwrap();
        service.delete_note("Y", "Work").await.unwrap();

        let outcome = service.delete_note("Y", TRASH_FOLDER).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Removed);
        assert!(service.find_note("Y").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_rejects_system_destinations() {
        let service = create_test_service().await;
        service.save_note(&note("X", TRASH_FOLDER, "")).await.unwrap();

        for destination in [TRASH_FOLDER, FAVORITES_FOLDER, " "] {
            let err = service.restore_note("X", destination).await.unwrap_err();
            assert!(matches!(
                err,
                AppError::Validation(ValidationError::InvalidDestination(_))
            ));
        }
        assert!(service.get_note("X").await.unwrap().is_trashed());
    }

    #[tokio::test]
    async fn test_archive_note() {
        let service = create_test_service().await;
        service.save_note(&note("Old", "Work", "")).await.unwrap();

        service.archive_note("Old").await.unwrap();

        assert_eq!(service.count_notes_in_folder(ARCHIVE_FOLDER).await.unwrap(), 1);
        assert_eq!(service.count_notes_in_folder("Work").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let service = create_test_service().await;
        service.save_note(&note("Plan", "Work", "")).await.unwrap();

        assert!(service.toggle_favorite("Plan", false).await.unwrap());
        assert_eq!(service.list_favorite_notes().await.unwrap().len(), 1);

        assert!(!service.toggle_favorite("Plan", true).await.unwrap());
        assert!(service.list_favorite_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_favorite_on_unsaved_note() {
        let service = create_test_service().await;

        let err = service.toggle_favorite("Draft", false).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Validation(ValidationError::NoteNotSaved(_))
        ));
        assert!(service.find_note("Draft").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_notes_skips_trash() {
        let service = create_test_service().await;
        service.save_note(&note("Shopping", "Home", "Buy milk")).await.unwrap();
        service.save_note(&note("Todo", "Work", "Fix bug")).await.unwrap();
        service.save_note(&note("Milkshake", TRASH_FOLDER, "")).await.unwrap();

        let results = service.search_notes("MILK").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Shopping");

        assert!(service.search_notes("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watch_favorites_folder() {
        let service = create_test_service().await;
        let session = Session::new();
        service.save_note(&note("A", "Work", "")).await.unwrap();
        service.save_note(&note("B", "Home", "")).await.unwrap();
        service.toggle_favorite("B", false).await.unwrap();

        let live = service.watch_folder_notes(session.watch_folder());
        let mut rx = live.subscribe();
        session.open_folder(FAVORITES_FOLDER);

        let (folder, notes) =
            tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|(_, n)| n.len() == 1))
                .await
                .unwrap()
                .unwrap()
                .clone();
        assert_eq!(folder.as_deref(), Some(FAVORITES_FOLDER));
        assert_eq!(notes[0].title, "B");
        assert_eq!(notes[0].folder, "Home");
    }

    #[tokio::test]
    async fn test_watch_note_follows_cursor() {
        let service = create_test_service().await;
        let session = Session::new();
        service.save_note(&note("Plan", "Work", "draft")).await.unwrap();

        let live = service.watch_note(session.watch_note());
        let mut rx = live.subscribe();
        session.select_note("Plan");

        tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|n| n.as_ref().map(|n| n.body.as_str()) == Some("draft")),
        )
        .await
        .unwrap()
        .unwrap();

        service.save_note(&note("Plan", "Work", "final")).await.unwrap();
        tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|n| n.as_ref().map(|n| n.body.as_str()) == Some("final")),
        )
        .await
        .unwrap()
        .unwrap();

        session.clear_note();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|n| n.is_none()))
            .await
            .unwrap()
            .unwrap();
    }
}
