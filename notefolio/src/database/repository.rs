//! Repository layer for database operations
//!
//! This module provides CRUD operations for folders, notes and recents.
//! Compound mutations run in a single transaction. Every successful
//! mutation bumps the store revision so live queries can re-read.

use super::models::*;
use crate::config::TRASH_FOLDER;
use crate::error::{AppError, Result, ValidationError};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::watch;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    revision: Arc<watch::Sender<u64>>,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            pool,
            revision: Arc::new(revision),
        }
    }

    /// Receiver that observes every committed mutation
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Close the pool. Later calls fail with a database error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn notify_changed(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    // ===== Folders =====

    /// Create a user folder, or refresh an existing one with the same name
    pub async fn create_folder(&self, req: CreateFolderRequest) -> Result<Folder> {
        let now = Utc::now();

        let folder = sqlx::query_as::<_, Folder>(
            r#"
            INSERT INTO folders (name, is_system, created_at)
            VALUES (?, 0, ?)
            ON CONFLICT(name) DO UPDATE SET created_at = excluded.created_at
            WHERE folders.is_system = 0
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.notify_changed();
        tracing::debug!("Created folder: {}", folder.name);
        Ok(folder)
    }

    /// List user folders, newest first
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            r#"
            SELECT * FROM folders
            WHERE is_system = 0
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(folders)
    }

    /// List the fixed system folders in display order
    pub async fn list_system_folders(&self) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            r#"
            SELECT * FROM folders WHERE is_system = 1 ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(folders)
    }

    // ===== Notes =====

    /// Upsert a note by title and touch its recent entry, atomically.
    ///
    /// An existing row keeps its creation date and favorite flag.
    pub async fn save_note(&self, note: &Note) -> Result<Note> {
        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (
                title, body, created_at, folder, text_size, paragraph_size,
                font_weight, font_style, underline, favorite
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(title) DO UPDATE SET
                body = excluded.body,
                folder = excluded.folder,
                text_size = excluded.text_size,
                paragraph_size = excluded.paragraph_size,
                font_weight = excluded.font_weight,
                font_style = excluded.font_style,
                underline = excluded.underline
            RETURNING *
            "#,
        )
        .bind(&note.title)
        .bind(&note.body)
        .bind(&note.created_at)
        .bind(&note.folder)
        .bind(note.text_size)
        .bind(note.paragraph_size)
        .bind(note.font_weight)
        .bind(note.font_style)
        .bind(note.underline)
        .bind(note.favorite)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM recents WHERE title = ?")
            .bind(&saved.title)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO recents (title) VALUES (?)")
            .bind(&saved.title)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.notify_changed();
        tracing::debug!("Saved note: {}", saved.title);
        Ok(saved)
    }

    /// Get a note by title, if it exists
    pub async fn find_note(&self, title: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(note)
    }

    /// Get a note by title
    pub async fn get_note(&self, title: &str) -> Result<Note> {
        self.find_note(title)
            .await?
            .ok_or_else(|| AppError::NoteNotFound(title.to_string()))
    }

    /// List notes whose parent folder is `folder`
    pub async fn list_notes_in_folder(&self, folder: &str) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT * FROM notes
            WHERE folder = ?
            ORDER BY title COLLATE NOCASE ASC
            "#,
        )
        .bind(folder)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    /// List favorite notes across all folders
    pub async fn list_favorite_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT * FROM notes
            WHERE favorite = 1
            ORDER BY title COLLATE NOCASE ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    /// List every note outside the trash
    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT * FROM notes
            WHERE folder != ?
            ORDER BY title COLLATE NOCASE ASC
            "#,
        )
        .bind(TRASH_FOLDER)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    /// Count notes in a folder
    pub async fn count_notes_in_folder(&self, folder: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE folder = ?")
            .bind(folder)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Reassign a note to another folder
    pub async fn move_note(&self, title: &str, folder: &str) -> Result<()> {
        let rows = sqlx::query("UPDATE notes SET folder = ? WHERE title = ?")
            .bind(folder)
            .bind(title)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::NoteNotFound(title.to_string()));
        }

        self.notify_changed();
        tracing::debug!("Moved note {} to {}", title, folder);
        Ok(())
    }

    /// Move a trashed note back out of the trash
    pub async fn restore_note(&self, title: &str, destination: &str) -> Result<()> {
        let rows = sqlx::query("UPDATE notes SET folder = ? WHERE title = ? AND folder = ?")
            .bind(destination)
            .bind(title)
            .bind(TRASH_FOLDER)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return match self.find_note(title).await? {
                Some(_) => Err(ValidationError::NotInTrash(title.to_string()).into()),
                None => Err(AppError::NoteNotFound(title.to_string())),
            };
        }

        self.notify_changed();
        tracing::debug!("Restored note {} to {}", title, destination);
        Ok(())
    }

    /// Permanently delete a note together with its recent entry
    pub async fn delete_note_permanently(&self, title: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM recents WHERE title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query("DELETE FROM notes WHERE title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            // Dropping the transaction rolls it back
            return Err(AppError::NoteNotFound(title.to_string()));
        }

        tx.commit().await?;

        self.notify_changed();
        tracing::debug!("Hard deleted note: {}", title);
        Ok(())
    }

    /// Set the favorite flag of a stored note
    pub async fn set_favorite(&self, title: &str, favorite: bool) -> Result<()> {
        let rows = sqlx::query("UPDATE notes SET favorite = ? WHERE title = ?")
            .bind(favorite)
            .bind(title)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(ValidationError::NoteNotSaved(title.to_string()).into());
        }

        self.notify_changed();
        tracing::debug!("Set favorite on {} to {}", title, favorite);
        Ok(())
    }

    // ===== Recents =====

    /// Make `title` the most recent entry, without duplicating it
    pub async fn touch_recent(&self, title: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM recents WHERE title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO recents (title) VALUES (?)")
            .bind(title)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.notify_changed();
        tracing::debug!("Touched recent: {}", title);
        Ok(())
    }

    /// List all recent entries in insertion order, oldest first
    pub async fn list_recents(&self) -> Result<Vec<RecentEntry>> {
        let recents = sqlx::query_as::<_, RecentEntry>("SELECT * FROM recents ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(recents)
    }
}
