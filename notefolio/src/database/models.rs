//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to a UI host.

use crate::config::{
    is_system_folder, CREATED_AT_FORMAT, DEFAULT_PARAGRAPH_SIZE, DEFAULT_TEXT_SIZE,
    FAVORITES_FOLDER, TRASH_FOLDER,
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named container for notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    pub name: String,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn is_favorites(&self) -> bool {
        self.name == FAVORITES_FOLDER
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// A note with its formatting attributes. The title is the primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub title: String,
    pub body: String,
    /// Display-formatted creation date
    pub created_at: String,
    /// Parent folder name
    pub folder: String,
    pub text_size: i64,
    /// Line height
    pub paragraph_size: i64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub underline: bool,
    pub favorite: bool,
}

impl Note {
    /// An unsaved note in `folder` with default formatting, dated today
    pub fn draft(folder: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
            folder: folder.into(),
            text_size: DEFAULT_TEXT_SIZE,
            paragraph_size: DEFAULT_PARAGRAPH_SIZE,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            underline: false,
            favorite: false,
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn is_trashed(&self) -> bool {
        self.folder == TRASH_FOLDER
    }
}

/// Marks a note as recently saved or opened. `id` grows with every touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecentEntry {
    pub id: i64,
    pub title: String,
}

/// Create folder request
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
}

impl CreateFolderRequest {
    pub fn is_reserved(&self) -> bool {
        is_system_folder(self.name.trim())
    }
}

/// What deleting a note did, depending on the folder it was deleted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// Reassigned to Trash, can be restored
    MovedToTrash,
    /// Row and recent entry are gone
    Removed,
}

impl DeleteOutcome {
    pub fn is_restorable(self) -> bool {
        matches!(self, DeleteOutcome::MovedToTrash)
    }
}
