//! Application configuration constants
//!
//! Central location for system folder names, formatting defaults
//! and limits used throughout the application.

// ===== System Folders =====

/// Synthetic folder listing every favorite note, whatever its parent folder
pub const FAVORITES_FOLDER: &str = "Favorites";

/// Soft-deleted notes live here until restored or deleted for good
pub const TRASH_FOLDER: &str = "Trash";

/// Archived notes are moved here and stay until moved again
pub const ARCHIVE_FOLDER: &str = "Archived Notes";

/// Fixed system folder set, in display order
pub const SYSTEM_FOLDERS: &[&str] = &[FAVORITES_FOLDER, TRASH_FOLDER, ARCHIVE_FOLDER];

/// Returns true when `name` is one of the fixed system folders
pub fn is_system_folder(name: &str) -> bool {
    SYSTEM_FOLDERS.contains(&name)
}

// ===== Recents =====

/// Number of recent notes shown on the home screen
pub const RECENT_NOTES_LIMIT: usize = 3;

// ===== Note Formatting Defaults =====

/// Default text size for a new note
pub const DEFAULT_TEXT_SIZE: i64 = 16;

/// Default line height (paragraph size) for a new note
pub const DEFAULT_PARAGRAPH_SIZE: i64 = 24;

/// Display format of a note's creation date, e.g. "07 March 2026"
pub const CREATED_AT_FORMAT: &str = "%d %B %Y";

// ===== Storage =====

/// Database file name inside the data directory
pub const DATABASE_FILE_NAME: &str = "notefolio.db";

/// Fallback log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "notefolio=debug,info";
