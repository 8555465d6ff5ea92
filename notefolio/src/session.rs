//! Selection cursors
//!
//! The current folder and current note are transient navigation state.
//! They live in memory for the lifetime of a session and drive the
//! notes-in-folder and note-detail live queries.

use std::sync::Arc;
use tokio::sync::watch;

/// Current folder and current note for one application session
#[derive(Clone)]
pub struct Session {
    folder: Arc<watch::Sender<Option<String>>>,
    note: Arc<watch::Sender<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        let (folder, _) = watch::channel(None);
        let (note, _) = watch::channel(None);
        Self {
            folder: Arc::new(folder),
            note: Arc::new(note),
        }
    }

    /// Point the folder cursor at `name`
    pub fn open_folder(&self, name: &str) {
        tracing::debug!("Opening folder: {}", name);
        self.folder.send_replace(Some(name.to_string()));
    }

    /// Point the note cursor at `title`. A blank title clears the selection.
    pub fn select_note(&self, title: &str) {
        let selection = Some(title.to_string()).filter(|t| !t.trim().is_empty());
        tracing::debug!("Selecting note: {:?}", selection);
        self.note.send_replace(selection);
    }

    pub fn clear_note(&self) {
        self.note.send_replace(None);
    }

    pub fn current_folder(&self) -> Option<String> {
        self.folder.borrow().clone()
    }

    pub fn current_note(&self) -> Option<String> {
        self.note.borrow().clone()
    }

    pub fn watch_folder(&self) -> watch::Receiver<Option<String>> {
        self.folder.subscribe()
    }

    pub fn watch_note(&self) -> watch::Receiver<Option<String>> {
        self.note.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursors_start_empty() {
        let session = Session::new();
        assert_eq!(session.current_folder(), None);
        assert_eq!(session.current_note(), None);
    }

    #[test]
    fn test_blank_note_title_means_no_selection() {
        let session = Session::new();

        session.select_note("Plan");
        assert_eq!(session.current_note().as_deref(), Some("Plan"));

        session.select_note("  ");
        assert_eq!(session.current_note(), None);
    }

    #[test]
    fn test_clones_share_cursors() {
        let session = Session::new();
        let other = session.clone();
        let rx = session.watch_folder();

        other.open_folder("Work");

        assert_eq!(session.current_folder().as_deref(), Some("Work"));
        assert!(rx.has_changed().unwrap());
    }
}
