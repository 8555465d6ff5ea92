//! Note screen
//!
//! Edits one note: title, body and formatting. The draft follows the
//! session's current note; edits in progress are never overwritten by a
//! store update for the same note.

use super::{bind, emit, failure_message, ScreenTasks};
use crate::app::AppState;
use crate::config::TRASH_FOLDER;
use crate::database::{DeleteOutcome, FontStyle, FontWeight, LiveQuery, Note};
use crate::error::AppError;
use crate::services::NotesService;
use crate::session::Session;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteState {
    pub draft: Note,
    /// The draft's title exists in the store
    pub persisted: bool,
    /// The draft has edits that are not saved yet
    pub dirty: bool,
}

impl Default for NoteState {
    fn default() -> Self {
        Self {
            draft: Note::draft(String::new()),
            persisted: false,
            dirty: false,
        }
    }
}

impl NoteState {
    /// Apply a store read for the selected note
    fn apply_stored(&mut self, stored: Option<Note>) {
        match stored {
            // Unsaved edits, including a rename, are never replaced
            Some(note) if self.dirty => {
                if note.title == self.draft.title {
                    self.draft.favorite = note.favorite;
                    self.draft.folder = note.folder;
                }
                self.persisted = true;
            }
            Some(note) => {
                self.draft = note;
                self.persisted = true;
                self.dirty = false;
            }
            None => self.persisted = false,
        }
    }

    fn edit(&mut self, change: impl FnOnce(&mut Note)) {
        change(&mut self.draft);
        self.dirty = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Compose { folder: String },
    ChangeTitle(String),
    ChangeText(String),
    ChangeSize(i64),
    ChangeParagraph(i64),
    ChangeWeight(FontWeight),
    ChangeStyle(FontStyle),
    ChangeDecoration(bool),
    Save,
    Delete,
    Restore { destination: String },
    ToggleFavorite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteEffect {
    NoteSaved { title: String },
    NoteSaveFailed { message: String },
    AddedToFavorites { title: String },
    RemovedFromFavorites { title: String },
    /// The UI offers to restore the note
    MovedToTrash { title: String },
    NoteDeleted { title: String },
    NoteRestored { title: String, folder: String },
    Failed { message: String },
}

pub struct NoteScreen {
    notes_service: NotesService,
    session: Session,
    state: Arc<watch::Sender<NoteState>>,
    effects: mpsc::UnboundedSender<NoteEffect>,
    _note: LiveQuery<Option<Note>>,
    _tasks: ScreenTasks,
}

impl NoteScreen {
    pub fn new(app: &AppState) -> (Self, mpsc::UnboundedReceiver<NoteEffect>) {
        let (state, _) = watch::channel(NoteState::default());
        let state = Arc::new(state);
        let (effects, effects_rx) = mpsc::unbounded_channel();

        let note = app.notes_service.watch_note(app.session.watch_note());

        let session = app.session.clone();
        let mut tasks = ScreenTasks::default();
        tasks.push(bind(
            &state,
            note.subscribe(),
            move |s: &mut NoteState, stored: Option<Note>| {
                // Reads for a cursor that has since moved on are stale
                let current = session.current_note();
                let stale = match &stored {
                    Some(note) => current.as_deref() != Some(note.title.as_str()),
                    None => current.is_some(),
                };
                if !stale {
                    s.apply_stored(stored);
                }
            },
        ));

        let screen = Self {
            notes_service: app.notes_service.clone(),
            session: app.session.clone(),
            state,
            effects,
            _note: note,
            _tasks: tasks,
        };

        (screen, effects_rx)
    }

    pub fn state(&self) -> watch::Receiver<NoteState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> NoteState {
        self.state.borrow().clone()
    }

    fn draft(&self) -> Note {
        self.state.borrow().draft.clone()
    }

    fn fail(&self, action: &str, err: &AppError) {
        let message = failure_message(action, err);
        emit(&self.effects, NoteEffect::Failed { message });
    }

    pub async fn handle(&self, event: NoteEvent) {
        match event {
            NoteEvent::Compose { folder } => {
                self.session.clear_note();
                self.state.send_replace(NoteState {
                    draft: Note::draft(folder),
                    ..NoteState::default()
                });
            }
            NoteEvent::ChangeTitle(title) => {
                self.state.send_modify(|s| s.edit(|n| n.title = title))
            }
            NoteEvent::ChangeText(body) => {
                self.state.send_modify(|s| s.edit(|n| n.body = body))
            }
            NoteEvent::ChangeSize(size) => {
                self.state.send_modify(|s| s.edit(|n| n.text_size = size))
            }
            NoteEvent::ChangeParagraph(size) => {
                self.state.send_modify(|s| s.edit(|n| n.paragraph_size = size))
            }
            NoteEvent::ChangeWeight(weight) => {
                self.state.send_modify(|s| s.edit(|n| n.font_weight = weight))
            }
            NoteEvent::ChangeStyle(style) => {
                self.state.send_modify(|s| s.edit(|n| n.font_style = style))
            }
            NoteEvent::ChangeDecoration(underline) => {
                self.state.send_modify(|s| s.edit(|n| n.underline = underline))
            }
            NoteEvent::Save => self.save().await,
            NoteEvent::Delete => self.delete().await,
            NoteEvent::Restore { destination } => {
                let title = self.draft().title;
                match self.notes_service.restore_note(&title, &destination).await {
                    Ok(()) => {
                        let folder = destination.trim().to_string();
                        self.state.send_modify(|s| s.draft.folder = folder.clone());
                        emit(&self.effects, NoteEffect::NoteRestored { title, folder });
                    }
                    Err(e) => self.fail("restore the note", &e),
                }
            }
            NoteEvent::ToggleFavorite => {
                let draft = self.draft();
                match self
                    .notes_service
                    .toggle_favorite(&draft.title, draft.favorite)
                    .await
                {
                    Ok(favorite) => {
                        self.state.send_modify(|s| s.draft.favorite = favorite);
                        let title = draft.title;
                        let effect = if favorite {
                            NoteEffect::AddedToFavorites { title }
                        } else {
                            NoteEffect::RemovedFromFavorites { title }
                        };
                        emit(&self.effects, effect);
                    }
                    Err(e) => self.fail("update favorites", &e),
                }
            }
        }
    }

    async fn save(&self) {
        let draft = self.draft();

        match self.notes_service.save_note(&draft).await {
            Ok(saved) => {
                self.session.select_note(&saved.title);
                self.state.send_modify(|s| {
                    // Keep edits made while the save was running
                    if s.draft == draft {
                        s.draft = saved.clone();
                        s.dirty = false;
                    }
                    s.persisted = true;
                });
                emit(&self.effects, NoteEffect::NoteSaved { title: saved.title });
            }
            Err(e) => {
                let message = failure_message("save the note", &e);
                emit(&self.effects, NoteEffect::NoteSaveFailed { message });
            }
        }
    }

    async fn delete(&self) {
        let draft = self.draft();

        // The stored folder decides between trash and removal
        let folder = match self.notes_service.find_note(&draft.title).await {
            Ok(stored) => stored.map_or(draft.folder, |note| note.folder),
            Err(e) => return self.fail("delete the note", &e),
        };

        match self.notes_service.delete_note(&draft.title, &folder).await {
            Ok(DeleteOutcome::MovedToTrash) => {
                self.state.send_modify(|s| s.draft.folder = TRASH_FOLDER.to_string());
                emit(&self.effects, NoteEffect::MovedToTrash { title: draft.title });
            }
            Ok(DeleteOutcome::Removed) => {
                self.session.clear_note();
                self.state.send_replace(NoteState::default());
                emit(&self.effects, NoteEffect::NoteDeleted { title: draft.title });
            }
            Err(e) => self.fail("delete the note", &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::setup_in_memory;
    use std::time::Duration;

    async fn wait_for<F>(rx: &mut watch::Receiver<NoteState>, f: F) -> NoteState
    where
        F: FnMut(&NoteState) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(f))
            .await
            .unwrap()
            .unwrap()
            .clone()
    }

    async fn compose(screen: &NoteScreen, folder: &str, title: &str, body: &str) {
        screen
            .handle(NoteEvent::Compose {
                folder: folder.to_string(),
            })
            .await;
        screen.handle(NoteEvent::ChangeTitle(title.to_string())).await;
        screen.handle(NoteEvent::ChangeText(body.to_string())).await;
    }

    #[tokio::test]
    async fn test_save_new_note() {
        let app = setup_in_memory().await.unwrap();
        let (screen, mut effects) = NoteScreen::new(&app);

        compose(&screen, "Work", "Plan", "Ship it").await;
        assert!(screen.snapshot().dirty);

        screen.handle(NoteEvent::Save).await;

        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::NoteSaved {
                title: "Plan".to_string()
            })
        );
        assert_eq!(app.session.current_note().as_deref(), Some("Plan"));
        let snapshot = screen.snapshot();
        assert!(snapshot.persisted);
        assert!(!snapshot.dirty);

        let stored = app.notes_service.get_note("Plan").await.unwrap();
        assert_eq!(stored.body, "Ship it");
        assert_eq!(stored.folder, "Work");
        let recents = app.recents_service.list_recents(3).await.unwrap();
        assert_eq!(recents[0].title, "Plan");
    }

    #[tokio::test]
    async fn test_blank_title_save_fails() {
        let app = setup_in_memory().await.unwrap();
        let (screen, mut effects) = NoteScreen::new(&app);

        compose(&screen, "Work", "  ", "body").await;
        screen.handle(NoteEvent::Save).await;

        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::NoteSaveFailed {
                message: "A note needs a title before it can be saved".to_string()
            })
        );
        let snapshot = screen.snapshot();
        assert!(snapshot.dirty);
        assert!(!snapshot.persisted);
        assert!(app.notes_service.list_notes_in_folder("Work").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_keeps_draft() {
        let app = setup_in_memory().await.unwrap();
        let (screen, mut effects) = NoteScreen::new(&app);

        compose(&screen, "Work", "Plan", "keep me").await;
        let before = screen.snapshot();
        app.shutdown().await;

        screen.handle(NoteEvent::Save).await;

        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::NoteSaveFailed {
                message: "Could not save the note".to_string()
            })
        );
        assert_eq!(screen.snapshot(), before);
        assert_eq!(app.session.current_note(), None);
    }

    #[tokio::test]
    async fn test_formatting_changes_are_saved() {
        let app = setup_in_memory().await.unwrap();
        let (screen, mut effects) = NoteScreen::new(&app);

        compose(&screen, "Work", "Styled", "").await;
        screen.handle(NoteEvent::ChangeSize(20)).await;
        screen.handle(NoteEvent::ChangeParagraph(32)).await;
        screen.handle(NoteEvent::ChangeWeight(FontWeight::Bold)).await;
        screen.handle(NoteEvent::ChangeStyle(FontStyle::Italic)).await;
        screen.handle(NoteEvent::ChangeDecoration(true)).await;
        screen.handle(NoteEvent::Save).await;
        effects.recv().await;

        let stored = app.notes_service.get_note("Styled").await.unwrap();
        assert_eq!(stored.text_size, 20);
        assert_eq!(stored.paragraph_size, 32);
        assert_eq!(stored.font_weight, FontWeight::Bold);
        assert_eq!(stored.font_style, FontStyle::Italic);
        assert!(stored.underline);
    }

    #[tokio::test]
    async fn test_selecting_note_loads_draft() {
        let app = setup_in_memory().await.unwrap();
        let mut note = Note::draft("Work");
        note.title = "Plan".to_string();
        note.body = "Stored body".to_string();
        app.notes_service.save_note(&note).await.unwrap();

        let (screen, _effects) = NoteScreen::new(&app);
        let mut state = screen.state();
        app.session.select_note("Plan");

        let snapshot = wait_for(&mut state, |s| s.persisted).await;
        assert_eq!(snapshot.draft.body, "Stored body");
        assert!(!snapshot.dirty);
    }

    #[tokio::test]
    async fn test_favorite_requires_saved_note() {
        let app = setup_in_memory().await.unwrap();
        let (screen, mut effects) = NoteScreen::new(&app);

        compose(&screen, "Work", "Unsaved", "").await;
        screen.handle(NoteEvent::ToggleFavorite).await;

        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::Failed {
                message: "Save \"Unsaved\" before adding it to favorites".to_string()
            })
        );
        assert!(!screen.snapshot().draft.favorite);
        assert!(app.notes_service.find_note("Unsaved").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_toggle_favorite_on_saved_note() {
        let app = setup_in_memory().await.unwrap();
        let (screen, mut effects) = NoteScreen::new(&app);

        compose(&screen, "Work", "Plan", "").await;
        screen.handle(NoteEvent::Save).await;
        effects.recv().await;

        screen.handle(NoteEvent::ToggleFavorite).await;
        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::AddedToFavorites {
                title: "Plan".to_string()
            })
        );
        assert!(app.notes_service.get_note("Plan").await.unwrap().favorite);

        screen.handle(NoteEvent::ToggleFavorite).await;
        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::RemovedFromFavorites {
                title: "Plan".to_string()
            })
        );
        assert!(!app.notes_service.get_note("Plan").await.unwrap().favorite);
    }

    #[tokio::test]
    async fn test_delete_trash_restore_and_remove() {
        let app = setup_in_memory().await.unwrap();
        let (screen, mut effects) = NoteScreen::new(&app);

        compose(&screen, "Work", "X", "").await;
        screen.handle(NoteEvent::Save).await;
        effects.recv().await;

        screen.handle(NoteEvent::Delete).await;
        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::MovedToTrash {
                title: "X".to_string()
            })
        );
        assert_eq!(screen.snapshot().draft.folder, TRASH_FOLDER);

        screen
            .handle(NoteEvent::Restore {
                destination: "Work".to_string(),
            })
            .await;
        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::NoteRestored {
                title: "X".to_string(),
                folder: "Work".to_string()
            })
        );
        assert_eq!(app.notes_service.get_note("X").await.unwrap().folder, "Work");

        screen.handle(NoteEvent::Delete).await;
        effects.recv().await;
        screen.handle(NoteEvent::Delete).await;
        assert_eq!(
            effects.recv().await,
            Some(NoteEffect::NoteDeleted {
                title: "X".to_string()
            })
        );
        assert!(app.notes_service.find_note("X").await.unwrap().is_none());
        assert!(app.recents_service.list_recents(3).await.unwrap().is_empty());
        assert_eq!(app.session.current_note(), None);
    }

    #[tokio::test]
    async fn test_store_update_does_not_clobber_edits() {
        let mut state = NoteState::default();
        let mut stored = Note::draft("Work");
        stored.title = "Plan".to_string();
        stored.body = "stored".to_string();
        state.apply_stored(Some(stored.clone()));
        assert_eq!(state.draft.body, "stored");

        state.edit(|n| n.body = "editing".to_string());
        stored.favorite = true;
        state.apply_stored(Some(stored));

        assert_eq!(state.draft.body, "editing");
        assert!(state.draft.favorite);
        assert!(state.dirty);
    }

    #[tokio::test]
    async fn test_rename_in_progress_survives_store_update() {
        let app = setup_in_memory().await.unwrap();
        let mut note = Note::draft("Work");
        note.title = "Plan".to_string();
        note.body = "stored".to_string();
        app.notes_service.save_note(&note).await.unwrap();

        let (screen, _effects) = NoteScreen::new(&app);
        let mut state = screen.state();
        app.session.select_note("Plan");
        wait_for(&mut state, |s| s.persisted && s.draft.title == "Plan").await;

        screen.handle(NoteEvent::ChangeTitle("Plan v2".to_string())).await;
        screen.handle(NoteEvent::ChangeText("my unsaved edits".to_string())).await;

        // Favorited elsewhere while the rename is unsaved
        let watcher = app.notes_service.watch_note(app.session.watch_note());
        let mut notes = watcher.subscribe();
        app.notes_service.toggle_favorite("Plan", false).await.unwrap();
        tokio::time::timeout(
            Duration::from_secs(5),
            notes.wait_for(|n| n.as_ref().is_some_and(|n| n.favorite)),
        )
        .await
        .unwrap()
        .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let snapshot = screen.snapshot();
        assert_eq!(snapshot.draft.title, "Plan v2");
        assert_eq!(snapshot.draft.body, "my unsaved edits");
        assert!(!snapshot.draft.favorite);
        assert!(snapshot.dirty);
    }

    #[test]
    fn test_dirty_draft_ignores_other_title() {
        let mut state = NoteState::default();
        state.edit(|n| {
            n.title = "Plan v2".to_string();
            n.body = "editing".to_string();
        });

        let mut stored = Note::draft("Work");
        stored.title = "Plan".to_string();
        stored.body = "stored".to_string();
        stored.favorite = true;
        state.apply_stored(Some(stored));

        assert_eq!(state.draft.title, "Plan v2");
        assert_eq!(state.draft.body, "editing");
        assert!(!state.draft.favorite);
        assert!(state.dirty);
        assert!(state.persisted);
    }
}
