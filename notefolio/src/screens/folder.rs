//! Folder screen
//!
//! Lists the notes of the folder the session cursor points at. The
//! Favorites folder lists every favorite note instead.

use super::{bind, emit, failure_message, ScreenTasks};
use crate::app::AppState;
use crate::config::is_system_folder;
use crate::database::{DeleteOutcome, LiveQuery, Note};
use crate::error::AppError;
use crate::services::{NotesService, RecentsService};
use crate::session::Session;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FolderState {
    pub folder: Option<String>,
    pub is_system: bool,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderEvent {
    OpenNote(String),
    NewNote,
    DeleteNote(String),
    RestoreNote { title: String, destination: String },
    ArchiveNote(String),
    ToggleFavorite { title: String, favorite: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FolderEffect {
    NoteOpened { title: String },
    ComposeNote { folder: String },
    /// The UI offers to restore the note
    MovedToTrash { title: String },
    NoteDeleted { title: String },
    NoteRestored { title: String, folder: String },
    NoteArchived { title: String },
    AddedToFavorites { title: String },
    RemovedFromFavorites { title: String },
    Failed { message: String },
}

pub struct FolderScreen {
    notes_service: NotesService,
    recents_service: RecentsService,
    session: Session,
    state: Arc<watch::Sender<FolderState>>,
    effects: mpsc::UnboundedSender<FolderEffect>,
    _notes: LiveQuery<(Option<String>, Vec<Note>)>,
    _tasks: ScreenTasks,
}

impl FolderScreen {
    pub fn new(app: &AppState) -> (Self, mpsc::UnboundedReceiver<FolderEffect>) {
        let (state, _) = watch::channel(FolderState::default());
        let state = Arc::new(state);
        let (effects, effects_rx) = mpsc::unbounded_channel();

        let notes = app.notes_service.watch_folder_notes(app.session.watch_folder());

        let mut tasks = ScreenTasks::default();
        tasks.push(bind(
            &state,
            notes.subscribe(),
            |s: &mut FolderState, (folder, notes): (Option<String>, Vec<Note>)| {
                s.is_system = folder.as_deref().is_some_and(is_system_folder);
                s.folder = folder;
                s.notes = notes;
            },
        ));

        let screen = Self {
            notes_service: app.notes_service.clone(),
            recents_service: app.recents_service.clone(),
            session: app.session.clone(),
            state,
            effects,
            _notes: notes,
            _tasks: tasks,
        };

        (screen, effects_rx)
    }

    pub fn state(&self) -> watch::Receiver<FolderState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FolderState {
        self.state.borrow().clone()
    }

    fn fail(&self, action: &str, err: &AppError) {
        let message = failure_message(action, err);
        emit(&self.effects, FolderEffect::Failed { message });
    }

    pub async fn handle(&self, event: FolderEvent) {
        match event {
            FolderEvent::OpenNote(title) => match self.recents_service.add_recent(&title).await {
                Ok(()) => {
                    self.session.select_note(&title);
                    emit(&self.effects, FolderEffect::NoteOpened { title });
                }
                Err(e) => self.fail("open the note", &e),
            },
            FolderEvent::NewNote => match self.session.current_folder() {
                Some(folder) if !is_system_folder(&folder) => {
                    self.session.clear_note();
                    emit(&self.effects, FolderEffect::ComposeNote { folder });
                }
                Some(folder) => {
                    tracing::warn!("Refusing to create a note in system folder {}", folder);
                    emit(
                        &self.effects,
                        FolderEffect::Failed {
                            message: format!("Notes cannot be created in \"{}\"", folder),
                        },
                    );
                }
                None => emit(
                    &self.effects,
                    FolderEffect::Failed {
                        message: "Open a folder first".to_string(),
                    },
                ),
            },
            FolderEvent::DeleteNote(title) => {
                let folder = self.session.current_folder().unwrap_or_default();
                match self.notes_service.delete_note(&title, &folder).await {
                    Ok(DeleteOutcome::MovedToTrash) => {
                        emit(&self.effects, FolderEffect::MovedToTrash { title })
                    }
                    Ok(DeleteOutcome::Removed) => {
                        if self.session.current_note().as_deref() == Some(title.as_str()) {
                            self.session.clear_note();
                        }
                        emit(&self.effects, FolderEffect::NoteDeleted { title })
                    }
                    Err(e) => self.fail("delete the note", &e),
                }
            }
            FolderEvent::RestoreNote { title, destination } => {
                match self.notes_service.restore_note(&title, &destination).await {
                    Ok(()) => emit(
                        &self.effects,
                        FolderEffect::NoteRestored {
                            title,
                            folder: destination,
                        },
                    ),
                    Err(e) => self.fail("restore the note", &e),
                }
            }
            FolderEvent::ArchiveNote(title) => match self.notes_service.archive_note(&title).await
            {
                Ok(()) => emit(&self.effects, FolderEffect::NoteArchived { title }),
                Err(e) => self.fail("archive the note", &e),
            },
            FolderEvent::ToggleFavorite { title, favorite } => {
                match self.notes_service.toggle_favorite(&title, favorite).await {
                    Ok(true) => emit(&self.effects, FolderEffect::AddedToFavorites { title }),
                    Ok(false) => emit(&self.effects, FolderEffect::RemovedFromFavorites { title }),
                    Err(e) => self.fail("update favorites", &e),
                }
            }
        }
    }
}
