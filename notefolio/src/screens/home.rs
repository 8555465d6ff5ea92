//! Home screen
//!
//! Shows the system folders, user folders (newest first) and the most
//! recently used notes.

use super::{bind, emit, failure_message, ScreenTasks};
use crate::app::AppState;
use crate::config::RECENT_NOTES_LIMIT;
use crate::database::{Folder, LiveQuery, RecentEntry};
use crate::error::Result;
use crate::services::{FoldersService, RecentsService};
use crate::session::Session;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeState {
    pub system_folders: Vec<Folder>,
    pub folders: Vec<Folder>,
    pub recents: Vec<RecentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeEvent {
    OpenFolder(String),
    CreateFolder(String),
    OpenNote(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum HomeEffect {
    FolderCreated(String),
    FolderOpened(String),
    NoteOpened(String),
    Failed(String),
}

pub struct HomeScreen {
    folders_service: FoldersService,
    recents_service: RecentsService,
    session: Session,
    state: Arc<watch::Sender<HomeState>>,
    effects: mpsc::UnboundedSender<HomeEffect>,
    _folders: LiveQuery<Vec<Folder>>,
    _recents: LiveQuery<Vec<RecentEntry>>,
    _tasks: ScreenTasks,
}

impl HomeScreen {
    pub async fn new(app: &AppState) -> Result<(Self, mpsc::UnboundedReceiver<HomeEffect>)> {
        let system_folders = app.folders_service.list_system_folders().await?;
        let (state, _) = watch::channel(HomeState {
            system_folders,
            ..HomeState::default()
        });
        let state = Arc::new(state);
        let (effects, effects_rx) = mpsc::unbounded_channel();

        let folders = app.folders_service.watch_folders();
        let recents = app.recents_service.watch_recents(RECENT_NOTES_LIMIT);

        let mut tasks = ScreenTasks::default();
        tasks.push(bind(&state, folders.subscribe(), |s: &mut HomeState, folders| {
            s.folders = folders;
        }));
        tasks.push(bind(&state, recents.subscribe(), |s: &mut HomeState, recents| {
            s.recents = recents;
        }));

        let screen = Self {
            folders_service: app.folders_service.clone(),
            recents_service: app.recents_service.clone(),
            session: app.session.clone(),
            state,
            effects,
            _folders: folders,
            _recents: recents,
            _tasks: tasks,
        };

        Ok((screen, effects_rx))
    }

    pub fn state(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> HomeState {
        self.state.borrow().clone()
    }

    pub async fn handle(&self, event: HomeEvent) {
        match event {
            HomeEvent::OpenFolder(name) => {
                self.session.open_folder(&name);
                emit(&self.effects, HomeEffect::FolderOpened(name));
            }
            HomeEvent::CreateFolder(name) => {
                match self.folders_service.create_folder(&name).await {
                    Ok(folder) => emit(&self.effects, HomeEffect::FolderCreated(folder.name)),
                    Err(e) => emit(
                        &self.effects,
                        HomeEffect::Failed(failure_message("create the folder", &e)),
                    ),
                }
            }
            HomeEvent::OpenNote(title) => match self.recents_service.add_recent(&title).await {
                Ok(()) => {
                    self.session.select_note(&title);
                    emit(&self.effects, HomeEffect::NoteOpened(title));
                }
                Err(e) => emit(
                    &self.effects,
                    HomeEffect::Failed(failure_message("open the note", &e)),
                ),
            },
        }
    }
}
