//! Screen state holders
//!
//! Each screen publishes an immutable state snapshot through a watch
//! channel, accepts events through `handle`, and reports one-shot effects
//! (toasts, navigation hints) through an unbounded channel.
//!
//! - `home`: folder lists, recents, folder creation
//! - `folder`: notes of the current folder, trash and favorites actions
//! - `note`: the note editor with its formatting attributes

pub mod folder;
pub mod home;
pub mod note;

pub use folder::{FolderEffect, FolderEvent, FolderScreen, FolderState};
pub use home::{HomeEffect, HomeEvent, HomeScreen, HomeState};
pub use note::{NoteEffect, NoteEvent, NoteScreen, NoteState};

use crate::error::AppError;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Background tasks owned by a screen, aborted with it
#[derive(Default)]
pub(crate) struct ScreenTasks(Vec<JoinHandle<()>>);

impl ScreenTasks {
    pub(crate) fn push(&mut self, task: JoinHandle<()>) {
        self.0.push(task);
    }
}

impl Drop for ScreenTasks {
    fn drop(&mut self) {
        for task in &self.0 {
            task.abort();
        }
    }
}

/// Copy every value of `source` into the screen state
pub(crate) fn bind<T, S, F>(
    state: &Arc<watch::Sender<S>>,
    mut source: watch::Receiver<T>,
    apply: F,
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync + 'static,
    F: Fn(&mut S, T) + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::spawn(async move {
        loop {
            let value = source.borrow_and_update().clone();
            state.send_modify(|s| apply(s, value));

            if source.changed().await.is_err() {
                break;
            }
        }
    })
}

/// Send a one-shot effect. A screen nobody listens to is not an error.
pub(crate) fn emit<E>(effects: &mpsc::UnboundedSender<E>, effect: E) {
    let _ = effects.send(effect);
}

/// Log a failed operation and turn it into a user-facing message.
///
/// Validation messages are shown as is; store failures get a generic
/// message naming the action.
pub(crate) fn failure_message(action: &str, err: &AppError) -> String {
    if err.is_validation() {
        tracing::warn!("Could not {}: {}", action, err);
        err.to_string()
    } else {
        tracing::error!("Could not {}: {}", action, err);
        format!("Could not {}", action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_failure_message() {
        let validation: AppError = ValidationError::BlankTitle.into();
        assert_eq!(
            failure_message("save the note", &validation),
            "A note needs a title before it can be saved"
        );

        let store = AppError::Generic("disk I/O error".to_string());
        assert_eq!(failure_message("save the note", &store), "Could not save the note");
    }
}
