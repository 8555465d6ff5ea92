//! Live queries
//!
//! A live query re-runs whenever the store revision moves or its key
//! changes, and publishes the result through a watch channel. A key change
//! that arrives while a read is in flight drops that read, so only results
//! for the latest key are ever published.

use super::repository::Repository;
use crate::error::Result;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running live query. Dropping it stops the query.
pub struct LiveQuery<T> {
    values: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> LiveQuery<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Follow `query` for the lifetime of the handle
    pub fn spawn<F, Fut>(repo: &Repository, name: &'static str, initial: T, query: F) -> Self
    where
        F: Fn(Repository) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        // The key never changes, its sender lives as long as the task
        let (key_tx, key_rx) = watch::channel(());
        Self::run(repo, name, key_rx, key_tx, initial, move |repo, ()| query(repo))
    }

    /// Follow `query` keyed by a cursor, switching to the latest key
    pub fn follow<K, F, Fut>(
        repo: &Repository,
        name: &'static str,
        key: watch::Receiver<K>,
        initial: T,
        query: F,
    ) -> Self
    where
        K: Clone + Send + Sync + 'static,
        F: Fn(Repository, K) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self::run(repo, name, key, (), initial, query)
    }

    fn run<K, G, F, Fut>(
        repo: &Repository,
        name: &'static str,
        mut key: watch::Receiver<K>,
        guard: G,
        initial: T,
        query: F,
    ) -> Self
    where
        K: Clone + Send + Sync + 'static,
        G: Send + 'static,
        F: Fn(Repository, K) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (values_tx, values) = watch::channel(initial);
        let repo = repo.clone();
        let mut changes = repo.subscribe_changes();

        let task = tokio::spawn(async move {
            let _guard = guard;

            loop {
                let current = key.borrow_and_update().clone();
                changes.borrow_and_update();

                tokio::select! {
                    result = query(repo.clone(), current) => {
                        match result {
                            Ok(value) => {
                                values_tx.send_if_modified(|old| {
                                    if *old == value {
                                        false
                                    } else {
                                        *old = value;
                                        true
                                    }
                                });
                            }
                            Err(e) => {
                                tracing::error!("Live query {} failed: {}", name, e);
                            }
                        }
                    }
                    changed = key.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        tracing::debug!("Live query {} superseded by a newer key", name);
                        continue;
                    }
                }

                tokio::select! {
                    changed = key.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("Live query {} stopped", name);
        });

        Self { values, task }
    }

    /// A receiver for the published values
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.values.clone()
    }

    /// The latest published value
    pub fn current(&self) -> T {
        self.values.borrow().clone()
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
