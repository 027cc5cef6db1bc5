// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watches exactly one directory, non-recursively, and translates raw
//! filesystem events into the three kinds the module registry cares about.

use crate::error::WatchError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::mpsc;

/// The only event shapes the registry reconciler reacts to. Everything else
/// (access, metadata-only modify, ...) is dropped on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    Created,
    Renamed,
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub kind: FsEventKind,
    /// File basename only — the watcher never exposes the watched directory's
    /// path to callers.
    pub file: String,
}

/// A live non-recursive watch on a single directory. Dropping the watcher
/// stops the watch; there is no separate cancellation handle because the
/// underlying OS watch has no meaningful state once its owner is gone.
pub struct FsWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FsEvent>,
}

impl FsWatcher {
    pub fn watch(dir: &Path) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel(256);

        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "fs watch error");
                        return;
                    }
                };
                for event in translate(event) {
                    // The callback runs on notify's own background thread,
                    // so a blocking send is safe and won't stall async code.
                    if tx.blocking_send(event).is_err() {
                        return;
                    }
                }
            })
            .map_err(WatchError::Notify)?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Io {
                path: dir.to_path_buf(),
                source: io_error_from(source),
            })?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    pub async fn recv(&mut self) -> Option<FsEvent> {
        self.rx.recv().await
    }
}

fn translate(event: Event) -> Vec<FsEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => FsEventKind::Created,
        EventKind::Remove(_) => FsEventKind::Dropped,
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => FsEventKind::Renamed,
        _ => return Vec::new(),
    };
    event
        .paths
        .iter()
        .filter_map(|p| basename(p))
        .map(|file| FsEvent { kind, file })
        .collect()
}

fn basename(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(ToOwned::to_owned)
}

fn io_error_from(err: notify::Error) -> std::io::Error {
    match err.kind {
        notify::ErrorKind::Io(io_err) => io_err,
        other => std::io::Error::other(other.to_string()),
    }
}

#[cfg(test)]
#[path = "fswatch_tests.rs"]
mod tests;
