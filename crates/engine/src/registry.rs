// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory module registry, kept in sync with a module directory by
//! reconciling [`tw_adapters::FsEvent`]s as they arrive.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tw_adapters::{DirectoryModuleSource, FsEvent, FsEventKind, FsWatcher, WatchError};
use tw_core::module::{module_id, parse_module_basename};
use tw_core::{Module, ModuleId};

pub struct ModuleRegistry {
    modules: RwLock<HashMap<ModuleId, Module>>,
    source: DirectoryModuleSource,
}

impl ModuleRegistry {
    /// Builds the registry from an initial directory scan.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, WatchError> {
        let dir = dir.into();
        let source = DirectoryModuleSource::new(dir);
        let modules = source
            .scan()?
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();
        Ok(Self {
            modules: RwLock::new(modules),
            source,
        })
    }

    pub fn get(&self, id: &str) -> Option<Module> {
        self.modules.read().get(id).cloned()
    }

    pub fn has(&self, id: &str) -> bool {
        self.modules.read().contains_key(id)
    }

    pub fn list(&self) -> Vec<ModuleId> {
        self.modules.read().keys().cloned().collect()
    }

    /// Applies one filesystem event: loads a newly created/renamed module
    /// file, or drops a module whose file disappeared.
    pub fn reconcile(&self, event: &FsEvent) {
        match event.kind {
            FsEventKind::Created | FsEventKind::Renamed => {
                if !DirectoryModuleSource::qualifies(&event.file) {
                    return;
                }
                match self.source.load(&event.file) {
                    Ok(module) => {
                        let id = module.id.clone();
                        self.modules.write().insert(id.clone(), module);
                        tracing::info!(module = %id, "module registered");
                    }
                    Err(err) => {
                        tracing::warn!(file = %event.file, error = %err, "failed to load module");
                    }
                }
            }
            FsEventKind::Dropped => {
                let stem = Path::new(&event.file)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(&event.file);
                let (name, version) = parse_module_basename(stem);
                let id = module_id(&name, &version);
                if self.modules.write().remove(&id).is_some() {
                    tracing::info!(module = %id, "module unregistered");
                }
            }
        }
    }

    /// Spawns a task that feeds every event from `watcher` into
    /// [`Self::reconcile`] until the watcher is dropped or closed.
    pub fn spawn_watch(self: Arc<Self>, mut watcher: FsWatcher) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = watcher.recv().await {
                self.reconcile(&event);
            }
        })
    }

    /// Registers a module directly, bypassing the directory source. For
    /// tests that need a module backed by something other than a real
    /// manifest file.
    #[cfg(any(test, feature = "test-support"))]
    pub fn insert_for_test(&self, module: Module) {
        self.modules.write().insert(module.id.clone(), module);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
