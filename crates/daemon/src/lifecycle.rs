// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and shutdown: acquiring the single-instance lock, wiring
//! storage, the module registry, and the task manager together, and
//! binding the Unix socket.

use crate::config::{Config, ConfigError};
use fs2::FileExt;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use tokio::net::UnixListener;
use tokio::task::JoinHandle;
use tw_adapters::FsWatcher;
use tw_core::{NodeIdGen, SystemClock};
use tw_engine::{ManagerError, ModuleRegistry, TaskManager};
use tw_storage::{KvStore, LogKvStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Watch(#[from] tw_adapters::WatchError),

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error("another daemon instance already holds the lock at {0}")]
    AlreadyRunning(std::path::PathBuf),
}

/// Everything `main` needs to run the daemon and shut it down cleanly.
pub struct Daemon {
    pub manager: Arc<TaskManager>,
    pub listener: UnixListener,
    pub config: Config,
    _lock_file: File,
    registry_watch: JoinHandle<()>,
}

impl Daemon {
    pub fn shutdown(self) -> Result<(), LifecycleError> {
        self.manager.stop()?;
        self.registry_watch.abort();
        let _ = std::fs::remove_file(&self.config.socket_path);
        Ok(())
    }
}

pub async fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    config.ensure_dirs()?;
    let lock_file = acquire_lock(config)?;

    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }

    let backend: Arc<dyn KvStore> = Arc::new(LogKvStore::open(&config.data_path)?);
    let registry = Arc::new(ModuleRegistry::open(&config.modules_path)?);
    let watcher = FsWatcher::watch(&config.modules_path)?;
    let registry_watch = Arc::clone(&registry).spawn_watch(watcher);

    let manager = Arc::new(TaskManager::new(
        backend,
        Arc::clone(&registry),
        config.scripts_path.clone(),
        Arc::new(NodeIdGen::default()),
        Arc::new(SystemClock),
    ));
    manager.start()?;

    let listener = UnixListener::bind(&config.socket_path)?;

    Ok(Daemon {
        manager,
        listener,
        config: config.clone(),
        _lock_file: lock_file,
        registry_watch,
    })
}

/// Takes an exclusive advisory lock on `config.lock_path`, writing the
/// current pid into it. The lock is released when the returned `File` (held
/// for the daemon's lifetime inside [`Daemon`]) is dropped.
fn acquire_lock(config: &Config) -> Result<File, LifecycleError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&config.lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| LifecycleError::AlreadyRunning(config.lock_path.clone()))?;

    file.set_len(0)?;
    (&file).write_all(std::process::id().to_string().as_bytes())?;
    Ok(file)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
