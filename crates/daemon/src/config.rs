// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: where its socket, lock, log, data, and module
//! directories live. Resolution order matches the rest of the stack:
//! `TASKWHEEL_STATE_DIR` > `XDG_STATE_HOME/taskwheel` > `~/.local/state/taskwheel`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a state directory: $HOME is not set")]
    NoStateDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
    pub log_path: PathBuf,
    pub data_path: PathBuf,
    pub modules_path: PathBuf,
    pub scripts_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = state_dir()?;
        Ok(Self {
            socket_path: state_dir.join("taskwheeld.sock"),
            lock_path: state_dir.join("taskwheeld.pid"),
            log_path: state_dir.join("taskwheeld.log"),
            data_path: state_dir.join("tasks.log"),
            modules_path: state_dir.join("modules"),
            scripts_path: state_dir.join("scripts"),
            state_dir,
        })
    }

    /// Creates `state_dir`, `modules_path`, and `scripts_path` if they don't
    /// already exist.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.state_dir)?;
        std::fs::create_dir_all(&self.modules_path)?;
        std::fs::create_dir_all(&self.scripts_path)?;
        Ok(())
    }
}

fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("TASKWHEEL_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("taskwheel"));
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/taskwheel"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
