// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turning files in a module directory into [`tw_core::Module`]s.
//!
//! The original resolved a module by `dlopen`-ing a `.so` and looking up
//! `TaskMain`/`TaskErr` symbols. `unsafe_code` is forbidden here, so a module
//! file instead holds a small JSON manifest naming a shell command to run;
//! `MODULE_EXT` stands in for the platform loadable-extension suffix the
//! original keyed its directory scan on.

use crate::error::WatchError;
use crate::subprocess::{CmdRunner, SHELL_COMMAND_TIMEOUT};
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tw_core::{module::parse_module_basename, Module, ModuleRunner};

pub const MODULE_EXT: &str = "task";

#[derive(Debug, Deserialize)]
struct Manifest {
    command: String,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Runs a module's manifest command in a subprocess, as
/// [`tw_core::ModuleRunner`].
pub struct ScriptModuleRunner {
    inner: CmdRunner,
}

impl ScriptModuleRunner {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            inner: CmdRunner::new(command, timeout),
        }
    }
}

#[async_trait]
impl ModuleRunner for ScriptModuleRunner {
    async fn run(&self) -> Result<Vec<u8>, String> {
        self.inner.run().await
    }

    async fn on_error(&self, error: &str) {
        tracing::warn!(command = %self.inner.line, error, "module command failed");
    }
}

/// Scans a single directory (non-recursively, matching [`crate::FsWatcher`])
/// for `<name>[@<version>].task` manifest files.
pub struct DirectoryModuleSource {
    dir: PathBuf,
}

impl DirectoryModuleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// True if `filename` is one this source would load — used by the
    /// registry to filter FSWatcher events before calling [`Self::load`].
    pub fn qualifies(filename: &str) -> bool {
        !filename.starts_with('.')
            && Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                == Some(MODULE_EXT)
    }

    /// Loads every qualifying file in the directory.
    pub fn scan(&self) -> Result<Vec<Module>, WatchError> {
        let mut modules = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|source| WatchError::Io {
            path: self.dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| WatchError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !Self::qualifies(name) {
                continue;
            }
            modules.push(self.load(name)?);
        }
        Ok(modules)
    }

    /// Loads a single file by basename, as reconciled in response to a
    /// `Created`/`Renamed` [`crate::FsEvent`].
    pub fn load(&self, filename: &str) -> Result<Module, WatchError> {
        let path = self.dir.join(filename);
        let contents = fs::read_to_string(&path).map_err(|source| WatchError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&contents).map_err(|err| WatchError::MalformedModule {
                path: path.clone(),
                message: err.to_string(),
            })?;

        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        let (name, version) = parse_module_basename(stem);
        let timeout = manifest
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(SHELL_COMMAND_TIMEOUT);

        Ok(Module::new(
            name,
            version,
            Arc::new(ScriptModuleRunner::new(manifest.command, timeout)),
        ))
    }
}

/// An in-memory module runner returning a fixed output, for registry and
/// executor tests that shouldn't need a real file or subprocess.
#[cfg(any(test, feature = "test-support"))]
pub struct FixedOutputModuleRunner {
    pub output: Result<Vec<u8>, String>,
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl ModuleRunner for FixedOutputModuleRunner {
    async fn run(&self) -> Result<Vec<u8>, String> {
        self.output.clone()
    }
}

#[cfg(test)]
#[path = "module_source_tests.rs"]
mod tests;
