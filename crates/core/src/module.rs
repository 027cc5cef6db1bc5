// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Module` execution abstraction.
//!
//! The original service resolved `TaskMain`/`TaskErr` symbols from a
//! dynamically loaded shared object (`plugin.Open` in Go). Dynamic library
//! loading is inherently `unsafe`, which this workspace forbids
//! (`workspace.lints.rust.unsafe_code = "forbid"`), so the capability is
//! abstracted as a trait: anything that can run `main()` and be told about
//! an error qualifies as a `Module`, whether it is backed by a subprocess,
//! an in-process registry of built-in handlers, or (in a deployment willing
//! to accept `unsafe`) an actual loaded library.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// The string `name@version` a module is registered and looked up under.
pub type ModuleId = String;

/// Default version assigned to a module file named without `@version`.
pub const DEFAULT_MODULE_VERSION: &str = "0.0.1";

/// Splits a module file's basename (without extension) into `(name, version)`,
/// defaulting the version when no `@` separator is present.
pub fn parse_module_basename(basename: &str) -> (String, String) {
    match basename.split_once('@') {
        Some((name, version)) => (name.to_string(), version.to_string()),
        None => (basename.to_string(), DEFAULT_MODULE_VERSION.to_string()),
    }
}

pub fn module_id(name: &str, version: &str) -> ModuleId {
    format!("{name}@{version}")
}

/// An external capability resolved by `name@version`, exposing
/// `main(ctx) -> Result<output, error>` and `on_error(ctx, error)`.
#[async_trait]
pub trait ModuleRunner: Send + Sync {
    /// Equivalent of the original's `TaskMain`. Returns captured output on
    /// success.
    async fn run(&self) -> Result<Vec<u8>, String>;

    /// Equivalent of the original's `TaskErr`. Called after a failed `run`,
    /// before the error is surfaced to the caller. Default is a no-op.
    async fn on_error(&self, _error: &str) {}
}

/// A loaded module: identity plus the runner that executes it.
#[derive(Clone)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub version: String,
    runner: Arc<dyn ModuleRunner>,
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("version", &self.version)
            .finish()
    }
}

impl Module {
    pub fn new(name: impl Into<String>, version: impl Into<String>, runner: Arc<dyn ModuleRunner>) -> Self {
        let name = name.into();
        let version = version.into();
        let id = module_id(&name, &version);
        Self {
            id,
            name,
            version,
            runner,
        }
    }

    /// Run the module once, invoking `on_error` if it fails.
    pub async fn execute(&self) -> Result<Vec<u8>, String> {
        match self.runner.run().await {
            Ok(out) => Ok(out),
            Err(err) => {
                self.runner.on_error(&err).await;
                Err(err)
            }
        }
    }

    /// Run the module up to `retry.max(1)` times, stopping at the first
    /// success. Unlike the original (which always returned `nil`, masking
    /// every failure), this returns the last error when all attempts fail.
    pub async fn execute_with_retry(&self, retry: u32) -> Result<Vec<u8>, String> {
        let attempts = retry.max(1);
        let mut last_err = String::new();
        for attempt in 0..attempts {
            match self.execute().await {
                Ok(out) => return Ok(out),
                Err(err) => {
                    tracing::warn!(module = %self.id, attempt, error = %err, "module execution failed");
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name:{},version:{}", self.name, self.version)
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
