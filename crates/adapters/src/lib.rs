// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw-adapters: I/O at the edges of the system — the filesystem watcher and
//! the subprocess/module execution backends. Nothing in `tw-engine` opens a
//! file watch or spawns a process directly; it only depends on the traits
//! these adapters implement.

pub mod error;
pub mod fswatch;
pub mod module_source;
pub mod subprocess;

pub use error::WatchError;
pub use fswatch::{FsEvent, FsEventKind, FsWatcher};
pub use module_source::{DirectoryModuleSource, ScriptModuleRunner, MODULE_EXT};
pub use subprocess::{run_with_timeout, CmdRunner, SHELL_COMMAND_TIMEOUT};

#[cfg(any(test, feature = "test-support"))]
pub use module_source::FixedOutputModuleRunner;
