// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw-storage: a prefixed view over an ordered byte key-value store, plus
//! the two tables (`tasks`, `results`) the task manager persists through.
//!
//! A production deployment would back this with a real embedded KV store;
//! this crate ships [`LogKvStore`], a from-scratch append-only JSONL
//! write-ahead log good enough to exercise the real semantics end to end.

pub mod error;
pub mod kv;
pub mod log_store;
pub mod tables;

pub use error::StoreError;
pub use kv::{KvStore, PrefixedStore};
pub use log_store::LogKvStore;
pub use tables::{ResultTable, TaskTable, RESULT_PREFIX, TASK_PREFIX};
