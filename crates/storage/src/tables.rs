// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two persisted tables: jobs and results, each a [`PrefixedStore`]
//! keyed by the job's big-endian 8-byte uuid, valued as JSON.

use crate::error::StoreError;
use crate::kv::{KvStore, PrefixedStore};
use std::sync::Arc;
use tw_core::{Job, JobId, JobResult};

/// Prefix for job records. Chosen short and disjoint from [`RESULT_PREFIX`].
pub const TASK_PREFIX: &[u8] = b"t:";

/// Prefix for result records.
pub const RESULT_PREFIX: &[u8] = b"r:";

/// Persisted `Job` table, keyed by `uuid_be8`.
#[derive(Clone)]
pub struct TaskTable {
    store: PrefixedStore,
}

impl TaskTable {
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        Self {
            store: PrefixedStore::new(backend, TASK_PREFIX),
        }
    }

    pub fn has(&self, id: JobId) -> Result<bool, StoreError> {
        self.store.has(&id.to_be_bytes())
    }

    pub fn get(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        match self.store.get(&id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put(&self, job: &Job) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(job)?;
        self.store.put(&job.uuid.to_be_bytes(), &bytes)
    }

    pub fn delete(&self, id: JobId) -> Result<(), StoreError> {
        self.store.delete(&id.to_be_bytes())
    }
}

/// Persisted `JobResult` table, keyed by `uuid_be8`. Results are never
/// deleted by `DeleteTask` — a job record's removal does not erase its
/// execution history.
#[derive(Clone)]
pub struct ResultTable {
    store: PrefixedStore,
}

impl ResultTable {
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        Self {
            store: PrefixedStore::new(backend, RESULT_PREFIX),
        }
    }

    pub fn get(&self, id: JobId) -> Result<Option<JobResult>, StoreError> {
        match self.store.get(&id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put(&self, result: &JobResult) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(result)?;
        self.store.put(&result.id.to_be_bytes(), &bytes)
    }
}

#[cfg(test)]
#[path = "tables_tests.rs"]
mod tests;
