// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The result of one job execution attempt batch.

use crate::job::JobId;
use serde::{Deserialize, Serialize};

/// Outcome of executing one job once it came due. `error_msg` is empty on
/// success. At most one `JobResult` is persisted per execution cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub id: JobId,
    pub begin_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub error_msg: String,
    #[serde(default)]
    pub extra: Vec<u8>,
}

impl JobResult {
    pub fn success(id: JobId, begin_time: i64, end_time: i64, extra: Vec<u8>) -> Self {
        Self {
            id,
            begin_time,
            end_time,
            error_msg: String::new(),
            extra,
        }
    }

    pub fn failure(id: JobId, begin_time: i64, end_time: i64, error_msg: impl Into<String>) -> Self {
        Self {
            id,
            begin_time,
            end_time,
            error_msg: error_msg.into(),
            extra: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_msg.is_empty()
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
