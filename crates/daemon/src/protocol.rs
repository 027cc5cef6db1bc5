// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The wire protocol spoken over the daemon's Unix socket: one JSON
//! [`Request`]/[`Response`] pair per call, each framed with a 4-byte
//! big-endian length prefix.

use serde::{Deserialize, Serialize};
use tw_core::{Job, JobId, JobResult, JobType, ModuleId};

fn default_retry() -> u32 {
    1
}

/// Everything a caller supplies to schedule a new job. Mirrors [`Job`]
/// minus the fields the manager assigns (`uuid`, `add_time`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobArgs {
    pub name: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    #[serde(default = "default_retry")]
    pub retry: u32,
    pub interval: u64,
    /// An absolute unix time to fire at, overriding `interval` with the
    /// relative delay to that moment. Must be in the future.
    #[serde(default)]
    pub datetime: Option<i64>,
    #[serde(default)]
    pub limit_time: Option<i64>,
    #[serde(default)]
    pub extra: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum Request {
    AddTask(JobArgs),
    GetTask { id: u64 },
    CheckTask { id: u64 },
    DeleteTask { id: u64 },
    GetResult { id: u64 },
    ListModules,
    CheckModule { id: ModuleId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTaskReply {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckTaskReply {
    pub scheduled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckModuleReply {
    pub registered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListModulesReply {
    pub modules: Vec<ModuleId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    AddTask(AddTaskReply),
    GetTask { task: Option<Job> },
    CheckTask(CheckTaskReply),
    DeleteTask,
    GetResult { result: Option<JobResult> },
    ListModules(ListModulesReply),
    CheckModule(CheckModuleReply),
    Error { message: String },
}

impl From<JobId> for AddTaskReply {
    fn from(id: JobId) -> Self {
        Self { id: id.0 }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
