// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by domain-level validation in `tw-core`.

use thiserror::Error;

/// Validation and domain errors that do not depend on I/O.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid parameter")]
    InvalidParameter,

    #[error("invalid datetime")]
    InvalidDatetime,

    #[error("invalid task name")]
    InvalidTaskName,

    #[error("invalid plugin name: {0}")]
    InvalidPluginName(String),

    #[error("no task, may be executed")]
    NoTask,

    #[error("invalid subscription")]
    InvalidSubscription,

    #[error("unknown module: {0}")]
    UnknownModule(String),
}
