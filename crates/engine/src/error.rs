// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Core(#[from] tw_core::Error),

    #[error(transparent)]
    Store(#[from] tw_storage::StoreError),

    #[error(transparent)]
    Watch(#[from] tw_adapters::WatchError),

    #[error("manager is not running")]
    NotRunning,

    #[error("manager is already running")]
    AlreadyRunning,
}
