// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ordered byte key-value store interface and the prefixed view over it.

use crate::error::StoreError;
use std::sync::Arc;

/// An ordered byte key-value store. The backend is an external collaborator
/// — this trait is everything the rest of the crate needs from it:
/// `Has`/`Get`/`Put`/`Delete`, each operating on the raw key the caller
/// passes in (prefixing happens one layer up, in [`PrefixedStore`]).
pub trait KvStore: Send + Sync {
    fn has(&self, key: &[u8]) -> Result<bool, StoreError>;
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;
}

/// A thin, prefixed view over a [`KvStore`]. Every key this type touches is
/// `prefix || key` in the backing store; it does not interpret values —
/// that is the job of the tables built on top (see `tables.rs`).
#[derive(Clone)]
pub struct PrefixedStore {
    backend: Arc<dyn KvStore>,
    prefix: Vec<u8>,
}

impl PrefixedStore {
    pub fn new(backend: Arc<dyn KvStore>, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    fn prefixed(&self, key: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix.len() + key.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(key);
        out
    }

    pub fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        self.backend.has(&self.prefixed(key))
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.backend.get(&self.prefixed(key))
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.backend.put(&self.prefixed(key), value)
    }

    pub fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.backend.delete(&self.prefixed(key))
    }
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
