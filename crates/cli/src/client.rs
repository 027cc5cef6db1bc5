// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A thin client over the daemon's Unix socket: one request in, one
//! response out, per call.

use anyhow::{bail, Result};
use std::path::Path;
use tokio::net::UnixStream;
use tw_daemon::protocol::{Request, Response};
use tw_daemon::wire::{read_frame, write_frame};

pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    pub async fn connect(socket_path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(socket_path).await.map_err(|err| {
            anyhow::anyhow!(
                "could not connect to taskwheeld at {}: {err} (is the daemon running?)",
                socket_path.display()
            )
        })?;
        Ok(Self { stream })
    }

    pub async fn call(&mut self, request: Request) -> Result<Response> {
        write_frame(&mut self.stream, &request).await?;
        let response = read_frame(&mut self.stream).await?;
        Ok(response)
    }

    /// Sends `request`, unwrapping an `Error` response into an `Err`.
    pub async fn call_ok(&mut self, request: Request) -> Result<Response> {
        match self.call(request).await? {
            Response::Error { message } => bail!(message),
            other => Ok(other),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
