// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Accepts connections on the daemon's Unix socket and dispatches each
//! framed [`Request`] to the [`TaskManager`].

use crate::protocol::{
    AddTaskReply, CheckModuleReply, CheckTaskReply, ListModulesReply, Request, Response,
};
use crate::wire::{read_frame, write_frame, WireError};
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tw_core::JobId;
use tw_engine::TaskManager;

pub async fn serve(listener: &UnixListener, manager: Arc<TaskManager>) {
    loop {
        let (stream, _addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                tracing::error!(error = %err, "failed to accept connection");
                continue;
            }
        };
        let manager = Arc::clone(&manager);
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, manager).await {
                tracing::debug!(error = %err, "connection ended");
            }
        });
    }
}

async fn handle_connection(
    mut stream: UnixStream,
    manager: Arc<TaskManager>,
) -> Result<(), WireError> {
    loop {
        let request: Request = match read_frame(&mut stream).await {
            Ok(req) => req,
            Err(WireError::Closed) => return Ok(()),
            Err(err) => return Err(err),
        };
        let response = dispatch(&manager, request).await;
        write_frame(&mut stream, &response).await?;
    }
}

async fn dispatch(manager: &TaskManager, request: Request) -> Response {
    match request {
        Request::AddTask(args) => {
            match manager
                .add_task(
                    args.name,
                    args.job_type,
                    args.retry,
                    args.interval,
                    args.datetime,
                    args.limit_time,
                    args.extra,
                )
                .await
            {
                Ok(id) => Response::AddTask(AddTaskReply::from(id)),
                Err(err) => error_response(err),
            }
        }
        Request::GetTask { id } => match manager.get_task(JobId(id)) {
            Ok(task) => Response::GetTask { task },
            Err(err) => error_response(err),
        },
        Request::CheckTask { id } => match manager.check_task(JobId(id)) {
            Ok(scheduled) => Response::CheckTask(CheckTaskReply { scheduled }),
            Err(err) => error_response(err),
        },
        Request::DeleteTask { id } => match manager.delete_task(JobId(id)) {
            Ok(()) => Response::DeleteTask,
            Err(err) => error_response(err),
        },
        Request::GetResult { id } => match manager.get_result(JobId(id)) {
            Ok(result) => Response::GetResult { result },
            Err(err) => error_response(err),
        },
        Request::ListModules => Response::ListModules(ListModulesReply {
            modules: manager.list_modules(),
        }),
        Request::CheckModule { id } => Response::CheckModule(CheckModuleReply {
            registered: manager.check_module(&id),
        }),
    }
}

fn error_response(err: impl std::fmt::Display) -> Response {
    Response::Error {
        message: err.to_string(),
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
