// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! taskwheeld: background process that owns the time wheel and dispatches
//! due jobs. Listens on a Unix socket for commands from the `tw` CLI.

mod config;
mod lifecycle;
mod protocol;
mod server;
mod wire;

use tracing::info;

use crate::config::Config;
use crate::lifecycle::{startup, LifecycleError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("taskwheeld {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("taskwheeld {}", env!("CARGO_PKG_VERSION"));
                println!("Delayed task execution daemon.");
                println!();
                println!("USAGE:\n    taskwheeld");
                println!();
                println!("Normally started by the `tw` CLI, not invoked directly.");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: taskwheeld [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    let _log_guard = setup_logging(&config)?;

    info!(state_dir = %config.state_dir.display(), "starting taskwheeld");

    let daemon = match startup(&config).await {
        Ok(daemon) => daemon,
        Err(LifecycleError::AlreadyRunning(lock_path)) => {
            eprintln!(
                "taskwheeld is already running (lock held at {})",
                lock_path.display()
            );
            std::process::exit(1);
        }
        Err(err) => return Err(Box::new(err)),
    };

    let manager = std::sync::Arc::clone(&daemon.manager);
    tokio::select! {
        _ = server::serve(&daemon.listener, manager) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("received shutdown signal");
        }
    }

    daemon.shutdown()?;
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config
            .log_path
            .parent()
            .ok_or(crate::config::ConfigError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(crate::config::ConfigError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
