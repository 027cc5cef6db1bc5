// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tw - delayed task execution CLI, talking to `taskwheeld` over its Unix
//! socket.

mod client;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::DaemonClient;
use tw_core::JobType;
use tw_daemon::protocol::{JobArgs, Request, Response};
use tw_daemon::Config;

#[derive(Parser)]
#[command(name = "tw", version, about = "Delayed task execution CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a new job.
    Add {
        name: String,
        #[arg(long, value_enum, default_value = "cmd")]
        r#type: CliJobType,
        #[arg(long, default_value_t = 1)]
        retry: u32,
        #[arg(long)]
        interval: u64,
        /// Absolute unix time to fire at, overriding `--interval`.
        #[arg(long)]
        datetime: Option<i64>,
        #[arg(long)]
        limit_time: Option<i64>,
        /// Command line, script body, or `name@version` module id,
        /// depending on `--type`.
        extra: String,
    },
    /// Fetch a job's stored record.
    Get { id: u64 },
    /// Check whether a job is still scheduled in the wheel.
    Check { id: u64 },
    /// Remove a job.
    Delete { id: u64 },
    /// Fetch a job's most recent result, if any.
    Result { id: u64 },
    /// List registered modules.
    Modules,
    /// Check whether a module is registered.
    CheckModule { id: String },
}

#[derive(Clone, clap::ValueEnum)]
enum CliJobType {
    Cmd,
    Sh,
    Plugin,
}

impl From<CliJobType> for JobType {
    fn from(value: CliJobType) -> Self {
        match value {
            CliJobType::Cmd => JobType::Cmd,
            CliJobType::Sh => JobType::File,
            CliJobType::Plugin => JobType::Plugin,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let mut client = DaemonClient::connect(&config.socket_path).await?;

    let request = match cli.command {
        Commands::Add {
            name,
            r#type,
            retry,
            interval,
            datetime,
            limit_time,
            extra,
        } => Request::AddTask(JobArgs {
            name,
            job_type: r#type.into(),
            retry,
            interval,
            datetime,
            limit_time,
            extra: extra.into_bytes(),
        }),
        Commands::Get { id } => Request::GetTask { id },
        Commands::Check { id } => Request::CheckTask { id },
        Commands::Delete { id } => Request::DeleteTask { id },
        Commands::Result { id } => Request::GetResult { id },
        Commands::Modules => Request::ListModules,
        Commands::CheckModule { id } => Request::CheckModule { id },
    };

    let response = client.call_ok(request).await?;
    print_response(&response)?;
    Ok(())
}

fn print_response(response: &Response) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
