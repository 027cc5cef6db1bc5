use super::*;
use tw_core::JobType;
use tw_daemon::protocol::JobArgs;
use tw_daemon::{server, Config};

async fn test_daemon(dir: &std::path::Path) -> tw_daemon::Daemon {
    let config = Config {
        state_dir: dir.to_path_buf(),
        socket_path: dir.join("taskwheeld.sock"),
        lock_path: dir.join("taskwheeld.pid"),
        log_path: dir.join("taskwheeld.log"),
        data_path: dir.join("tasks.log"),
        modules_path: dir.join("modules"),
        scripts_path: dir.join("scripts"),
    };
    tw_daemon::startup(&config).await.unwrap()
}

#[tokio::test]
async fn add_task_round_trips_through_the_client() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = test_daemon(dir.path()).await;
    let manager = std::sync::Arc::clone(&daemon.manager);

    tokio::select! {
        _ = server::serve(&daemon.listener, manager) => unreachable!("serve loops forever"),
        result = async {
            let mut client = DaemonClient::connect(&daemon.config.socket_path).await?;
            client
                .call_ok(Request::AddTask(JobArgs {
                    name: "job".to_string(),
                    job_type: JobType::Cmd,
                    retry: 1,
                    interval: 60,
                    datetime: None,
                    limit_time: None,
                    extra: b"true".to_vec(),
                }))
                .await
        } => {
            let resp = result.unwrap();
            assert!(matches!(resp, Response::AddTask(_)));
        }
    }
}

#[tokio::test]
async fn connecting_to_a_missing_socket_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DaemonClient::connect(&dir.path().join("nope.sock"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("is the daemon running"));
}
