// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level integration tests: the crates wired together the way
//! `tw-daemon` wires them, exercising scheduling, execution, persistence
//! across a restart, and module hot-reload end to end.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tw_core::{FakeClock, IdGen, JobId, JobType};
use tw_engine::{ModuleRegistry, ResultFilter, TaskManager};
use tw_storage::{KvStore, LogKvStore};

struct SeqIds(AtomicU64);
impl SeqIds {
    fn new() -> Self {
        Self(AtomicU64::new(1))
    }
}
impl IdGen for SeqIds {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

fn build_manager(
    backend: Arc<dyn KvStore>,
    modules_dir: &std::path::Path,
) -> Arc<TaskManager> {
    let registry = Arc::new(ModuleRegistry::open(modules_dir).unwrap());
    Arc::new(TaskManager::new(
        backend,
        registry,
        modules_dir.to_path_buf(),
        Arc::new(SeqIds::new()),
        Arc::new(FakeClock::new(1_700_000_000)),
    ))
}

#[tokio::test]
async fn a_due_cmd_job_executes_and_its_result_is_retrievable() {
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn KvStore> = Arc::new(LogKvStore::in_memory());
    let manager = build_manager(backend, dir.path());
    let mut results = manager.subscribe_results(ResultFilter::all());
    manager.start().unwrap();

    let id = manager
        .add_task(
            "echo-job",
            JobType::Cmd,
            1,
            1,
            None,
            None,
            b"echo -n hi".to_vec(),
        )
        .await
        .unwrap();

    let published = tokio::time::timeout(std::time::Duration::from_secs(5), results.recv())
        .await
        .expect("result published within 5s")
        .expect("subscription open");
    assert_eq!(published.id, id);
    assert!(published.is_success());

    let stored = manager.get_result(id).unwrap().expect("result persisted");
    assert_eq!(stored.extra, b"hi");
    manager.stop().unwrap();
}

#[tokio::test]
async fn deleting_a_task_stops_it_from_firing() {
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn KvStore> = Arc::new(LogKvStore::in_memory());
    let manager = build_manager(backend, dir.path());
    let mut results = manager.subscribe_results(ResultFilter::all());
    manager.start().unwrap();

    let id = manager
        .add_task(
            "never-fires",
            JobType::Cmd,
            1,
            2,
            None,
            None,
            b"true".to_vec(),
        )
        .await
        .unwrap();
    manager.delete_task(id).unwrap();

    let outcome = tokio::time::timeout(std::time::Duration::from_secs(3), results.recv()).await;
    assert!(outcome.is_err(), "a deleted job must not publish a result");
    manager.stop().unwrap();
}

#[tokio::test]
async fn task_records_survive_a_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("tasks.log");
    let id;
    {
        let backend: Arc<dyn KvStore> = Arc::new(LogKvStore::open(&data_path).unwrap());
        let manager = build_manager(backend, dir.path());
        manager.start().unwrap();
        id = manager
            .add_task(
                "durable",
                JobType::Cmd,
                1,
                3600,
                None,
                None,
                b"true".to_vec(),
            )
            .await
            .unwrap();
        manager.stop().unwrap();
    }
    {
        let backend: Arc<dyn KvStore> = Arc::new(LogKvStore::open(&data_path).unwrap());
        let manager = build_manager(backend, dir.path());
        let job = manager.get_task(id).unwrap().expect("job survived restart");
        assert_eq!(job.name, "durable");
    }
}

#[tokio::test]
async fn a_newly_dropped_module_file_is_registered_without_restarting() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ModuleRegistry::open(dir.path()).unwrap());
    assert!(registry.list().is_empty());

    let watcher = tw_adapters::FsWatcher::watch(dir.path()).unwrap();
    let watch_handle = Arc::clone(&registry).spawn_watch(watcher);

    std::fs::write(
        dir.path().join("greet@1.0.0.task"),
        r#"{"command": "echo -n hi"}"#,
    )
    .unwrap();

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while !registry.has("greet@1.0.0") && std::time::Instant::now() < deadline {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(registry.has("greet@1.0.0"));
    watch_handle.abort();
}

#[tokio::test]
async fn plugin_job_runs_through_the_registry_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("greet@1.0.0.task"),
        r#"{"command": "echo -n hello-from-module"}"#,
    )
    .unwrap();

    let backend: Arc<dyn KvStore> = Arc::new(LogKvStore::in_memory());
    let manager = build_manager(backend, dir.path());
    let mut results = manager.subscribe_results(ResultFilter::all());
    manager.start().unwrap();

    manager
        .add_task(
            "greet",
            JobType::Plugin,
            1,
            1,
            None,
            None,
            b"greet@1.0.0".to_vec(),
        )
        .await
        .unwrap();

    let result = tokio::time::timeout(std::time::Duration::from_secs(5), results.recv())
        .await
        .expect("module result published")
        .expect("subscription open");
    assert!(result.is_success());
    assert_eq!(result.extra, b"hello-from-module");
    manager.stop().unwrap();
}

#[tokio::test]
async fn job_results_are_never_removed_by_delete_task() {
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn KvStore> = Arc::new(LogKvStore::in_memory());
    let manager = build_manager(backend, dir.path());
    let mut results = manager.subscribe_results(ResultFilter::all());
    manager.start().unwrap();

    let id = manager
        .add_task(
            "one-shot",
            JobType::Cmd,
            1,
            1,
            None,
            None,
            b"true".to_vec(),
        )
        .await
        .unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), results.recv())
        .await
        .unwrap();

    // Delete after the result already landed; the result must remain.
    let _ = manager.delete_task(id);
    assert!(manager.get_result(id).unwrap().is_some());
    manager.stop().unwrap();
}

#[test]
fn job_id_ordering_survives_big_endian_persistence() {
    let ids = [1u64, 2, 255, 256, u64::MAX];
    let mut encoded: Vec<[u8; 8]> = ids.iter().map(|&i| JobId(i).to_be_bytes()).collect();
    encoded.sort();
    let decoded: Vec<u64> = encoded
        .into_iter()
        .map(|b| JobId::from_be_bytes(b).0)
        .collect();
    let mut sorted_ids = ids.to_vec();
    sorted_ids.sort();
    assert_eq!(decoded, sorted_ids);
}
