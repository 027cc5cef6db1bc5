use super::*;
use parking_lot::Mutex;
use std::sync::Arc;
use tw_adapters::FixedOutputModuleRunner;
use tw_core::{FakeClock, JobId, Module, Recorder};

fn executor(dir: &std::path::Path) -> Executor {
    let registry = Arc::new(ModuleRegistry::open(dir).unwrap());
    Executor::new(registry, Arc::new(FakeClock::new(1000)), dir.to_path_buf())
}

fn job(id: u64, job_type: JobType, extra: &[u8]) -> Job {
    Job::new(JobId(id), "job", job_type, 1, 5, 1000, None, extra.to_vec())
}

#[tokio::test]
async fn cmd_job_captures_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(dir.path());

    let result = executor
        .execute(&job(1, JobType::Cmd, b"echo -n done"))
        .await;

    assert!(result.is_success());
    assert_eq!(result.extra, b"done");
}

#[tokio::test]
async fn cmd_job_failure_is_recorded_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(dir.path());

    let result = executor.execute(&job(1, JobType::Cmd, b"exit 1")).await;

    assert!(!result.is_success());
    assert!(result.error_msg.contains("exit"));
}

#[tokio::test]
async fn file_job_persists_script_and_runs_it() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(dir.path());

    let result = executor
        .execute(&job(7, JobType::File, b"echo -n from-script"))
        .await;

    assert!(result.is_success());
    assert_eq!(result.extra, b"from-script");
    assert!(dir.path().join("7.sh").exists());
}

#[tokio::test]
async fn plugin_job_runs_the_registered_module() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ModuleRegistry::open(dir.path()).unwrap());

    std::fs::write(dir.path().join("greet@1.0.0.task"), r#"{"command": "true"}"#).unwrap();
    registry.reconcile(&tw_adapters::FsEvent {
        kind: tw_adapters::FsEventKind::Created,
        file: "greet@1.0.0.task".to_string(),
    });

    let executor = Executor::new(
        Arc::clone(&registry),
        Arc::new(FakeClock::new(0)),
        dir.path().to_path_buf(),
    );
    let result = executor
        .execute(&job(1, JobType::Plugin, b"greet@1.0.0"))
        .await;
    assert!(result.is_success());
}

#[tokio::test]
async fn unknown_plugin_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(dir.path());

    let result = executor
        .execute(&job(1, JobType::Plugin, b"missing@1.0.0"))
        .await;

    assert!(!result.is_success());
    assert!(result.error_msg.contains("unknown module"));
}

#[tokio::test]
async fn cmd_job_retries_until_it_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(dir.path());
    let counter = dir.path().join("attempts");

    let mut j = job(
        1,
        JobType::Cmd,
        format!(
            "c=$(cat {0} 2>/dev/null || echo 0); c=$((c+1)); echo $c > {0}; test $c -ge 2",
            counter.display()
        )
        .as_bytes(),
    );
    j.retry = 3;

    let result = executor.execute(&j).await;
    assert!(result.is_success());
    assert_eq!(std::fs::read_to_string(&counter).unwrap().trim(), "2");
}

#[tokio::test]
async fn cmd_job_exhausts_retries_and_surfaces_the_last_error() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(dir.path());

    let mut j = job(1, JobType::Cmd, b"exit 1");
    j.retry = 2;

    let result = executor.execute(&j).await;
    assert!(!result.is_success());
    assert!(result.error_msg.contains("exit"));
}

#[tokio::test]
async fn file_job_retries_until_it_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(dir.path());
    let counter = dir.path().join("attempts");

    let mut j = job(
        9,
        JobType::File,
        format!(
            "c=$(cat {0} 2>/dev/null || echo 0); c=$((c+1)); echo $c > {0}; test $c -ge 2",
            counter.display()
        )
        .as_bytes(),
    );
    j.retry = 3;

    let result = executor.execute(&j).await;
    assert!(result.is_success());
}

#[tokio::test]
async fn an_elapsed_limit_time_bounds_execution_to_an_immediate_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ModuleRegistry::open(dir.path()).unwrap());
    let executor = Executor::new(
        registry,
        Arc::new(FakeClock::new(1000)),
        dir.path().to_path_buf(),
    );

    let mut j = job(1, JobType::Cmd, b"sleep 1");
    j.limit_time = Some(1000);

    let result = executor.execute(&j).await;
    assert!(!result.is_success());
    assert!(result.error_msg.contains("timed out"));
}

struct RecordingRecorder(Mutex<Vec<(JobType, bool)>>);

impl Recorder for RecordingRecorder {
    fn record(&self, job_type: JobType, succeeded: bool, _elapsed_secs: f64) {
        self.0.lock().push((job_type, succeeded));
    }
}

#[tokio::test]
async fn execute_reports_outcome_to_the_recorder() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ModuleRegistry::open(dir.path()).unwrap());
    let recorder = Arc::new(RecordingRecorder(Mutex::new(Vec::new())));
    let executor = Executor::with_recorder(
        registry,
        Arc::new(FakeClock::new(0)),
        dir.path().to_path_buf(),
        Arc::clone(&recorder) as Arc<dyn Recorder>,
    );

    executor.execute(&job(1, JobType::Cmd, b"true")).await;
    executor.execute(&job(2, JobType::Cmd, b"exit 1")).await;

    assert_eq!(
        *recorder.0.lock(),
        vec![(JobType::Cmd, true), (JobType::Cmd, false)]
    );
}

#[tokio::test]
async fn module_retry_exhausted_surfaces_last_error() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ModuleRegistry::open(dir.path()).unwrap());
    let module = Module::new(
        "flaky",
        "1.0.0",
        Arc::new(FixedOutputModuleRunner {
            output: Err("boom".to_string()),
        }),
    );
    registry.insert_for_test(module);

    let executor = Executor::new(
        Arc::clone(&registry),
        Arc::new(FakeClock::new(0)),
        dir.path().to_path_buf(),
    );
    let mut j = job(1, JobType::Plugin, b"flaky@1.0.0");
    j.retry = 2;
    let result = executor.execute(&j).await;
    assert_eq!(result.error_msg, "boom");
}
