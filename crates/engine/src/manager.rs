// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task manager: owns the time wheel, the persisted task/result tables,
//! and the background loop that ticks the wheel and executes due jobs.

use crate::error::ManagerError;
use crate::executor::Executor;
use crate::hub::{NewTaskFilter, NewTaskSubscription, ResultFilter, ResultSubscription, SubscriptionHub};
use crate::registry::ModuleRegistry;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tw_core::module::{module_id, parse_module_basename};
use tw_core::time_wheel::{DEFAULT_INTERVAL_SECS, DEFAULT_SLOT_NUM};
use tw_core::{Clock, Error as CoreError, IdGen, Job, JobId, JobResult, JobType, ModuleId, TimeWheel};
use tw_storage::{KvStore, ResultTable, TaskTable};

/// Orchestrates task persistence, scheduling, execution, and fan-out.
/// `start`/`stop` control the background tick loop; every other method works
/// whether or not the loop is running, except [`Self::add_task`], which
/// requires a running manager: scheduling work onto a wheel that isn't
/// ticking would silently strand it.
pub struct TaskManager {
    tasks: TaskTable,
    results: ResultTable,
    wheel: Mutex<TimeWheel>,
    registry: Arc<ModuleRegistry>,
    executor: Executor,
    script_dir: PathBuf,
    hub: Arc<SubscriptionHub>,
    ids: Arc<dyn IdGen>,
    clock: Arc<dyn Clock>,
    running: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        backend: Arc<dyn KvStore>,
        registry: Arc<ModuleRegistry>,
        script_dir: PathBuf,
        ids: Arc<dyn IdGen>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tasks = TaskTable::new(Arc::clone(&backend));
        let results = ResultTable::new(backend);
        let wheel = Mutex::new(TimeWheel::new(DEFAULT_INTERVAL_SECS, DEFAULT_SLOT_NUM));
        let executor = Executor::new(Arc::clone(&registry), Arc::clone(&clock), script_dir.clone());
        Self {
            tasks,
            results,
            wheel,
            registry,
            executor,
            script_dir,
            hub: Arc::new(SubscriptionHub::new()),
            ids,
            clock,
            running: AtomicBool::new(false),
            handle: Mutex::new(None),
        }
    }

    /// Starts the background tick loop. Idempotent-unsafe: calling twice
    /// without an intervening `stop` errors.
    pub fn start(self: &Arc<Self>) -> Result<(), ManagerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ManagerError::AlreadyRunning);
        }
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.run_loop().await });
        *self.handle.lock() = Some(handle);
        Ok(())
    }

    pub fn stop(&self) -> Result<(), ManagerError> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(ManagerError::NotRunning);
        }
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn run_loop(self: Arc<Self>) {
        let interval_secs = self.wheel.lock().interval_secs();
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                return;
            }
            let due = self.wheel.lock().trigger();
            for id in due {
                let this = Arc::clone(&self);
                tokio::spawn(async move { this.run_due_job(id).await });
            }
        }
    }

    async fn run_due_job(&self, id: JobId) {
        let job = match self.tasks.get(id) {
            Ok(Some(job)) => job,
            Ok(None) => return,
            Err(err) => {
                tracing::error!(job = %id, error = %err, "failed to load due job");
                return;
            }
        };

        let result = self.executor.execute(&job).await;
        if let Err(err) = self.results.put(&result) {
            tracing::error!(job = %id, error = %err, "failed to persist result");
        }
        self.hub.publish_result(result).await;

        // Jobs fire exactly once: the wheel has already dropped this entry
        // on trigger, so the record just needs cleaning up.
        if let Err(err) = self.tasks.delete(id) {
            tracing::error!(job = %id, error = %err, "failed to delete fired job");
        }
    }

    /// Validates `name`/`job_type`/`extra` (and, for a `datetime`-scheduled
    /// job, the datetime itself) before any uuid is assigned or persistence
    /// is attempted, so a rejected `AddTask` leaves no trace and emits no
    /// event.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_task(
        &self,
        name: impl Into<String>,
        job_type: JobType,
        retry: u32,
        interval: u64,
        datetime: Option<i64>,
        limit_time: Option<i64>,
        extra: Vec<u8>,
    ) -> Result<JobId, ManagerError> {
        if !self.is_running() {
            return Err(ManagerError::NotRunning);
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ManagerError::Core(CoreError::InvalidTaskName));
        }

        let extra = match job_type {
            JobType::Cmd | JobType::File => {
                if extra.is_empty() {
                    return Err(ManagerError::Core(CoreError::InvalidParameter));
                }
                extra
            }
            JobType::Plugin => {
                let raw = String::from_utf8_lossy(&extra);
                let (plugin_name, version) = parse_module_basename(raw.trim());
                let id = module_id(&plugin_name, &version);
                if !self.registry.has(&id) {
                    return Err(ManagerError::Core(CoreError::InvalidPluginName(id)));
                }
                id.into_bytes()
            }
        };

        let interval = match datetime {
            Some(at) => {
                let now = self.clock.now_unix();
                if at <= now {
                    return Err(ManagerError::Core(CoreError::InvalidDatetime));
                }
                (at - now) as u64
            }
            None => interval,
        };

        let id = JobId(self.ids.next());
        let job = Job::new(
            id,
            name,
            job_type,
            retry,
            interval,
            self.clock.now_unix(),
            limit_time,
            extra,
        );
        self.tasks.put(&job)?;
        self.wheel.lock().insert(job.interval, id);
        self.hub.publish_new_task(job).await;
        Ok(id)
    }

    pub fn get_task(&self, id: JobId) -> Result<Option<Job>, ManagerError> {
        Ok(self.tasks.get(id)?)
    }

    /// A task is considered scheduled only when both its record and its
    /// wheel entry exist — a fired one-shot job's record may briefly
    /// outlive its wheel entry, but it is no longer "scheduled".
    pub fn check_task(&self, id: JobId) -> Result<bool, ManagerError> {
        Ok(self.tasks.has(id)? && self.wheel.lock().check(id))
    }

    pub fn delete_task(&self, id: JobId) -> Result<(), ManagerError> {
        let job = self
            .tasks
            .get(id)?
            .ok_or(ManagerError::Core(CoreError::NoTask))?;
        self.wheel.lock().delete(id);
        self.tasks.delete(id)?;

        if job.job_type == JobType::File {
            let path = self.script_dir.join(format!("{id}.sh"));
            if let Err(err) = std::fs::remove_file(&path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(job = %id, error = %err, "failed to remove job script");
                }
            }
        }
        Ok(())
    }

    pub fn get_result(&self, id: JobId) -> Result<Option<JobResult>, ManagerError> {
        Ok(self.results.get(id)?)
    }

    pub fn list_modules(&self) -> Vec<ModuleId> {
        self.registry.list()
    }

    pub fn check_module(&self, id: &str) -> bool {
        self.registry.has(id)
    }

    pub fn subscribe_results(&self, filter: ResultFilter) -> ResultSubscription {
        self.hub.subscribe_results(filter)
    }

    pub fn subscribe_new_tasks(&self, filter: NewTaskFilter) -> NewTaskSubscription {
        self.hub.subscribe_new_tasks(filter)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
