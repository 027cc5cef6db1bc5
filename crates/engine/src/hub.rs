// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fans out results and newly added jobs to subscribers, each with their
//! own client-side filter.

use crate::feed::{Feed, Subscription};
use std::collections::HashSet;
use tw_core::{Job, JobId, JobResult};

/// Matches the reference implementation's per-subscription buffer depth.
const FEED_CAPACITY: usize = 128;

/// Which results a subscriber wants. `ids.is_empty()` means "all results".
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    pub ids: HashSet<JobId>,
}

impl ResultFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(ids: impl IntoIterator<Item = JobId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    fn matches(&self, result: &JobResult) -> bool {
        self.ids.is_empty() || self.ids.contains(&result.id)
    }
}

/// Which newly added jobs a subscriber wants. `names.is_empty()` means
/// "all jobs".
#[derive(Debug, Clone, Default)]
pub struct NewTaskFilter {
    pub names: HashSet<String>,
}

impl NewTaskFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    fn matches(&self, job: &Job) -> bool {
        self.names.is_empty() || self.names.contains(&job.name)
    }
}

pub struct ResultSubscription {
    inner: Subscription<JobResult>,
    filter: ResultFilter,
}

impl ResultSubscription {
    pub async fn recv(&mut self) -> Option<JobResult> {
        loop {
            let result = self.inner.recv().await?;
            if self.filter.matches(&result) {
                return Some(result);
            }
        }
    }
}

pub struct NewTaskSubscription {
    inner: Subscription<Job>,
    filter: NewTaskFilter,
}

impl NewTaskSubscription {
    pub async fn recv(&mut self) -> Option<Job> {
        loop {
            let job = self.inner.recv().await?;
            if self.filter.matches(&job) {
                return Some(job);
            }
        }
    }
}

/// Owns the two feeds the manager publishes to: completed results and
/// newly added jobs.
pub struct SubscriptionHub {
    results: Feed<JobResult>,
    new_tasks: Feed<Job>,
}

impl Default for SubscriptionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self {
            results: Feed::new(FEED_CAPACITY),
            new_tasks: Feed::new(FEED_CAPACITY),
        }
    }

    pub async fn publish_result(&self, result: JobResult) {
        self.results.publish(result).await;
    }

    pub async fn publish_new_task(&self, job: Job) {
        self.new_tasks.publish(job).await;
    }

    pub fn subscribe_results(&self, filter: ResultFilter) -> ResultSubscription {
        ResultSubscription {
            inner: self.results.subscribe(),
            filter,
        }
    }

    pub fn subscribe_new_tasks(&self, filter: NewTaskFilter) -> NewTaskSubscription {
        NewTaskSubscription {
            inner: self.new_tasks.subscribe(),
            filter,
        }
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
