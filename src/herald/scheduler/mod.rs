// SPDX-License-Identifier: MIT

//! Fixed-interval job scheduler
//!
//! Each job runs on its own tokio task. The first run happens one full
//! period after the job is added; runs of the same job never overlap and
//! ticks missed while a run is in progress are skipped.

use crate::base::error::TaskError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Longest accepted period (one year)
pub const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A repeatable unit of work
pub type Job = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Wrap an async closure as a [`Job`]
pub fn job<F, Fut>(f: F) -> Job
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

struct ScheduledJob {
    period: Duration,
    job: Job,
    handle: JoinHandle<()>,
}

#[derive(Clone, Default)]
pub struct Scheduler {
    jobs: Arc<RwLock<HashMap<String, ScheduledJob>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `job` to run every `period` under `id`
    pub async fn add_job(&self, id: &str, period: Duration, job: Job) -> Result<(), TaskError> {
        check_period(period)?;

        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(id) {
            return Err(TaskError::Conflict(id.to_string()));
        }

        let handle = spawn_ticker(id.to_string(), period, job.clone());
        jobs.insert(
            id.to_string(),
            ScheduledJob {
                period,
                job,
                handle,
            },
        );
        log::debug!("Job {} scheduled every {:?}", id, period);
        Ok(())
    }

    /// Restart job `id` with a new period. The next run is one new period away.
    pub async fn reschedule_job(&self, id: &str, period: Duration) -> Result<(), TaskError> {
        check_period(period)?;

        let mut jobs = self.jobs.write().await;
        let scheduled = jobs
            .get_mut(id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;

        scheduled.handle.abort();
        scheduled.handle = spawn_ticker(id.to_string(), period, scheduled.job.clone());
        scheduled.period = period;
        log::debug!("Job {} rescheduled every {:?}", id, period);
        Ok(())
    }

    /// Cancel job `id`; a run already in progress is aborted
    pub async fn remove_job(&self, id: &str) -> Result<(), TaskError> {
        let mut jobs = self.jobs.write().await;
        let scheduled = jobs
            .remove(id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        scheduled.handle.abort();
        log::debug!("Job {} removed", id);
        Ok(())
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.jobs.read().await.contains_key(id)
    }

    pub async fn period(&self, id: &str) -> Option<Duration> {
        self.jobs.read().await.get(id).map(|j| j.period)
    }

    pub async fn job_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Abort every job
    pub async fn shutdown(&self) {
        let mut jobs = self.jobs.write().await;
        for (_, scheduled) in jobs.drain() {
            scheduled.handle.abort();
        }
    }
}

fn check_period(period: Duration) -> Result<(), TaskError> {
    if period.is_zero() {
        return Err(TaskError::invalid("interval", "must be positive integer"));
    }
    if period > MAX_PERIOD {
        return Err(TaskError::invalid(
            "interval",
            format!("must not exceed {} seconds", MAX_PERIOD.as_secs()),
        ));
    }
    Ok(())
}

fn spawn_ticker(id: String, period: Duration, job: Job) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            log::trace!("Running job {}", id);
            job().await;
        }
    })
}
