//! # Notification worker
//!
//! Pulls email jobs from a `JobSource` and delivers them with a `Mailer`.
//!
//! Each job moves through `Queued → Running → Succeeded | Failed` exactly once.
//! There is no retry: a failed job is logged, handed to the source's dead-letter
//! hook and forgotten. Failures never reach the request that enqueued the job.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::mail::Mailer;
use crate::queue::{EmailJob, JobSource, QueueError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }

    /// Whether `self → next` is a legal move.
    pub fn can_transition_to(self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Queued, JobState::Running)
                | (JobState::Running, JobState::Succeeded)
                | (JobState::Running, JobState::Failed)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal job transition {from} -> {to}")]
pub struct IllegalTransition {
    pub from: JobState,
    pub to: JobState,
}

/// One execution of a job and the state it has reached.
#[derive(Debug, Clone)]
pub struct JobRun {
    job_id: Uuid,
    state: JobState,
    error: Option<String>,
}

impl JobRun {
    pub fn new(job: &EmailJob) -> Self {
        Self {
            job_id: job.id,
            state: JobState::Queued,
            error: None,
        }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn transition(&mut self, next: JobState) -> Result<(), IllegalTransition> {
        if !self.state.can_transition_to(next) {
            return Err(IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        log::debug!("job {}: {} -> {}", self.job_id, self.state, next);
        self.state = next;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), IllegalTransition> {
        self.transition(JobState::Running)
    }

    pub fn succeed(&mut self) -> Result<(), IllegalTransition> {
        self.transition(JobState::Succeeded)
    }

    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), IllegalTransition> {
        self.transition(JobState::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }
}

pub struct Worker {
    source: Arc<dyn JobSource>,
    mailer: Arc<dyn Mailer>,
    poll_interval: Duration,
}

impl Worker {
    pub fn new(source: Arc<dyn JobSource>, mailer: Arc<dyn Mailer>, poll_interval: Duration) -> Self {
        Self {
            source,
            mailer,
            poll_interval,
        }
    }

    /// Executes one job and returns the finished run.
    pub async fn execute(&self, job: &EmailJob) -> JobRun {
        let mut run = JobRun::new(job);
        note_transition(job, run.start());

        match self.mailer.send(job).await {
            Ok(()) => {
                note_transition(job, run.succeed());
                log::info!("job {} delivered to {}", job.id, job.recipient);
            }
            Err(e) => {
                let reason = e.to_string();
                log::error!("job {} to {} failed: {}", job.id, job.recipient, reason);
                if let Err(dl_err) = self.source.dead_letter(job, &reason).await {
                    log::error!("job {} could not be dead-lettered: {}", job.id, dl_err);
                }
                note_transition(job, run.fail(reason));
            }
        }
        run
    }

    /// Takes and executes the next waiting job, if any.
    pub async fn run_once(&self) -> Result<Option<JobRun>, QueueError> {
        match self.source.next_job(self.poll_interval).await? {
            Some(job) => Ok(Some(self.execute(&job).await)),
            None => Ok(None),
        }
    }

    /// Runs until the source closes. Each fetch waits up to one poll interval
    /// for a job. Broker errors are logged and the loop backs off for one poll
    /// interval.
    pub async fn run(&self) {
        log::info!("notification worker started");
        loop {
            match self.run_once().await {
                Ok(_) => {}
                Err(QueueError::Closed) => {
                    log::info!("job source closed, notification worker stopping");
                    return;
                }
                Err(e) => {
                    log::error!("failed to fetch job: {}", e);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

/// Logs a step the run refused. `execute` only takes legal steps.
fn note_transition(job: &EmailJob, step: Result<(), IllegalTransition>) {
    if let Err(e) = step {
        log::error!("job {}: {}", job.id, e);
    }
}
