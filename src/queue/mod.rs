//! # Job queue
//!
//! Request handlers hand email jobs to the broker through `JobQueue` and return
//! without waiting; the notification worker pulls them back out through
//! `JobSource`. Both sides only see the traits, so the broker can be Redis in
//! production and an in-process channel in development and tests.
//!
//! Delivery is fire-and-forget: nothing flows back to the enqueuing request.

mod memory;
mod redis_queue;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use memory::{MemoryQueue, MemorySource};
pub use redis_queue::RedisQueue;

/// Payload of the single job type: send one email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub enqueued_at: DateTime<Utc>,
}

impl EmailJob {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            enqueued_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("broker error: {0}")]
    Broker(String),
    #[error("malformed job payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("queue is closed")]
    Closed,
}

impl From<redis::RedisError> for QueueError {
    fn from(error: redis::RedisError) -> Self {
        QueueError::Broker(error.to_string())
    }
}

/// Producer side of the broker.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Hands `job` to the broker. Returns once the broker has accepted it,
    /// not once it has run.
    async fn enqueue(&self, job: &EmailJob) -> Result<(), QueueError>;
}

/// Consumer side of the broker.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Takes the oldest waiting job. Waits up to `wait` for one to arrive and
    /// returns `None` if none did.
    async fn next_job(&self, wait: Duration) -> Result<Option<EmailJob>, QueueError>;

    /// Parks a job that failed. The default drops it.
    async fn dead_letter(&self, job: &EmailJob, reason: &str) -> Result<(), QueueError> {
        log::warn!("dropping failed job {} ({})", job.id, reason);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_job_payload_shape() {
        let job = EmailJob::new("alice", "Contract for Ladder", "body");
        let json = serde_json::to_value(&job).unwrap();

        assert_eq!(json["recipient"], "alice");
        assert_eq!(json["subject"], "Contract for Ladder");
        assert_eq!(json["body"], "body");
        assert!(json["id"].is_string());
        assert!(json["enqueued_at"].is_string());
    }

    #[test]
    fn test_each_job_gets_its_own_id() {
        let a = EmailJob::new("alice", "s", "b");
        let b = EmailJob::new("alice", "s", "b");
        assert_ne!(a.id, b.id);
    }
}
