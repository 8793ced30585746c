//! Redis-backed broker.
//!
//! ## Key layout
//!
//! | Key | Type | Content |
//! |-----|------|---------|
//! | `{queue}` | list | waiting jobs as JSON, LPUSH in / RPOP out |
//! | `{queue}:dead` | list | jobs whose delivery failed, with the reason |

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use serde_json::json;

use super::{EmailJob, JobQueue, JobSource, QueueError};

#[derive(Clone)]
pub struct RedisQueue {
    conn: ConnectionManager,
    queue_name: String,
}

impl RedisQueue {
    /// Connects to `redis_url` and uses the list `queue_name`.
    pub async fn connect(redis_url: &str, queue_name: &str) -> Result<Self, QueueError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            queue_name: queue_name.to_string(),
        })
    }

    fn dead_letter_key(&self) -> String {
        format!("{}:dead", self.queue_name)
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    async fn enqueue(&self, job: &EmailJob) -> Result<(), QueueError> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.conn.clone();
        let _: () = conn.lpush(&self.queue_name, payload).await?;
        Ok(())
    }
}

#[async_trait]
impl JobSource for RedisQueue {
    async fn next_job(&self, wait: Duration) -> Result<Option<EmailJob>, QueueError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = redis::cmd("RPOP")
            .arg(&self.queue_name)
            .query_async(&mut conn)
            .await?;

        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => {
                // Polled rather than BRPOP so a blocked read never holds the
                // shared connection.
                tokio::time::sleep(wait).await;
                Ok(None)
            }
        }
    }

    async fn dead_letter(&self, job: &EmailJob, reason: &str) -> Result<(), QueueError> {
        let entry = json!({ "job": job, "reason": reason }).to_string();
        let mut conn = self.conn.clone();
        let _: () = conn.lpush(self.dead_letter_key(), entry).await?;
        Ok(())
    }
}
