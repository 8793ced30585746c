//! In-process broker backed by a tokio channel.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use super::{EmailJob, JobQueue, JobSource, QueueError};

/// Sending half. Cheap to clone; every clone feeds the same `MemorySource`.
#[derive(Debug, Clone)]
pub struct MemoryQueue {
    sender: mpsc::UnboundedSender<EmailJob>,
}

/// Receiving half, handed to the worker.
#[derive(Debug)]
pub struct MemorySource {
    receiver: Mutex<mpsc::UnboundedReceiver<EmailJob>>,
}

impl MemoryQueue {
    pub fn channel() -> (MemoryQueue, MemorySource) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            MemoryQueue { sender },
            MemorySource {
                receiver: Mutex::new(receiver),
            },
        )
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, job: &EmailJob) -> Result<(), QueueError> {
        self.sender
            .send(job.clone())
            .map_err(|_| QueueError::Closed)
    }
}

#[async_trait]
impl JobSource for MemorySource {
    async fn next_job(&self, wait: Duration) -> Result<Option<EmailJob>, QueueError> {
        let mut receiver = self.receiver.lock().await;
        match tokio::time::timeout(wait, receiver.recv()).await {
            Ok(Some(job)) => Ok(Some(job)),
            Ok(None) => Err(QueueError::Closed),
            Err(_elapsed) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_jobs_come_out_in_order() {
        let (queue, source) = MemoryQueue::channel();
        let first = EmailJob::new("alice", "one", "b");
        let second = EmailJob::new("bob", "two", "b");

        queue.enqueue(&first).await.unwrap();
        queue.enqueue(&second).await.unwrap();

        assert_eq!(source.next_job(Duration::ZERO).await.unwrap(), Some(first));
        assert_eq!(source.next_job(Duration::ZERO).await.unwrap(), Some(second));
        assert_eq!(source.next_job(Duration::ZERO).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_waiting_source_wakes_on_enqueue() {
        let (queue, source) = MemoryQueue::channel();
        let job = EmailJob::new("alice", "late", "b");

        let sent = job.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            queue.enqueue(&sent).await.unwrap();
        });

        let started = std::time::Instant::now();
        let received = source.next_job(Duration::from_secs(5)).await.unwrap();
        assert_eq!(received, Some(job));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_enqueue_fails_once_source_is_gone() {
        let (queue, source) = MemoryQueue::channel();
        drop(source);

        let result = queue.enqueue(&EmailJob::new("alice", "s", "b")).await;
        assert!(matches!(result, Err(QueueError::Closed)));
    }

    #[tokio::test]
    async fn test_source_reports_closed_after_senders_drop() {
        let (queue, source) = MemoryQueue::channel();
        drop(queue);

        assert!(matches!(source.next_job(Duration::ZERO).await, Err(QueueError::Closed)));
    }
}
