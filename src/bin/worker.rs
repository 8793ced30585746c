//! Standalone notification worker.
//!
//! Consumes email jobs from the Redis list the server pushes to. With
//! `QUEUE_BACKEND=memory` the server runs its own worker and this binary has
//! nothing to consume.

use std::io;
use std::sync::Arc;

use rentdesk::config::{Config, QueueBackend};
use rentdesk::mail;
use rentdesk::queue::RedisQueue;
use rentdesk::worker::Worker;

#[tokio::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    if config.queue_backend != QueueBackend::Redis {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "rentdesk-worker needs QUEUE_BACKEND=redis",
        ));
    }

    let source = RedisQueue::connect(&config.redis_url, &config.queue_name)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let mailer = mail::mailer_from_config(&config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let worker = Worker::new(Arc::new(source), mailer, config.worker_poll_interval);

    log::info!("consuming jobs from redis list {}", config.queue_name);
    tokio::select! {
        _ = worker.run() => {}
        _ = tokio::signal::ctrl_c() => log::info!("shutting down notification worker"),
    }
    Ok(())
}
