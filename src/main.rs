use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use rentdesk::auth::{AuthMiddleware, AuthSettings};
use rentdesk::config::{Config, QueueBackend};
use rentdesk::queue::{JobQueue, MemoryQueue, RedisQueue};
use rentdesk::worker::Worker;
use rentdesk::{db, mail, routes, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = db::connect(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    db::init_schema(&pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let queue: Arc<dyn JobQueue> = match config.queue_backend {
        QueueBackend::Redis => {
            let queue = RedisQueue::connect(&config.redis_url, &config.queue_name)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            log::info!("email jobs go to redis list {}", config.queue_name);
            Arc::new(queue)
        }
        QueueBackend::Memory => {
            // No separate worker process in this mode; run it on this runtime.
            let (queue, source) = MemoryQueue::channel();
            let mailer = mail::mailer_from_config(&config)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let worker = Worker::new(Arc::new(source), mailer, config.worker_poll_interval);
            tokio::spawn(async move { worker.run().await });
            log::info!("email jobs are processed in-process");
            Arc::new(queue)
        }
    };

    let state = web::Data::new(AppState::new(
        pool,
        queue,
        AuthSettings {
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: chrono::Duration::hours(config.token_ttl_hours),
            bcrypt_cost: config.bcrypt_cost,
        },
    ));

    log::info!("Starting rentdesk server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
