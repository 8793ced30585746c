use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AuthSettings;
use crate::queue::JobQueue;

/// Shared application state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub queue: Arc<dyn JobQueue>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(pool: SqlitePool, queue: Arc<dyn JobQueue>, auth: AuthSettings) -> Self {
        Self { pool, queue, auth }
    }
}
