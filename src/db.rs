//! SQLite connection pool and schema bootstrap.
//!
//! Tables are created with `CREATE TABLE IF NOT EXISTS` on startup. Foreign keys
//! are enforced on every connection; see the `ON DELETE` clauses below for the
//! delete policy of each reference.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        ipn TEXT UNIQUE,
        full_name TEXT,
        contacts TEXT,
        photo TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        photo TEXT,
        price_hour REAL,
        price_day REAL,
        price_week REAL,
        price_month REAL,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
        status TEXT NOT NULL DEFAULT 'available',
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS contracts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_num TEXT NOT NULL UNIQUE,
        text TEXT,
        start_date TEXT NOT NULL,
        end_date TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        leaser_id INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
        taker_id INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
        item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE RESTRICT
    )",
    "CREATE TABLE IF NOT EXISTS search_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        search_text TEXT NOT NULL,
        timestamp TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS favorites (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        UNIQUE (user_id, item_id)
    )",
    "CREATE TABLE IF NOT EXISTS feedback (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
        text TEXT,
        grade INTEGER NOT NULL CHECK (grade BETWEEN 1 AND 5),
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE RESTRICT,
        created_at TEXT NOT NULL,
        UNIQUE (author_id, contract_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_contracts_taker ON contracts(taker_id)",
    "CREATE INDEX IF NOT EXISTS idx_contracts_leaser ON contracts(leaser_id)",
    "CREATE INDEX IF NOT EXISTS idx_search_history_user ON search_history(user_id)",
];

/// Opens a pool for `database_url`, creating the database file if needed.
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options.connect_with(options).await
}

/// Creates every table and index that does not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    log::debug!("schema ready ({} statements)", SCHEMA.len());
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
