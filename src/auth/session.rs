//! Server-side sessions.
//!
//! A bearer token is honored only while the session row it names exists and
//! has not expired. Logging out deletes the row, which invalidates the token
//! even though its signature and `exp` are still valid.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use super::token::{generate_token, verify_token};
use crate::error::AppError;

/// Secrets and cost factors shared by every authentication operation.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

/// The identity a request runs as, resolved from its bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub session_id: String,
}

#[derive(Debug, FromRow)]
struct SessionRow {
    user_id: i64,
    username: String,
    expires_at: DateTime<Utc>,
}

/// Opens a session for `user_id` and returns the signed token bound to it.
pub async fn create_session(
    pool: &SqlitePool,
    settings: &AuthSettings,
    user_id: i64,
) -> Result<String, AppError> {
    let session_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let expires_at = now + settings.token_ttl;

    sqlx::query("INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)")
        .bind(&session_id)
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .execute(pool)
        .await?;

    generate_token(user_id, &session_id, expires_at, &settings.jwt_secret)
}

/// Resolves a bearer token into the user it authenticates.
///
/// Fails with `Unauthorized` when the token is invalid, the session was
/// closed, or the session belongs to another user than the token claims.
pub async fn authenticate(
    pool: &SqlitePool,
    settings: &AuthSettings,
    token: &str,
) -> Result<AuthenticatedUser, AppError> {
    let claims = verify_token(token, &settings.jwt_secret)?;

    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT s.user_id, u.username, s.expires_at
         FROM sessions s JOIN users u ON u.id = s.user_id
         WHERE s.id = $1",
    )
    .bind(&claims.sid)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Session has ended".into()))?;

    if row.user_id != claims.sub {
        return Err(AppError::Unauthorized("Session does not match token".into()));
    }
    if row.expires_at <= Utc::now() {
        return Err(AppError::Unauthorized("Session has expired".into()));
    }

    Ok(AuthenticatedUser {
        id: row.user_id,
        username: row.username,
        session_id: claims.sid,
    })
}

/// Closes a session. Closing an already closed session is not an error.
pub async fn end_session(pool: &SqlitePool, session_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(())
}
