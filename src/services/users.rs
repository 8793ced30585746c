use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::session::{create_session, end_session};
use crate::auth::{
    hash_password, verify_password, AuthResponse, AuthSettings, AuthenticatedUser, LoginRequest,
    RegisterRequest,
};
use crate::error::AppError;
use crate::models::{Profile, ProfileUpdate, User};
use crate::services::items;

const USER_COLUMNS: &str =
    "id, username, password_hash, ipn, full_name, contacts, photo, created_at";

/// Creates an account with a bcrypt-hashed password.
///
/// Fails with `Conflict` if the username (or the national id) is taken.
pub async fn register(
    pool: &SqlitePool,
    settings: &AuthSettings,
    input: RegisterRequest,
) -> Result<User, AppError> {
    input.validate()?;

    let existing = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE username = $1")
        .bind(&input.username)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let password_hash = hash_password(&input.password, settings.bcrypt_cost)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, password_hash, ipn, full_name, contacts, photo, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&input.username)
    .bind(&password_hash)
    .bind(&input.ipn)
    .bind(&input.full_name)
    .bind(&input.contacts)
    .bind(&input.photo)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    log::info!("registered user {} ({})", user.id, user.username);
    Ok(user)
}

/// Checks credentials and opens a session.
///
/// Unknown usernames and wrong passwords fail the same way, and neither
/// creates a session.
pub async fn login(
    pool: &SqlitePool,
    settings: &AuthSettings,
    input: LoginRequest,
) -> Result<AuthResponse, AppError> {
    input.validate()?;

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(&input.username)
    .fetch_optional(pool)
    .await?;

    match user {
        Some(user) if verify_password(&input.password, &user.password_hash)? => {
            let token = create_session(pool, settings, user.id).await?;
            log::info!("user {} logged in", user.username);
            Ok(AuthResponse {
                token,
                user_id: user.id,
            })
        }
        _ => Err(AppError::Unauthorized("Invalid username or password".into())),
    }
}

/// Ends the caller's session; the token it was presented with stops working.
pub async fn logout(pool: &SqlitePool, caller: &AuthenticatedUser) -> Result<(), AppError> {
    end_session(pool, &caller.session_id).await?;
    log::info!("user {} logged out", caller.username);
    Ok(())
}

pub async fn find_user(pool: &SqlitePool, user_id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// The caller's account together with the items they rent out.
pub async fn profile(pool: &SqlitePool, caller: &AuthenticatedUser) -> Result<Profile, AppError> {
    let user = find_user(pool, caller.id).await?;
    let items = items::list_owned(pool, caller.id).await?;
    Ok(Profile { user, items })
}

pub async fn update_profile(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
    update: ProfileUpdate,
) -> Result<User, AppError> {
    update.validate()?;

    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET
            ipn = COALESCE($1, ipn),
            full_name = COALESCE($2, full_name),
            contacts = COALESCE($3, contacts),
            photo = COALESCE($4, photo)
         WHERE id = $5
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&update.ipn)
    .bind(&update.full_name)
    .bind(&update.contacts)
    .bind(&update.photo)
    .bind(caller.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))
}
