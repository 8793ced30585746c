//! Favorites and feedback.

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{Favorite, Feedback, FeedbackInput, Item};
use crate::services::contracts::find_contract;
use crate::services::items::{find_item, ITEM_COLUMNS};

const FEEDBACK_COLUMNS: &str = "id, author_id, user_id, text, grade, contract_id, created_at";

/// Marks an item as a favorite of the caller. Marking it twice is a no-op.
pub async fn add_favorite(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
    item_id: i64,
) -> Result<Favorite, AppError> {
    find_item(pool, item_id).await?;

    sqlx::query("INSERT OR IGNORE INTO favorites (user_id, item_id) VALUES ($1, $2)")
        .bind(caller.id)
        .bind(item_id)
        .execute(pool)
        .await?;

    let favorite = sqlx::query_as::<_, Favorite>(
        "SELECT id, user_id, item_id FROM favorites WHERE user_id = $1 AND item_id = $2",
    )
    .bind(caller.id)
    .bind(item_id)
    .fetch_one(pool)
    .await?;
    Ok(favorite)
}

pub async fn remove_favorite(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
    item_id: i64,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND item_id = $2")
        .bind(caller.id)
        .bind(item_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Item is not among your favorites".into()));
    }
    Ok(())
}

/// Items the caller marked, in the order they were marked.
pub async fn list_favorites(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
) -> Result<Vec<Item>, AppError> {
    let columns = ITEM_COLUMNS
        .split(", ")
        .map(|c| format!("i.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    let items = sqlx::query_as::<_, Item>(&format!(
        "SELECT {columns} FROM favorites f JOIN items i ON i.id = f.item_id
         WHERE f.user_id = $1 ORDER BY f.id"
    ))
    .bind(caller.id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Records the caller's feedback about the other party of a contract.
pub async fn leave_feedback(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
    contract_id: i64,
    input: FeedbackInput,
) -> Result<Feedback, AppError> {
    input.validate()?;
    let contract = find_contract(pool, contract_id).await?;

    let target = if caller.id == contract.leaser_id {
        contract.taker_id
    } else if caller.id == contract.taker_id {
        contract.leaser_id
    } else {
        return Err(AppError::Forbidden(
            "Only parties of the contract can leave feedback".into(),
        ));
    };

    let existing = sqlx::query_as::<_, (i64,)>(
        "SELECT id FROM feedback WHERE author_id = $1 AND contract_id = $2",
    )
    .bind(caller.id)
    .bind(contract_id)
    .fetch_optional(pool)
    .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Feedback for this contract was already left".into(),
        ));
    }

    let feedback = sqlx::query_as::<_, Feedback>(&format!(
        "INSERT INTO feedback (author_id, user_id, text, grade, contract_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {FEEDBACK_COLUMNS}"
    ))
    .bind(caller.id)
    .bind(target)
    .bind(&input.text)
    .bind(input.grade)
    .bind(contract_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    log::info!(
        "user {} left grade {} for user {} on contract {}",
        caller.username,
        feedback.grade,
        target,
        contract.contract_num
    );
    Ok(feedback)
}

/// Feedback received by `user_id`, newest first.
pub async fn list_feedback(pool: &SqlitePool, user_id: i64) -> Result<Vec<Feedback>, AppError> {
    let feedback = sqlx::query_as::<_, Feedback>(&format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE user_id = $1 ORDER BY id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(feedback)
}
