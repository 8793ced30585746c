use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{Item, ItemInput, SearchHistory};

pub(crate) const ITEM_COLUMNS: &str = "id, name, description, photo, price_hour, price_day, \
     price_week, price_month, owner_id, status, created_at";

/// Every item, oldest first. Unpaginated.
pub async fn list_items(pool: &SqlitePool) -> Result<Vec<Item>, AppError> {
    let items = sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn list_owned(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Item>, AppError> {
    let items = sqlx::query_as::<_, Item>(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE owner_id = $1 ORDER BY id"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_item(pool: &SqlitePool, item_id: i64) -> Result<Item, AppError> {
    sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
        .bind(item_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))
}

/// Lists a new item owned by the caller.
///
/// The name is trimmed first; a blank name is a validation error.
pub async fn add_item(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
    input: ItemInput,
) -> Result<Item, AppError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::ValidationError("Item name cannot be empty".into()));
    }
    input.validate()?;

    let taken = sqlx::query_as::<_, (i64,)>("SELECT id FROM items WHERE name = $1")
        .bind(&name)
        .fetch_optional(pool)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!("An item named {:?} already exists", name)));
    }

    let item = sqlx::query_as::<_, Item>(&format!(
        "INSERT INTO items (name, description, photo, price_hour, price_day, price_week, price_month, owner_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(&name)
    .bind(&input.description)
    .bind(&input.photo)
    .bind(input.price_hour)
    .bind(input.price_day)
    .bind(input.price_week)
    .bind(input.price_month)
    .bind(caller.id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    log::info!("user {} listed item {} ({})", caller.username, item.id, item.name);
    Ok(item)
}

/// Deletes an item the caller owns.
///
/// Items referenced by contracts are kept (`Conflict`); favorites pointing at
/// the item are removed with it.
pub async fn delete_item(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
    item_id: i64,
) -> Result<(), AppError> {
    let item = find_item(pool, item_id).await?;
    if item.owner_id != caller.id {
        return Err(AppError::Forbidden("Only the owner can delete this item".into()));
    }

    let (contracts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contracts WHERE item_id = $1")
        .bind(item_id)
        .fetch_one(pool)
        .await?;
    if contracts > 0 {
        return Err(AppError::Conflict(format!(
            "Item is referenced by {} contract(s)",
            contracts
        )));
    }

    sqlx::query("DELETE FROM items WHERE id = $1 AND owner_id = $2")
        .bind(item_id)
        .bind(caller.id)
        .execute(pool)
        .await?;

    log::info!("user {} deleted item {}", caller.username, item_id);
    Ok(())
}

/// Finds items whose name or description contains `query`, ignoring ASCII
/// case, and appends the query to the caller's search history.
pub async fn search_items(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
    query: &str,
) -> Result<Vec<Item>, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::ValidationError("Search query cannot be empty".into()));
    }
    if query.chars().count() > 150 {
        return Err(AppError::ValidationError("Search query is too long".into()));
    }

    sqlx::query("INSERT INTO search_history (user_id, search_text, timestamp) VALUES ($1, $2, $3)")
        .bind(caller.id)
        .bind(query)
        .bind(Utc::now())
        .execute(pool)
        .await?;

    let pattern = format!("%{}%", escape_like(query));
    let items = sqlx::query_as::<_, Item>(&format!(
        "SELECT {ITEM_COLUMNS} FROM items
         WHERE name LIKE $1 ESCAPE '\\' OR description LIKE $2 ESCAPE '\\'
         ORDER BY id"
    ))
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// The caller's past searches, newest first.
pub async fn search_history(
    pool: &SqlitePool,
    caller: &AuthenticatedUser,
) -> Result<Vec<SearchHistory>, AppError> {
    let history = sqlx::query_as::<_, SearchHistory>(
        "SELECT id, user_id, search_text, timestamp FROM search_history
         WHERE user_id = $1 ORDER BY id DESC",
    )
    .bind(caller.id)
    .fetch_all(pool)
    .await?;
    Ok(history)
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
