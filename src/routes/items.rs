use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ItemInput, SearchQuery},
    services::items,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Lists every item.
///
/// Public; returns all items without pagination or filtering.
#[get("/")]
pub async fn index(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let items = items::list_items(&state.pool).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// Lists a new item owned by the caller.
///
/// ## Responses:
/// - `201 Created`: the new `Item`.
/// - `401 Unauthorized`: no logged-in caller.
/// - `409 Conflict`: an item with that name exists.
/// - `422 Unprocessable Entity`: blank name or invalid prices.
#[post("/add_item")]
pub async fn add_item(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    item_data: web::Json<ItemInput>,
) -> Result<impl Responder, AppError> {
    let item = items::add_item(&state.pool, &caller, item_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

/// Deletes an item the caller owns.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `403 Forbidden`: the caller does not own the item.
/// - `404 Not Found`: no such item.
/// - `409 Conflict`: contracts reference the item.
#[post("/delete_item/{id}")]
pub async fn delete_item(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    item_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    items::delete_item(&state.pool, &caller, item_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/search")]
pub async fn search(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, AppError> {
    let items = items::search_items(&state.pool, &caller, &query.q).await?;
    Ok(HttpResponse::Ok().json(items))
}

#[get("/search_history")]
pub async fn search_history(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let history = items::search_history(&state.pool, &caller).await?;
    Ok(HttpResponse::Ok().json(history))
}
