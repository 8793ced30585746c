use crate::{
    auth::AuthenticatedUser, error::AppError, services::activity, services::users,
    state::AppState,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};

#[get("/favorites")]
pub async fn list_favorites(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let items = activity::list_favorites(&state.pool, &caller).await?;
    Ok(HttpResponse::Ok().json(items))
}

#[post("/favorites/{item_id}")]
pub async fn add_favorite(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    item_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let favorite = activity::add_favorite(&state.pool, &caller, item_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(favorite))
}

#[delete("/favorites/{item_id}")]
pub async fn remove_favorite(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    item_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    activity::remove_favorite(&state.pool, &caller, item_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Feedback a user has received. Public.
#[get("/users/{id}/feedback")]
pub async fn user_feedback(
    state: web::Data<AppState>,
    user_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let user = users::find_user(&state.pool, user_id.into_inner()).await?;
    let feedback = activity::list_feedback(&state.pool, user.id).await?;
    Ok(HttpResponse::Ok().json(feedback))
}
