use crate::{
    auth::{AuthenticatedUser, LoginRequest, RegisterRequest},
    error::AppError,
    models::ProfileUpdate,
    services::users,
    state::AppState,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Creates a new account. The password is stored as a bcrypt hash.
///
/// ## Responses:
/// - `201 Created`: the new user (without password hash).
/// - `409 Conflict`: the username is already taken.
/// - `422 Unprocessable Entity`: invalid username or password.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = users::register(&state.pool, &state.auth, register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Checks the credentials and opens a session. The returned token must be sent
/// as `Authorization: Bearer <token>` until logout.
///
/// ## Responses:
/// - `200 OK`: `AuthResponse` with the token.
/// - `401 Unauthorized`: unknown username or wrong password.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = users::login(&state.pool, &state.auth, login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Logout user
///
/// Ends the session the request's token is bound to.
#[get("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    users::logout(&state.pool, &caller).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "You have been logged out." })))
}

/// The caller's account and the items they own.
#[get("/profile")]
pub async fn profile(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = users::profile(&state.pool, &caller).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    update: web::Json<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    let user = users::update_profile(&state.pool, &caller, update.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}
