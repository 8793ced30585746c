use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::middleware::TokenRejection;
use crate::auth::session::AuthenticatedUser;
use crate::error::AppError;

/// Extracts the caller's identity from request extensions.
///
/// `AuthMiddleware` inserts the identity when the request carries a valid
/// bearer token. Anonymous requests fail here with `AppError::Unauthorized`,
/// which is how handlers declare that they require a logged-in caller. If the
/// middleware turned a token down, its reason becomes the error message.
impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let extensions = req.extensions();
        if let Some(user) = extensions.get::<AuthenticatedUser>() {
            return ready(Ok(user.clone()));
        }
        let reason = extensions
            .get::<TokenRejection>()
            .map(|rejection| rejection.0.clone())
            .unwrap_or_else(|| "Login required".to_string());
        ready(Err(AppError::Unauthorized(reason).into()))
    }
}
