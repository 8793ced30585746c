use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::session::authenticate;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the bearer token of each request into an `AuthenticatedUser`.
///
/// The middleware never rejects a request on its own. A missing header leaves
/// the request anonymous. So does a malformed header, an invalid token or a
/// closed session; in those cases the reason is kept as a `TokenRejection`.
/// Handlers that need an identity ask for it with the `AuthenticatedUser`
/// extractor, which answers 401 with that reason. Public routes keep working
/// for a client that still sends a stale token.
pub struct AuthMiddleware;

/// Why the bearer token on a request was not accepted.
#[derive(Debug, Clone)]
pub struct TokenRejection(pub String);

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match req.headers().get(header::AUTHORIZATION) {
                None => None,
                Some(value) => Some(
                    value
                        .to_str()
                        .ok()
                        .and_then(|value| value.strip_prefix("Bearer "))
                        .map(str::to_owned)
                        .ok_or_else(|| {
                            AppError::Unauthorized("Malformed Authorization header".into())
                        }),
                ),
            };

            if let Some(token) = token {
                let state = req
                    .app_data::<web::Data<AppState>>()
                    .cloned()
                    .ok_or_else(|| {
                        AppError::InternalServerError("Application state is not configured".into())
                    })?;
                let resolved = match token {
                    Ok(token) => authenticate(&state.pool, &state.auth, &token).await,
                    Err(e) => Err(e),
                };
                match resolved {
                    Ok(user) => {
                        log::debug!("request {} authenticated as {}", req.path(), user.username);
                        req.extensions_mut().insert(user);
                    }
                    Err(AppError::Unauthorized(reason)) => {
                        log::debug!("request {} continues anonymously: {}", req.path(), reason);
                        req.extensions_mut().insert(TokenRejection(reason));
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            service.call(req).await
        })
    }
}
