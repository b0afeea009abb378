use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenService;
use crate::error::AppError;

/// Bearer-token authentication middleware.
///
/// Wraps the `/api` scope. For every request except the public auth
/// endpoints it extracts the `Authorization: Bearer <token>` header, verifies
/// the token through the shared [`TokenService`], and inserts the decoded
/// claims into the request extensions for the `AuthenticatedUser` extractor.
/// Requests with a missing, invalid, or expired token are rejected with 401
/// before the handler runs.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Login, register, and logout do not require a token. Logout is a
        // stateless no-op: there is no server-side session to invalidate.
        let path = req.path();
        if path.starts_with("/api/auth/login")
            || path.starts_with("/api/auth/register")
            || path.starts_with("/api/auth/logout")
        {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token_service = match req.app_data::<web::Data<TokenService>>() {
            Some(service) => service,
            None => {
                let app_err =
                    AppError::InternalServerError("Token service not configured".into());
                return Box::pin(async move { Err(app_err.into()) });
            }
        };

        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match auth_header {
            Some(token) => match token_service.verify(token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
            },
            None => {
                let app_err = AppError::Unauthorized("Missing token".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
