use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::SqlitePool;

use crate::auth::token::Claims;
use crate::error::AppError;
use crate::store;

/// Extracts the authenticated user's id from a request.
///
/// Intended for routes protected by `AuthMiddleware`, which validates the
/// token and inserts its claims into the request extensions. On top of the
/// signature/expiry check this extractor:
///
/// - parses the token subject into a user id (a corrupted subject is treated
///   as an invalid token), and
/// - re-confirms that the subject still corresponds to an existing user, so
///   a token for a since-deleted user no longer authenticates.
///
/// Both failures surface as 401. Token-format problems are reported by the
/// middleware before this extractor runs, keeping the two failure classes
/// distinguishable in logs.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub i64);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| {
                AppError::Unauthorized(
                    "User identity not found in request. Ensure AuthMiddleware is active."
                        .to_string(),
                )
            })?;

            let user_id: i64 = claims
                .sub
                .parse()
                .map_err(|_| AppError::Unauthorized("Invalid token".into()))?;

            let pool = pool.ok_or_else(|| {
                AppError::InternalServerError("Database pool not configured".into())
            })?;

            match store::users::find_by_id(&pool, user_id).await? {
                Some(user) => Ok(AuthenticatedUser(user.id)),
                None => Err(AppError::Unauthorized("Invalid token".into()).into()),
            }
        })
    }
}
