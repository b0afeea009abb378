pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::user::UserResponse;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// User's password. Must be non-empty.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account. Must be a valid email format.
    /// Uniqueness is checked case-sensitively against the stored value.
    #[validate(email)]
    pub email: String,
    /// Display name for the new account.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Password for the new account. Must be non-empty.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response structure after successful authentication (login, registration,
/// or token refresh). Contains the access token and the public projection of
/// the authenticated user.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed access token for bearer authentication.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    /// The authenticated user: id, email, and display name only.
    pub user: UserResponse,
}

impl TokenResponse {
    pub fn new(access_token: String, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

/// Rejects any request whose path owner differs from the authenticated
/// subject.
///
/// This check runs first in every task-scoped handler, before validation and
/// before any task storage access, and regardless of whether the target task
/// exists: an ownership mismatch is reported as 403 rather than 404, so a
/// non-owner cannot probe which task ids exist.
pub fn authorize_owner(path_user_id: i64, authenticated_user_id: i64) -> Result<(), AppError> {
    if path_user_id != authenticated_user_id {
        return Err(AppError::Forbidden(
            "Not authorized to access this resource".into(),
        ));
    }
    Ok(())
}
