use crate::error::AppError;
use chrono::Duration;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claim value identifying an access token. Tokens carrying any other `type`
/// are rejected during verification.
const TOKEN_TYPE_ACCESS: &str = "access";

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id, stringified per the JWT spec.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Token type discriminator; always `"access"` for tokens we issue.
    #[serde(rename = "type")]
    pub token_type: String,
}

/// Issues and verifies signed, time-limited access tokens.
///
/// Constructed once at startup from [`Config`](crate::config::Config) and
/// shared through `web::Data`; the signing secret and token lifetime are
/// fixed at construction rather than read from ambient environment state.
/// Verification is pure: it never performs a database lookup, so
/// token-format problems and missing-user problems stay distinguishable
/// (the latter is handled by the `AuthenticatedUser` extractor).
///
/// A token is either valid (signature checks out, not expired, type is
/// `"access"`) or invalid. There is no revocation list: logout is a
/// client-side no-op.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Creates a service signing with `secret` (HS256) and issuing tokens
    /// valid for `ttl_minutes`.
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issues an access token for `user_id`, expiring `ttl` from now.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::InternalServerError("Token expiry overflow".into()))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration,
            token_type: TOKEN_TYPE_ACCESS.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token string and decodes its claims.
    ///
    /// Returns `Unauthorized("Token expired")` past expiry and
    /// `Unauthorized("Invalid token")` for a bad signature, malformed token,
    /// or a non-access token type.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".into()),
                _ => AppError::Unauthorized("Invalid token".into()),
            })?;

        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AppError::Unauthorized("Invalid token".into()));
        }

        Ok(claims)
    }
}
