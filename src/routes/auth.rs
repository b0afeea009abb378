use crate::{
    auth::{hash_password, AuthenticatedUser, LoginRequest, RegisterRequest, TokenResponse,
        TokenService},
    error::AppError,
    models::UserResponse,
    store,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

/// Register a new user.
///
/// Creates the account and returns an access token bundle. Fails with 400
/// when the email is already registered.
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    token_service: web::Data<TokenService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    if store::users::find_by_email(&pool, &register_data.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password)?;
    let user = store::users::create(
        &pool,
        &register_data.email,
        &register_data.name,
        &password_hash,
    )
    .await?;

    let token = token_service.issue(user.id)?;

    Ok(HttpResponse::Ok().json(TokenResponse::new(token, UserResponse::from(&user))))
}

/// Login with email and password.
///
/// An unknown email and a wrong password produce the same 401 response, so
/// the caller cannot tell which failed.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    token_service: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = store::users::authenticate(&pool, &login_data.email, &login_data.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Incorrect email or password".into()))?;

    let token = token_service.issue(user.id)?;

    Ok(HttpResponse::Ok().json(TokenResponse::new(token, UserResponse::from(&user))))
}

/// Returns the authenticated user's public profile.
#[get("/me")]
pub async fn me(
    pool: web::Data<SqlitePool>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = store::users::find_by_id(&pool, auth.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Issues a fresh token bundle for the authenticated user.
#[post("/refresh")]
pub async fn refresh(
    pool: web::Data<SqlitePool>,
    token_service: web::Data<TokenService>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = store::users::find_by_id(&pool, auth.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let token = token_service.issue(user.id)?;

    Ok(HttpResponse::Ok().json(TokenResponse::new(token, UserResponse::from(&user))))
}

/// Logout endpoint.
///
/// Tokens are valid until they expire and there is no server-side session
/// state, so this is a stateless no-op kept for API compatibility.
#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Logged out successfully"
    }))
}
