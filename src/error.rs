//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way
//! to handle and represent the error conditions that can occur, from database
//! issues to validation and authorization failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly
//! convert application errors into HTTP responses with JSON bodies. It also
//! provides `From` implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, and `bcrypt::BcryptError`, allowing easy
//! conversion with the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Each variant carries a message detailing the issue and maps to a specific
/// HTTP status code. Duplicate-email conflicts are reported as `BadRequest`
/// to match the public API contract (400 rather than 409).
#[derive(Debug)]
pub enum AppError {
    /// Authentication is required or failed: missing, invalid, or expired
    /// token, or a token subject with no matching user (HTTP 401).
    Unauthorized(String),
    /// The caller is authenticated but is not the owner of the resource
    /// (HTTP 403).
    Forbidden(String),
    /// A malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// A requested resource does not exist for this owner (HTTP 404).
    NotFound(String),
    /// Input validation failed: bad lengths, bad enum values, too many tags
    /// (HTTP 400).
    ValidationError(String),
    /// An error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation lets Actix Web translate `AppError` results from
/// handlers into the correct HTTP status codes and JSON error bodies.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            // Validation failures are rejected before any storage access.
            AppError::ValidationError(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            // Database errors are presented as generic server errors.
            AppError::DatabaseError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`; other database
/// errors become `AppError::DatabaseError` and are not retried.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`,
/// preserving the detailed field messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// This handles errors during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
