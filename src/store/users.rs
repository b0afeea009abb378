//! Credential store: user records keyed by id and email.
//!
//! Passwords are hashed before they reach this module; nothing here ever
//! sees or returns a raw password.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::models::User;

/// Inserts a new user and returns the persisted record.
///
/// Callers are expected to check for an existing email first; the UNIQUE
/// constraint on `email` backstops the race between check and insert.
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, name, hashed_password, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id, email, name, hashed_password, created_at, updated_at",
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Looks a user up by email. The match is case-sensitive against the stored
/// value.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, name, hashed_password, created_at, updated_at
         FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Looks a user up by id.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, name, hashed_password, created_at, updated_at
         FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Authenticates a user by email and password.
///
/// Returns `None` both when the email is unknown and when the password does
/// not match, so the two cases are indistinguishable to the caller.
pub async fn authenticate(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = match find_by_email(pool, email).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    if verify_password(password, &user.hashed_password)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::db;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        pool
    }

    #[actix_rt::test]
    async fn test_create_and_find_user() {
        let pool = test_pool().await;

        let hash = hash_password("secret123").unwrap();
        let user = create(&pool, "alice@example.com", "Alice", &hash)
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.name, "Alice");

        let by_email = find_by_email(&pool, "alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");

        assert!(find_by_id(&pool, user.id + 1).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_authenticate_miss_and_mismatch_are_indistinguishable() {
        let pool = test_pool().await;

        let hash = hash_password("correct-password").unwrap();
        create(&pool, "bob@example.com", "Bob", &hash).await.unwrap();

        let ok = authenticate(&pool, "bob@example.com", "correct-password")
            .await
            .unwrap();
        assert!(ok.is_some());

        let wrong_password = authenticate(&pool, "bob@example.com", "wrong-password")
            .await
            .unwrap();
        let unknown_email = authenticate(&pool, "nobody@example.com", "correct-password")
            .await
            .unwrap();
        assert!(wrong_password.is_none());
        assert!(unknown_email.is_none());
    }
}
