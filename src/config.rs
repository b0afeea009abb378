use std::env;

/// Application configuration, loaded once at process start.
///
/// Token settings are handed to `auth::token::TokenService` at construction
/// rather than read from the environment on every call.
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Secret used to sign and verify access tokens (HS256).
    pub jwt_secret: String,
    /// Access token lifetime in minutes.
    pub token_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:tasknest.db".to_string()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            token_ttl_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("ACCESS_TOKEN_EXPIRE_MINUTES must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
