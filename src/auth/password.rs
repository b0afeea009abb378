use crate::error::AppError;
use bcrypt::{hash, verify};

/// Hashes a raw password with bcrypt (cost 12). The raw password is never
/// stored; only the resulting hash reaches the credential store.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, 12)?)
}

/// Verifies a raw password against a stored bcrypt hash.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed_password)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match verify_password("test_password123", "invalidhashformat") {
            Err(AppError::InternalServerError(_)) => {}
            Ok(false) => {
                // bcrypt may report a malformed hash as a plain mismatch.
            }
            Ok(true) => panic!("Verification must not succeed against a malformed hash"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
