use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use shared_types::AppError;
use std::sync::OnceLock;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| AppError::internal(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Burn one verification when no account matched, so an unknown email takes
/// as long to reject as a wrong password.
pub fn verify_against_placeholder(password: &str) {
    static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| hash_password("placeholder-password").ok());
    if let Some(hash) = placeholder {
        let _ = verify_password(password, hash);
    }
}
