use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};

use crate::errors::{Error, Result, ValidationError};

const MIN_PASSWORD_LEN: usize = 6;

/// Hashes a new withdrawal password into an Argon2 PHC string.
pub fn hash_withdrawal_password(password: &str) -> Result<String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::InvalidInput(format!(
            "Withdrawal password must be at least {} characters",
            MIN_PASSWORD_LEN
        ))
        .into());
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Unexpected(format!("Failed to hash withdrawal password: {e}")))
}

/// Checks `candidate` against a stored hash.
///
/// A wrong or missing candidate is `Error::Unauthorized`; a malformed stored
/// hash is `Error::Unexpected`.
pub fn verify_withdrawal_password(stored_hash: &str, candidate: Option<&str>) -> Result<()> {
    let candidate = match candidate {
        Some(c) if !c.is_empty() => c,
        _ => {
            return Err(Error::Unauthorized(
                "withdrawal password is required".to_string(),
            ))
        }
    };
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::Unexpected(format!("Invalid stored password hash: {e}")))?;
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => {
                Error::Unauthorized("withdrawal password does not match".to_string())
            }
            other => Error::Unexpected(format!("Password verification failed: {other}")),
        })
}
