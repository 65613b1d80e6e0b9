use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;

use crate::error::AppError;

lazy_static! {
    // Verified against when the email is unknown, so that path costs as much as a wrong password.
    static ref DUMMY_HASH: Option<String> = hash_password("tasknest-dummy-password").ok();
}

/// Hashes `password` with Argon2id and a fresh random salt.
///
/// Returns a PHC string (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC string.
///
/// The final comparison is constant-time. A malformed stored hash is an error,
/// a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hashed_password)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Burns one verification's worth of work and always reports a mismatch.
pub fn verify_against_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}
