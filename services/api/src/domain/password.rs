//! Credential primitives: argon2id secret hashing and password-reset tokens.

use std::sync::LazyLock;

use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngExt;
use sha2::{Digest, Sha256};

/// Length of the raw reset token sent by email.
pub const RESET_TOKEN_LEN: usize = 40;

/// Reset tokens stay valid for 15 minutes after issuance.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

const RESET_TOKEN_CHARSET: &[u8] = b"0123456789abcdef";

/// Hash a plaintext secret into an argon2id PHC string.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Check a plaintext secret against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("parse password hash: {e}"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("verify password: {e}")),
    }
}

static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("lms-dummy-password").ok());

/// Run a full verification against a fixed hash and discard the result.
///
/// Called when no stored hash exists so the miss costs the same as a mismatch.
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Generate a raw reset token (lower-case hex).
pub fn generate_reset_token() -> String {
    let mut rng = rand::rng();
    (0..RESET_TOKEN_LEN)
        .map(|_| RESET_TOKEN_CHARSET[rng.random_range(0..RESET_TOKEN_CHARSET.len())] as char)
        .collect()
}

/// One-way hash stored in place of the raw reset token.
pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
