//! Password hashing, bearer token generation and `Authorization` header parsing.

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::fmt::Write;

use crate::config::SecurityConfig;
use crate::services::AuthError;

const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];

fn argon2_with(config: &SecurityConfig) -> Result<Argon2<'static>> {
    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id with a fresh random salt.
///
/// CPU and memory heavy; call it from `spawn_blocking`.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2_with(config)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

fn is_bcrypt_hash(stored_hash: &str) -> bool {
    BCRYPT_PREFIXES
        .iter()
        .any(|prefix| stored_hash.starts_with(prefix))
}

/// Check a password against a stored hash.
///
/// A mismatch and an unparsable hash both return `false`.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    if is_bcrypt_hash(stored_hash) {
        return bcrypt::verify(password, stored_hash).unwrap_or(false);
    }

    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Whether a verified hash should be replaced by one made with `config`.
#[must_use]
pub fn needs_rehash(stored_hash: &str, config: &SecurityConfig) -> bool {
    if is_bcrypt_hash(stored_hash) {
        return true;
    }

    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    if parsed.algorithm.as_str() != "argon2id" {
        return true;
    }

    Params::try_from(&parsed).map_or(true, |params| {
        params.m_cost() != config.argon2_memory_cost_kib
            || params.t_cost() != config.argon2_time_cost
            || params.p_cost() != config.argon2_parallelism
    })
}

/// Generate an opaque bearer token: `byte_len` random bytes, hex encoded.
#[must_use]
pub fn generate_token(byte_len: usize) -> String {
    use rand::Rng;

    let mut bytes = vec![0u8; byte_len];
    rand::rng().fill(bytes.as_mut_slice());

    bytes
        .iter()
        .fold(String::with_capacity(byte_len * 2), |mut acc, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        })
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively and surrounding whitespace is
/// ignored. The token itself may not contain whitespace.
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let header = header.trim();
    if header.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let (scheme, rest) = header
        .split_once(char::is_whitespace)
        .ok_or(AuthError::TokenFormat)?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::TokenFormat);
    }

    let token = rest.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::TokenFormat);
    }

    Ok(token)
}
