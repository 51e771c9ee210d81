use std::sync::OnceLock;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password worker failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// Compared against when the username does not exist, so both paths pay for one bcrypt run.
static UNKNOWN_USER_HASH: OnceLock<String> = OnceLock::new();

/// Hash a plaintext password on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, PasswordError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

/// Burn one verification for a login attempt against a username that does not exist.
pub async fn verify_unknown_user(password: String, cost: u32) {
    let _ = tokio::task::spawn_blocking(move || {
        let hash = UNKNOWN_USER_HASH
            .get_or_init(|| bcrypt::hash("posyandu-unknown-user", cost).unwrap_or_default());
        bcrypt::verify(password, hash)
    })
    .await;
}
