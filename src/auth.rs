//! Admin access: Argon2id password hashes and an HTTP Basic extractor.

use crate::error::AppError;
use crate::state::AppState;
use crate::store::{self, DatabaseConnection};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password using Argon2id with a random salt. Returns the PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Auth(e.to_string()))?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AppError::Auth(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Auth(e.to_string())),
    }
}

/// Decode `Basic base64(user:password)`.
pub fn parse_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, password) = text.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

pub async fn create_superuser(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<i64, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("username must not be empty".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    let hash = hash_password(password)?;
    let id = store::insert_admin_user(db, username, &hash).await?;
    tracing::info!(username, id, "superuser created");
    Ok(id)
}

/// Signed-in admin. `username` is `None` when admin auth is switched off.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub username: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !state.admin_auth {
            return Ok(AdminUser { username: None });
        }
        let (username, password) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_basic)
            .ok_or(AppError::Unauthorized)?;
        let hash = store::admin_password_hash(&state.db, &username)
            .await?
            .ok_or(AppError::Unauthorized)?;
        // Argon2 verification is CPU-bound.
        let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Auth(e.to_string()))??;
        if !ok {
            tracing::debug!(username = %username, "admin login rejected");
            return Err(AppError::Unauthorized);
        }
        Ok(AdminUser {
            username: Some(username),
        })
    }
}
